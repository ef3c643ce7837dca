//! Call tree scanning
//!
//! A finished call tree is walked depth-first, pre-order, and every call
//! accepted by a [`CallMatcher`] is reported to a [`MatchSink`]. The default
//! matcher, [`TrustedDelegates`], accepts `DELEGATECALL`s into a fixed set of
//! trusted implementation contracts.
//!
//! Scanning runs off the execution path, see [`service`].

use std::sync::Arc;

use tracing::{trace, warn};

use crate::types::{Address, CallKind, CallRecord, MatchReport};

pub mod service;
pub mod sink;

use sink::MatchSink;

/// Predicate selecting the calls a scan reports
pub trait CallMatcher: Send + Sync {
    fn matches(&self, call: &CallRecord) -> bool;
}

/// Matches delegate calls into a fixed set of trusted addresses
///
/// Only `to` and `kind` are inspected; caller and error are ignored.
#[derive(Debug, Clone)]
pub struct TrustedDelegates {
    addresses: Arc<[Address]>,
}

impl TrustedDelegates {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self {
            addresses: addresses.into_iter().collect(),
        }
    }

    /// Trusted delegate targets
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }
}

impl CallMatcher for TrustedDelegates {
    fn matches(&self, call: &CallRecord) -> bool {
        call.kind == CallKind::DelegateCall && self.addresses.contains(&call.to)
    }
}

/// Adapts a closure into a [`CallMatcher`]
///
/// # Example
/// ```
/// use revm_safe_trace::scanner::{CallMatcher, MatchFn};
/// use revm_safe_trace::types::{Address, CallKind, CallRecord};
///
/// let reverted = MatchFn(|call: &CallRecord| call.error.is_some());
/// let call = CallRecord::new(CallKind::Call, Address::ZERO, Address::ZERO);
/// assert!(!reverted.matches(&call));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatchFn<F>(pub F);

impl<F> CallMatcher for MatchFn<F>
where
    F: Fn(&CallRecord) -> bool + Send + Sync,
{
    fn matches(&self, call: &CallRecord) -> bool {
        (self.0)(call)
    }
}

/// Walks call trees and reports matching calls
#[derive(Clone)]
pub struct TreeScanner {
    matcher: Arc<dyn CallMatcher>,
    sink: Arc<dyn MatchSink>,
}

impl std::fmt::Debug for TreeScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeScanner").finish_non_exhaustive()
    }
}

impl TreeScanner {
    pub fn new<M, S>(matcher: M, sink: S) -> Self
    where
        M: CallMatcher + 'static,
        S: MatchSink + 'static,
    {
        Self {
            matcher: Arc::new(matcher),
            sink: Arc::new(sink),
        }
    }

    /// Scans the tree below (and including) `root`
    ///
    /// Every call is evaluated before its children, children in execution
    /// order. A failing sink is logged and the scan carries on.
    ///
    /// Returns the number of matches.
    pub fn scan(&self, root: &CallRecord) -> usize {
        let mut trace_address = Vec::new();
        self.visit(root, &mut trace_address)
    }

    fn visit(&self, call: &CallRecord, trace_address: &mut Vec<usize>) -> usize {
        let mut matches = 0;
        if self.matcher.matches(call) {
            matches += 1;
            let report = MatchReport::new(call, trace_address.clone());
            trace!(target: "safe_trace::scanner", %report, "Call matched");
            if let Err(error) = self.sink.notify(&report) {
                warn!(target: "safe_trace::scanner", %error, %report, "Failed to deliver match");
            }
        }

        for (index, child) in call.children.iter().enumerate() {
            trace_address.push(index);
            matches += self.visit(child, trace_address);
            trace_address.pop();
        }
        matches
    }
}
