//! Call tree reconstructing tracer
//!
//! This module provides the `CallTracer` type. The tracer rebuilds the call
//! tree of a top-level transaction from the instruction-level event stream of
//! the EVM and hands the finished tree to the scan service.
//!
//! # Architecture
//!
//! The implementation is split across several modules:
//! - `frame`: The stack of open call records
//! - `events`: The host-agnostic event API (call begin, step, fault, call end)
//! - `inspector`: REVM Inspector trait implementation feeding the event API
//! - `traits`: `Reset` and `TraceOutput` implementations
//!
//! # Reconstruction
//!
//! The EVM never reports "this sub-call returned". Nesting is inferred from
//! the execution depth that accompanies every step: a frame is opened on each
//! call-kind instruction and closed on the first ordinary instruction that
//! runs back at the parent's depth. Faults close the failing frame directly.
//!
//! Under REVM a call-kind instruction is only reported once it has executed,
//! so one that halts on its own gas or stack checks never opens a frame.

use std::{sync::Arc, time::Instant};

use crate::{
    config::TracerConfig,
    errors::TraceError,
    scanner::{
        service::{ScanQueue, ScanService},
        sink::MatchSink,
        TreeScanner, TrustedDelegates,
    },
    types::{CallRecord, TracedCall},
};

mod events;
mod frame;
mod inspector;
mod traits;

pub use events::Step;
pub use frame::FrameStack;

/// Instruction-level call tree tracer
///
/// Driven synchronously by the EVM, one event per instruction. All state is
/// per-transaction and cleared by [`Reset`](crate::traits::Reset); the scan
/// queue handle survives resets.
///
/// # State Management
/// - Frame stack: currently open calls, root first
/// - Max depth: deepest execution depth observed, used to gate scanning
/// - Host frames: number of EVM frames entered but not yet ended
/// - Last trace: the finished tree of the most recent top-level call
#[derive(Debug, Clone, Default)]
pub struct CallTracer {
    /// Currently open calls
    frames: FrameStack,
    /// Deepest depth reported by a step
    max_depth: usize,
    /// EVM frames entered and not yet ended, tracks the top-level call boundary
    host_frames: usize,
    /// Call-kind instruction seen by `step` and not yet executed
    pending_call: Option<inspector::PendingCall>,
    /// Depth whose halt was already reported by a call-kind instruction
    step_fault: Option<usize>,
    /// Start of the current top-level call
    started_at: Option<Instant>,
    /// Finished tree of the last top-level call
    last_trace: Option<TracedCall>,
    /// Handoff to the scan worker; `None` traces without scanning
    queue: Option<ScanQueue>,
}

impl CallTracer {
    /// Creates a tracer that records call trees without scanning them
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a tracer that hands every finished tree to `queue`
    pub fn with_scan_queue(queue: ScanQueue) -> Self {
        Self {
            queue: Some(queue),
            ..Default::default()
        }
    }

    /// Builds a tracer and its scan worker from a configuration
    ///
    /// Delegate calls into any of the configured trusted addresses are
    /// reported to `sink`. Must be called from within a Tokio runtime.
    ///
    /// # Example
    /// ```no_run
    /// use revm_safe_trace::{config::TracerConfig, scanner::sink::LogSink, CallTracer};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let (tracer, service) = CallTracer::spawn(TracerConfig::default(), LogSink)?;
    /// // ... drive an EVM with `tracer` ...
    /// drop(tracer);
    /// let stats = service.join().await?;
    /// println!("scanned {} traces, {} matches", stats.scanned, stats.matches);
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn<S>(config: TracerConfig, sink: S) -> Result<(Self, ScanService), TraceError>
    where
        S: MatchSink + 'static,
    {
        config.validate()?;
        let matcher = TrustedDelegates::new(config.trusted_addresses.iter().copied());
        let scanner = TreeScanner::new(matcher, sink);
        let service = ScanService::spawn(scanner, config.scan_queue_capacity)?;
        Ok((Self::with_scan_queue(service.queue()), service))
    }

    /// Open frames, root first
    pub fn frames(&self) -> &FrameStack {
        &self.frames
    }

    /// Deepest execution depth observed in the current trace
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Root of the call currently being traced
    pub fn current_root(&self) -> Option<&CallRecord> {
        self.frames.root()
    }

    /// Finished trace of the most recent top-level call
    pub fn last_trace(&self) -> Option<&TracedCall> {
        self.last_trace.as_ref()
    }

    /// Root of the most recently finished call tree
    pub fn last_tree(&self) -> Option<Arc<CallRecord>> {
        self.last_trace.as_ref().map(|trace| Arc::clone(&trace.root))
    }
}
