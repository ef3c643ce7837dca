//! Core types for call tree reconstruction and scanning
//!
//! This module defines the data structures shared by the tracer, the scanner
//! and the EVM harness:
//! - Call kinds and call records (the nodes of the reconstructed tree)
//! - The finished trace handed out after the top-level call ends
//! - Match reports emitted by the scanner
//! - Transaction parameters for the simulation harness

use std::{fmt, sync::Arc, time::Duration};

pub use alloy::primitives::{Address, Bytes, TxKind, U256};
use revm::bytecode::opcode;
use serde::{Deserialize, Serialize};

use crate::errors::CallError;

/// Kind of a call frame, named after the EVM instruction that opens it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// Regular message call (`CALL`)
    Call,
    /// Call executing callee code with the caller's storage (`CALLCODE`)
    CallCode,
    /// Delegated call keeping caller, value and storage context (`DELEGATECALL`)
    DelegateCall,
    /// Read-only call (`STATICCALL`)
    StaticCall,
    /// Contract creation (`CREATE`)
    Create,
    /// Contract creation with a deterministic address (`CREATE2`)
    Create2,
}

impl CallKind {
    /// Maps an opcode to the call kind it opens, if any
    pub fn from_opcode(op: u8) -> Option<Self> {
        match op {
            opcode::CALL => Some(Self::Call),
            opcode::CALLCODE => Some(Self::CallCode),
            opcode::DELEGATECALL => Some(Self::DelegateCall),
            opcode::STATICCALL => Some(Self::StaticCall),
            opcode::CREATE => Some(Self::Create),
            opcode::CREATE2 => Some(Self::Create2),
            _ => None,
        }
    }

    /// Whether this kind deploys a new contract
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create | Self::Create2)
    }

    /// Instruction mnemonic of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::CallCode => "CALLCODE",
            Self::DelegateCall => "DELEGATECALL",
            Self::StaticCall => "STATICCALL",
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the reconstructed call tree
///
/// Records are opened when the tracer sees a call-kind instruction and are
/// appended to their parent's `children` only once they have finished, so a
/// finished tree never contains a partially executed frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Instruction kind that opened this call
    pub kind: CallKind,
    /// Address executing the call instruction
    pub from: Address,
    /// Callee address (the creator itself for opcode-level creations)
    pub to: Address,
    /// Transferred value, only known for the top-level call
    pub value: Option<U256>,
    /// Call payload
    pub input: Bytes,
    /// First failure observed for this call
    pub error: Option<CallError>,
    /// Finished sub-calls in execution order
    pub children: Vec<CallRecord>,
}

impl CallRecord {
    /// Creates an open record without payload, value or children
    pub fn new(kind: CallKind, from: Address, to: Address) -> Self {
        Self {
            kind,
            from,
            to,
            value: None,
            input: Bytes::new(),
            error: None,
            children: Vec::new(),
        }
    }

    /// Records a failure unless one is already set
    ///
    /// Returns `true` when `error` was stored, `false` when an earlier
    /// failure already occupied the slot.
    pub fn set_error(&mut self, error: CallError) -> bool {
        if self.error.is_some() {
            return false;
        }
        self.error = Some(error);
        true
    }

    /// Whether the call finished without any recorded failure
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Number of records in this subtree, including `self`
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(CallRecord::subtree_size).sum::<usize>()
    }

    /// Looks up a descendant by its trace address (child indices from `self`)
    pub fn get(&self, trace_address: &[usize]) -> Option<&CallRecord> {
        trace_address
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.kind, self.from, self.to)
    }
}

/// Finished trace of one top-level call
///
/// The root is shared with the scan worker through an `Arc`; nothing mutates
/// the tree after it has been handed out.
#[derive(Debug, Clone, Serialize)]
pub struct TracedCall {
    /// Root of the reconstructed call tree
    pub root: Arc<CallRecord>,
    /// Deepest execution depth observed while tracing (top-level call = 1)
    pub max_depth: usize,
    /// Output of the top-level call
    pub output: Bytes,
    /// Gas spent by the top-level call
    pub gas_used: u64,
    /// Wall-clock time between call start and end
    pub elapsed: Duration,
    /// Failure reported by the host for the top-level call
    pub failure: Option<CallError>,
    /// Decoded revert reason when the top-level call reverted
    pub revert_reason: Option<String>,
}

impl TracedCall {
    /// Check if the top-level call succeeded
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.root.is_success()
    }

    /// Whether this trace passes the scan gate (at least one nested frame executed)
    pub fn is_scannable(&self) -> bool {
        self.max_depth > 1
    }
}

/// A call accepted by the scanner's match predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Kind of the matched call
    pub kind: CallKind,
    /// Caller of the matched call
    pub from: Address,
    /// Target of the matched call
    pub to: Address,
    /// Failure recorded on the matched call, if any
    pub error: Option<CallError>,
    /// Position in the call tree (child indices from the root)
    pub trace_address: Vec<usize>,
}

impl MatchReport {
    /// Builds a report for `call` found at `trace_address`
    pub fn new(call: &CallRecord, trace_address: Vec<usize>) -> Self {
        Self {
            kind: call.kind,
            from: call.from,
            to: call.to,
            error: call.error.clone(),
            trace_address,
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.kind, self.from, self.to)
    }
}

/// Transaction parameters for simulation
#[derive(Debug, Clone)]
pub struct SimulationTx {
    /// Transaction sender
    pub caller: Address,
    /// Native token value to send
    pub value: U256,
    /// Transaction input data
    pub data: Bytes,
    /// Transaction target (address or contract creation)
    pub transact_to: TxKind,
}
