//! Error types for call tracing and scanning
//!
//! This module defines the error handling system used across the crate:
//! - Per-call failure markers stored inside the call tree
//! - Configuration errors
//! - Scan dispatch and notification errors
//! - Runtime errors of the simulation harness
//!
//! Tracing itself never fails towards the EVM; failures observed during
//! execution are carried inside the tree as [`CallError`] values.

use serde::Serialize;
use thiserror::Error;

/// Top-level error type of the crate
#[derive(Debug, Error)]
pub enum TraceError {
    /// Invalid tracer configuration
    #[error("Invalid tracer configuration: {0}")]
    Config(#[from] ConfigError),

    /// Errors from the scan service
    #[error("Scan service error: {0}")]
    Scan(#[from] ScanError),

    /// Errors occurring during transaction execution
    #[error("Error during execution: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Terminal failure of a single call
///
/// Set at most once per call record; the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum CallError {
    /// The call executed `REVERT`
    #[error("execution reverted")]
    Reverted,

    /// The call halted (out of gas, invalid opcode, stack violation...)
    #[error("execution halted: {0}")]
    Halted(String),

    /// The host reported an unrecoverable fault
    #[error("execution fault: {0}")]
    Fault(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed configuration document
    #[error("Failed to parse tracer configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The scan queue needs room for at least one job
    #[error("Scan queue capacity must be greater than zero")]
    ZeroQueueCapacity,
}

/// Errors raised while dispatching or reporting scans
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The bounded scan queue has no free slot
    #[error("Scan queue is full")]
    QueueFull,

    /// The scan worker has stopped
    #[error("Scan queue is closed")]
    QueueClosed,

    /// The match consumer went away
    #[error("Match sink is closed")]
    SinkClosed,

    /// The scan worker needs a Tokio runtime to be spawned on
    #[error("No Tokio runtime available to spawn the scan worker")]
    NoRuntime,

    /// The scan worker task panicked or was cancelled
    #[error("Scan worker failed: {0}")]
    WorkerFailed(String),
}

/// Runtime execution errors of the simulation harness
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// General transaction execution failures
    #[error("Transaction execution failed: {0}")]
    ExecutionFailed(String),

    /// Errors accessing account information
    #[error("Account access error: {0}")]
    AccountAccess(String),
}
