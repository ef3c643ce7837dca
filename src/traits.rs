//! Inspector traits
//!
//! This module provides the traits the simulation harness relies on:
//! - `Reset`: Clear inspector data between transactions
//! - `TraceOutput`: Extract the inspector's result after execution
//! - `TraceInspector`: Everything an inspector needs to be driven by `TraceEvm`

use revm::{interpreter::interpreter::EthInterpreter, Inspector};

/// Trait for resetting inspector state between transactions
///
/// Implementors should clear any accumulated per-transaction state while
/// keeping their configuration.
pub trait Reset {
    /// Clears all accumulated state data
    fn reset(&mut self);
}

/// Trait for extracting an inspector's result
pub trait TraceOutput {
    /// Result type produced after execution
    type Output;

    /// Returns the result collected so far
    fn get_output(&self) -> Self::Output;
}

/// Inspector usable with [`TraceEvm`](crate::evm::TraceEvm)
///
/// Blanket-implemented for every cloneable inspector that can also be reset
/// and produce an output.
pub trait TraceInspector<CTX>: Inspector<CTX, EthInterpreter> + Reset + TraceOutput + Clone {}

impl<CTX, T> TraceInspector<CTX> for T where
    T: Inspector<CTX, EthInterpreter> + Reset + TraceOutput + Clone
{
}
