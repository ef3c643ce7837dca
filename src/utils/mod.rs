//! Utility functions used by the tracer
//!
//! # Modules
//!
//! - [`error_utils`]: Revert output decoding
//!   - `Error(string)` messages
//!   - Solidity panic code interpretation
//!
//! - [`stack_utils`]: Interpreter stack helpers
//!   - Callee address extraction for call instructions

/// Revert reason decoding
pub mod error_utils;

/// Stack view helpers
pub mod stack_utils;
