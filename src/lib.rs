//! # REVM Call Tree Tracer and Delegate Scanner
//!
//! A library that rebuilds the call tree of an EVM transaction from its
//! instruction stream and scans finished trees for delegate calls into
//! trusted implementation contracts (such as the Safe master copy).
//!
//! ## Core Features
//!
//! - **Call Tree Reconstruction**
//!   - Nesting inferred from execution depth, no enter/exit hooks required
//!   - Per-call failure markers, first failure wins
//!   - Faults isolated to the failing sub-call
//!
//! - **Asynchronous Scanning**
//!   - Finished trees handed off through a bounded queue, never blocking execution
//!   - Pre-order scan with trace addresses for every match
//!   - Pluggable match predicate and notification sinks
//!
//! - **Simulation Harness**
//!   - In-memory EVM over any `DatabaseRef`
//!   - Single transaction execution returning the traced call tree
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use revm::database::EmptyDB;
//! use revm_safe_trace::{
//!     config::TracerConfig, create_evm_with_tracer, scanner::sink::LogSink, types::SimulationTx,
//!     CallTracer,
//! };
//! use alloy::primitives::{address, TxKind, U256};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (tracer, service) = CallTracer::spawn(TracerConfig::default(), LogSink)?;
//! let mut evm = create_evm_with_tracer(EmptyDB::default(), tracer);
//!
//! let tx = SimulationTx {
//!     caller: address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61"),
//!     transact_to: TxKind::Call(address!("d878229c9c3575F224784DE610911B5607a3ad15")),
//!     value: U256::ZERO,
//!     data: Default::default(),
//! };
//!
//! let (result, trace) = evm.process_transaction(tx)?;
//! if let Some(trace) = trace {
//!     println!("success: {}, max depth: {}", result.is_success(), trace.max_depth);
//! }
//!
//! // Close the queue, then wait for the scans to finish
//! drop(evm);
//! let stats = service.join().await?;
//! println!("{} matches", stats.matches);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `inspectors`: The call tracer and its revm inspector implementation
//! - `scanner`: Tree scanning, match sinks and the background scan worker
//! - `evm`: EVM wrapper and simulation harness
//! - `config`: Tracer configuration
//! - `types`: Core data structures and type definitions
//! - `traits`: Trait definitions for inspectors
//! - `errors`: Error types and handling
//! - `utils`: Helper functions and utilities

pub mod config;
pub mod errors;
pub mod evm;
pub mod inspectors;
pub mod scanner;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export only the essential types and functions
pub use config::TracerConfig;
pub use errors::{CallError, TraceError};
pub use evm::{
    builder::{create_evm, create_evm_with_tracer},
    TraceEvm,
};
pub use inspectors::CallTracer;
pub use traits::{Reset, TraceInspector, TraceOutput};
pub use types::{CallKind, CallRecord, MatchReport, SimulationTx, TracedCall};
