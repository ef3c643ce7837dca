//! Core EVM wrapper and execution harness
//!
//! This module provides the `TraceEvm` wrapper around revm's `MainnetEvm` used to
//! drive an inspector through whole transactions.
//!
//! ## Key Components
//!
//! - **`TraceEvm`**: Wrapper struct giving the EVM inspector-aware helpers
//! - **Builder**: In-memory EVM construction over any `DatabaseRef`
//! - **Processor**: Single transaction execution with inspector output
//!
//! ## Usage Examples
//!
//! ```no_run
//! use revm::database::EmptyDB;
//! use revm_safe_trace::{create_evm_with_tracer, CallTracer};
//!
//! // Create an EVM that reconstructs call trees without scanning them
//! let mut evm = create_evm_with_tracer(EmptyDB::default(), CallTracer::new());
//! ```

pub use revm::{
    context_interface::ContextTr,
    database::Database,
    handler::MainnetContext,
    inspector::{Inspector, NoOpInspector},
    MainnetEvm,
};
use std::ops::{Deref, DerefMut};

// Sub-modules for EVM functionality
pub mod builder;
pub mod inspector;
pub mod processor;

/// EVM wrapper with tracing helpers
///
/// `TraceEvm` wraps revm's `MainnetEvm` and provides:
/// - Transparent access to all EVM functionality via `Deref`/`DerefMut`
/// - Inspector output collection and reset between transactions
/// - Single transaction processing (see [`TraceEvm::process_transaction`])
///
/// # Type Parameters
/// - `DB`: Database backend implementing the `Database` trait
/// - `INSP`: Inspector observing execution
///
/// # Manual Control
/// ```no_run
/// use revm::{context::TxEnv, database::EmptyDB, InspectCommitEvm};
/// use revm_safe_trace::{create_evm_with_tracer, CallTracer};
/// use alloy::primitives::{address, TxKind, U256};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut evm = create_evm_with_tracer(EmptyDB::default(), CallTracer::new());
///
/// let tx = TxEnv::builder()
///     .caller(address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"))
///     .kind(TxKind::Call(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")))
///     .value(U256::ZERO)
///     .build_fill();
///
/// // Inspector hooks only fire on the inspect_* entry points
/// let inspector = evm.clone_inspector();
/// let result = evm.inspect_commit(tx, inspector)?;
/// let trace = evm.get_inspector_output();
///
/// evm.reset_inspector();
/// # Ok(())
/// # }
/// ```
pub struct TraceEvm<DB: Database, INSP>(MainnetEvm<MainnetContext<DB>, INSP>);

impl<DB, INSP> TraceEvm<DB, INSP>
where
    DB: Database,
{
    /// Wraps an already configured `MainnetEvm`
    ///
    /// Prefer [`create_evm_with_tracer`](crate::create_evm_with_tracer), which
    /// applies the simulation configuration.
    pub fn new(evm: MainnetEvm<MainnetContext<DB>, INSP>) -> Self {
        Self(evm)
    }
}

/// Transparent access to the underlying MainnetEvm
impl<DB, INSP> Deref for TraceEvm<DB, INSP>
where
    DB: Database,
{
    type Target = MainnetEvm<MainnetContext<DB>, INSP>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Mutable access to the underlying MainnetEvm
impl<DB, INSP> DerefMut for TraceEvm<DB, INSP>
where
    DB: Database,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
