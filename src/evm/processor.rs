//! Transaction processing implementation for TraceEvm
//!
//! Executes one simulated transaction with the inspector attached and
//! returns the execution result together with the inspector's output.

use revm::{
    context::{ContextTr, TxEnv},
    context_interface::result::ExecutionResult,
    database::{CacheDB, Database, DatabaseRef},
    handler::MainnetContext,
    InspectCommitEvm,
};
use tracing::debug;

use crate::{errors::RuntimeError, evm::TraceEvm, traits::TraceInspector, types::SimulationTx};

impl<DB, INSP> TraceEvm<CacheDB<DB>, INSP>
where
    DB: DatabaseRef,
    INSP: TraceInspector<MainnetContext<CacheDB<DB>>>,
{
    /// Process a single transaction with tracing
    ///
    /// # Arguments
    /// * `input` - Transaction parameters and data
    ///
    /// # Returns
    /// * `Ok((ExecutionResult, Output))` - Execution result and inspector output
    /// * `Err(RuntimeError)` - If the sender cannot be read or the transaction
    ///   is invalid
    ///
    /// # Implementation Details
    /// 1. Resets inspector state before execution
    /// 2. Builds the transaction environment with the sender's current nonce
    /// 3. Executes the transaction and commits its state changes
    /// 4. Collects inspector output
    ///
    /// A reverted or halted transaction is a successful execution; its
    /// failure is reported through the `ExecutionResult`.
    pub fn process_transaction(
        &mut self,
        input: SimulationTx,
    ) -> Result<(ExecutionResult, INSP::Output), RuntimeError> {
        self.reset_inspector();

        let nonce = self
            .ctx
            .db()
            .basic(input.caller)
            .map_err(|e| RuntimeError::AccountAccess(format!("Failed to get account info: {e}")))?
            .map(|acc| acc.nonce)
            .unwrap_or_default();

        let tx = TxEnv::builder()
            .caller(input.caller)
            .value(input.value)
            .data(input.data)
            .kind(input.transact_to)
            .nonce(nonce)
            .build_fill();
        let inspector = self.clone_inspector();

        let result = self.inspect_commit(tx, inspector).map_err(|e| {
            RuntimeError::ExecutionFailed(format!("Inspector execution failed: {e}"))
        })?;
        debug!(
            target: "safe_trace::evm",
            success = result.is_success(),
            gas_used = result.gas_used(),
            "Transaction processed"
        );

        let output = self.get_inspector_output();
        Ok((result, output))
    }
}
