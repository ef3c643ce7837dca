//! Inspector management for TraceEvm
//!
//! Access to the attached inspector's output and state between transactions.

use revm::database::Database;

use crate::{
    evm::TraceEvm,
    traits::{Reset, TraceOutput},
};

impl<DB, INSP> TraceEvm<DB, INSP>
where
    DB: Database,
    INSP: TraceOutput + Reset + Clone,
{
    /// Retrieve the current output from the inspector
    ///
    /// For [`CallTracer`](crate::CallTracer) this is the finished trace of the
    /// last top-level call, if any.
    pub fn get_inspector_output(&self) -> INSP::Output {
        self.inspector.get_output()
    }

    /// Reset the inspector to its initial state
    ///
    /// Called automatically by
    /// [`process_transaction`](TraceEvm::process_transaction) before each
    /// transaction.
    pub fn reset_inspector(&mut self) {
        self.inspector.reset();
    }

    /// Clone the inspector instance
    ///
    /// revm's `inspect_commit` takes its inspector by value, so each
    /// transaction runs with a copy of the attached inspector, which then
    /// replaces it.
    pub fn clone_inspector(&self) -> INSP {
        self.inspector.clone()
    }
}
