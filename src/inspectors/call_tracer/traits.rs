//! Trait implementations for CallTracer
//!
//! - `Reset`: drops all per-transaction state, keeps the scan queue
//! - `TraceOutput`: hands out the finished trace of the last top-level call

use super::CallTracer;
use crate::{
    traits::{Reset, TraceOutput},
    types::TracedCall,
};

impl Reset for CallTracer {
    /// Resets the tracer for a new transaction
    ///
    /// Clears:
    /// - Open frames and the depth counters
    /// - Any held back call instruction
    /// - The start time of the current call
    /// - The last finished trace
    fn reset(&mut self) {
        self.frames.clear();
        self.max_depth = 0;
        self.host_frames = 0;
        self.pending_call = None;
        self.step_fault = None;
        self.started_at = None;
        self.last_trace = None;
    }
}

impl TraceOutput for CallTracer {
    type Output = Option<TracedCall>;

    fn get_output(&self) -> Self::Output {
        self.last_trace.clone()
    }
}
