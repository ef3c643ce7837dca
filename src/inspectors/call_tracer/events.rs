//! Host-agnostic event API of the call tracer
//!
//! These are the four callbacks an execution host drives the tracer with.
//! None of them fail and none of them block: failures observed during
//! execution are recorded inside the tree, and the finished tree is queued
//! for scanning without waiting for the scan.

use std::{sync::Arc, time::Duration};

use revm::bytecode::opcode;
use tracing::warn;

use super::CallTracer;
use crate::{
    errors::CallError,
    scanner::service::ScanJob,
    types::{Address, Bytes, CallKind, CallRecord, TracedCall, U256},
    utils::{error_utils::decode_revert_reason, stack_utils::callee_from_stack},
};

/// View of one executed instruction
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    /// Execution depth of the frame running the instruction (top-level = 1)
    pub depth: usize,
    /// Opcode about to execute
    pub opcode: u8,
    /// Data stack, bottom to top
    pub stack: &'a [U256],
    /// Address of the executing frame
    pub address: Address,
}

impl CallTracer {
    /// Starts a new trace for a top-level call
    ///
    /// Discards any previous frame stack and opens the root record. The
    /// transferred `value` is only recorded on the root.
    pub fn on_call_begin(
        &mut self,
        from: Address,
        to: Address,
        is_create: bool,
        input: Bytes,
        value: U256,
    ) {
        let kind = if is_create { CallKind::Create } else { CallKind::Call };
        let mut root = CallRecord::new(kind, from, to);
        root.input = input;
        root.value = Some(value);

        self.frames.reset(root);
        self.max_depth = 0;
        self.started_at = Some(std::time::Instant::now());
    }

    /// Processes one executed instruction
    ///
    /// # Processing Order
    /// 1. Tracks the deepest depth seen
    /// 2. A faulting instruction is handed to [`CallTracer::on_fault`]
    /// 3. `REVERT` marks the innermost frame as reverted
    /// 4. `CREATE`/`CREATE2` open a frame targeting the creator itself
    /// 5. `SELFDESTRUCT` is ignored
    /// 6. Call instructions open a frame for the callee read from the stack
    /// 7. Any other instruction may close a returned sub-call
    pub fn on_step(&mut self, step: Step<'_>, fault: Option<CallError>) {
        self.max_depth = self.max_depth.max(step.depth);
        if self.frames.is_empty() {
            return;
        }

        if let Some(error) = fault {
            self.on_fault(step.depth, error);
            return;
        }

        match step.opcode {
            opcode::REVERT => {
                self.frames.fail_top(CallError::Reverted);
            }
            opcode::SELFDESTRUCT => {}
            op => match CallKind::from_opcode(op) {
                Some(kind) if kind.is_create() => {
                    self.frames
                        .push(CallRecord::new(kind, step.address, step.address));
                }
                Some(kind) => {
                    let callee = callee_from_stack(step.stack).unwrap_or_default();
                    self.frames.push(CallRecord::new(kind, step.address, callee));
                }
                None => {
                    self.frames.observe_frame_return(step.depth);
                }
            },
        }
    }

    /// Records an unrecoverable fault at `depth`
    ///
    /// The innermost frame takes the error unless it already failed, in which
    /// case nothing changes. A failed sub-call is closed into its parent; a
    /// failed root stays open until the call ends.
    ///
    /// Frames deeper than `depth` can only be left over from a missed return;
    /// they are closed first so the error lands on the faulting frame.
    pub fn on_fault(&mut self, depth: usize, error: CallError) {
        self.frames.fold_above(depth);
        if self.frames.fail_top(error) {
            self.frames.pop_into_parent();
        }
    }

    /// Finishes the trace of the top-level call
    ///
    /// Closes any frame still open, publishes the finished tree as the
    /// tracer's output and queues it for scanning. Never waits for the scan.
    pub fn on_call_end(
        &mut self,
        output: Bytes,
        gas_used: u64,
        elapsed: Duration,
        failure: Option<CallError>,
    ) {
        let Some(root) = self.frames.take_root() else {
            return;
        };
        self.started_at = None;

        let revert_reason = match (&failure, &root.error) {
            (Some(CallError::Reverted), _) | (None, Some(CallError::Reverted)) => {
                decode_revert_reason(&output)
            }
            _ => None,
        };

        let root = Arc::new(root);
        if let Some(queue) = &self.queue {
            let job = ScanJob {
                root: Arc::clone(&root),
                max_depth: self.max_depth,
            };
            if let Err(error) = queue.submit(job) {
                warn!(target: "safe_trace::tracer", %error, "Dropping finished call tree");
            }
        }

        self.last_trace = Some(TracedCall {
            root,
            max_depth: self.max_depth,
            output,
            gas_used,
            elapsed,
            failure,
            revert_reason,
        });
    }

    /// Time since the current top-level call started
    pub(crate) fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    /// Sets the root target once a top-level creation knows its address
    pub(crate) fn resolve_root_target(&mut self, address: Address) {
        if let Some(root) = self.frames.root_mut() {
            root.to = address;
        }
    }
}
