//! REVM Inspector implementation for the call tracer
//!
//! Translates REVM's hooks into the tracer's event API:
//! - `step` feeds every instruction to `on_step`, except call-kind ones
//! - `step_end` feeds call-kind instructions once they are known to have run,
//!   or reports them as faults when they halted the frame
//! - the outermost `call`/`create` opens the trace with `on_call_begin`
//! - `call_end`/`create_end` report halted frames through `on_fault`
//! - the outermost `call_end`/`create_end` closes the trace with `on_call_end`
//!
//! Nesting itself is still inferred from steps; the frame hooks are only used
//! to find the top-level boundary and the failures that never reach a step.

use revm::{
    context::ContextTr,
    context_interface::result::HaltReason,
    interpreter::{
        interpreter::EthInterpreter,
        interpreter_types::{Jumps, LoopControl},
        CallInputs, CallOutcome, CreateInputs, CreateOutcome, InstructionResult, Interpreter,
        SuccessOrHalt,
    },
    Inspector,
};
use tracing::debug;

use super::{CallTracer, Step};
use crate::{
    errors::CallError,
    types::{Address, Bytes, CallKind, U256},
};

/// Call-kind instruction waiting for its outcome
///
/// Keeps the two top stack words, which hold the callee; the instruction
/// consumes them before `step_end` runs.
#[derive(Debug, Clone)]
pub(super) struct PendingCall {
    depth: usize,
    opcode: u8,
    stack: Vec<U256>,
    address: Address,
}

impl PendingCall {
    fn from_step(step: Step<'_>) -> Self {
        let top = step.stack.len().saturating_sub(2);
        Self {
            depth: step.depth,
            opcode: step.opcode,
            stack: step.stack[top..].to_vec(),
            address: step.address,
        }
    }

    fn as_step(&self) -> Step<'_> {
        Step {
            depth: self.depth,
            opcode: self.opcode,
            stack: &self.stack,
            address: self.address,
        }
    }
}

impl<CTX> Inspector<CTX, EthInterpreter> for CallTracer
where
    CTX: ContextTr,
{
    /// Feeds the instruction about to execute to the tracer
    ///
    /// The depth of the running frame is the number of frames entered and not
    /// yet ended, so the top-level call runs at depth 1.
    ///
    /// Call-kind instructions are held back until `step_end`: they may still
    /// halt on gas or stack checks without ever entering the callee.
    fn step(&mut self, interp: &mut Interpreter<EthInterpreter>, _context: &mut CTX) {
        let step = Step {
            depth: self.host_frames,
            opcode: interp.bytecode.opcode(),
            stack: interp.stack.data(),
            address: interp.input.target_address,
        };
        if CallKind::from_opcode(step.opcode).is_some() {
            self.pending_call = Some(PendingCall::from_step(step));
            return;
        }
        self.on_step(step, None);
    }

    /// Releases a held back call-kind instruction
    ///
    /// A halt is delivered as the instruction's fault; the frame's own
    /// `call_end` must not report it a second time.
    fn step_end(&mut self, interp: &mut Interpreter<EthInterpreter>, _context: &mut CTX) {
        let Some(pending) = self.pending_call.take() else {
            return;
        };
        let fault = call_error(interp.control.instruction_result());
        if fault.is_some() {
            self.step_fault = Some(pending.depth);
        }
        self.on_step(pending.as_step(), fault);
    }

    fn call(&mut self, context: &mut CTX, inputs: &mut CallInputs) -> Option<CallOutcome> {
        if self.host_frames == 0 {
            self.on_call_begin(
                inputs.caller,
                inputs.target_address,
                false,
                inputs.input.bytes(context),
                inputs.call_value(),
            );
        }
        self.host_frames += 1;
        None
    }

    /// Opens the trace for a top-level creation
    ///
    /// # Note
    /// The deployed address is unknown here; the root's target is resolved in
    /// `create_end`.
    fn create(&mut self, _context: &mut CTX, inputs: &mut CreateInputs) -> Option<CreateOutcome> {
        if self.host_frames == 0 {
            self.on_call_begin(
                inputs.caller,
                Address::ZERO,
                true,
                inputs.init_code.clone(),
                inputs.value,
            );
        }
        self.host_frames += 1;
        None
    }

    fn call_end(&mut self, _context: &mut CTX, _inputs: &CallInputs, outcome: &mut CallOutcome) {
        self.handle_frame_end(
            outcome.result.result,
            outcome.result.output.clone(),
            outcome.result.gas.spent(),
        );
    }

    fn create_end(
        &mut self,
        _context: &mut CTX,
        _inputs: &CreateInputs,
        outcome: &mut CreateOutcome,
    ) {
        if self.host_frames == 1 {
            if let Some(address) = outcome.address {
                self.resolve_root_target(address);
            }
        }
        self.handle_frame_end(
            outcome.result.result,
            outcome.result.output.clone(),
            outcome.result.gas.spent(),
        );
    }
}

impl CallTracer {
    /// Closes one host frame
    ///
    /// # Processing Steps
    /// 1. Maps the instruction result to a call failure
    /// 2. Halts and fatal errors are reported as a fault of the ending frame;
    ///    reverts were already recorded by the `REVERT` step, halts of call
    ///    instructions by `step_end`
    /// 3. Ending the outermost frame finishes the trace
    fn handle_frame_end(&mut self, result: InstructionResult, output: Bytes, gas_used: u64) {
        let level = self.host_frames;
        self.host_frames = self.host_frames.saturating_sub(1);
        let reported = self.step_fault.take() == Some(level);

        let error = call_error(result);
        if let Some(fault @ (CallError::Halted(_) | CallError::Fault(_))) = &error {
            if !reported {
                self.on_fault(level, fault.clone());
            }
        }

        if self.host_frames == 0 {
            let elapsed = self.elapsed();
            debug!(
                target: "safe_trace::tracer",
                max_depth = self.max_depth,
                gas_used,
                failed = error.is_some(),
                "Top-level call finished"
            );
            self.on_call_end(output, gas_used, elapsed, error);
        }
    }
}

/// Maps an instruction result to the failure it represents, if any
fn call_error(result: InstructionResult) -> Option<CallError> {
    match SuccessOrHalt::<HaltReason>::from(result) {
        SuccessOrHalt::Success(_) | SuccessOrHalt::Internal(_) => None,
        SuccessOrHalt::Revert => Some(CallError::Reverted),
        SuccessOrHalt::Halt(reason) => Some(CallError::Halted(format!("{reason:?}"))),
        SuccessOrHalt::FatalExternalError => Some(CallError::Fault(format!("{result:?}"))),
    }
}
