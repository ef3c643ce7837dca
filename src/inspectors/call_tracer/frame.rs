//! Frame stack of the call tracer
//!
//! The frame stack holds the call records that are currently open, root at
//! index 0. Its height equals the number of calls the tracer believes are
//! executing. Finished frames are moved into their parent's children, so a
//! record only ever appears in the tree once it is complete.

use crate::{errors::CallError, types::CallRecord};

/// Ordered stack of open call records
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    frames: Vec<CallRecord>,
}

impl FrameStack {
    /// Discards every open frame and starts over from `root`
    pub fn reset(&mut self, root: CallRecord) {
        self.frames.clear();
        self.frames.push(root);
    }

    /// Drops all frames
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Number of open frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The root frame, if tracing has started
    pub fn root(&self) -> Option<&CallRecord> {
        self.frames.first()
    }

    /// The innermost open frame
    pub fn top(&self) -> Option<&CallRecord> {
        self.frames.last()
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut CallRecord> {
        self.frames.first_mut()
    }

    /// Opens a sub-call
    pub fn push(&mut self, record: CallRecord) {
        self.frames.push(record);
    }

    /// Records `error` on the innermost frame unless it already failed
    ///
    /// Returns whether the error was stored.
    pub fn fail_top(&mut self, error: CallError) -> bool {
        self.frames
            .last_mut()
            .is_some_and(|frame| frame.set_error(error))
    }

    /// Closes the innermost frame and appends it to its parent's children
    ///
    /// The root is never popped; returns `false` when only the root is open.
    pub fn pop_into_parent(&mut self) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        match (self.frames.pop(), self.frames.last_mut()) {
            (Some(finished), Some(parent)) => {
                parent.children.push(finished);
                true
            }
            _ => false,
        }
    }

    /// Detects a sub-call return from the depth of an ordinary instruction
    ///
    /// A frame at index `n` executes at depth `n + 1`. When an ordinary
    /// instruction runs at `depth == len - 1`, execution is back in the
    /// parent of the innermost frame, so that frame has returned and is
    /// closed. Fires at most once per call; returns whether a frame closed.
    pub fn observe_frame_return(&mut self, depth: usize) -> bool {
        if self.frames.len() >= 2 && depth == self.frames.len() - 1 {
            return self.pop_into_parent();
        }
        false
    }

    /// Closes frames until at most `height` remain (the root always stays)
    ///
    /// Used when the host reports an event for a shallower frame while deeper
    /// frames are still open, which happens only if a return was missed.
    /// Returns the number of frames closed.
    pub fn fold_above(&mut self, height: usize) -> usize {
        let mut closed = 0;
        while self.frames.len() > height.max(1) && self.pop_into_parent() {
            closed += 1;
        }
        closed
    }

    /// Finalizes every open frame into the root and takes the root out
    pub fn take_root(&mut self) -> Option<CallRecord> {
        self.fold_above(1);
        self.frames.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallKind;
    use alloy::primitives::Address;

    fn record(kind: CallKind, to: u8) -> CallRecord {
        CallRecord::new(kind, Address::ZERO, Address::repeat_byte(to))
    }

    fn stack_with(depth: usize) -> FrameStack {
        let mut stack = FrameStack::default();
        stack.reset(record(CallKind::Call, 0));
        for i in 1..depth {
            stack.push(record(CallKind::Call, i as u8));
        }
        stack
    }

    #[test]
    fn test_observe_frame_return_fires_once_per_sub_call() {
        let mut stack = stack_with(2);

        // Still executing inside the sub-call
        assert!(!stack.observe_frame_return(2));
        assert_eq!(stack.len(), 2);

        // Back at the root's depth
        assert!(stack.observe_frame_return(1));
        assert_eq!(stack.len(), 1);

        // Further root instructions do not pop the root
        assert!(!stack.observe_frame_return(1));
        assert!(!stack.observe_frame_return(0));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.root().unwrap().children.len(), 1);
    }

    #[test]
    fn test_observe_frame_return_ignores_other_depths() {
        let mut stack = stack_with(3);
        // A step two levels up does not match the heuristic
        assert!(!stack.observe_frame_return(1));
        assert_eq!(stack.len(), 3);
        assert!(stack.observe_frame_return(2));
        assert!(stack.observe_frame_return(1));
        assert_eq!(stack.len(), 1);

        let root = stack.root().unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn test_fail_top_keeps_first_error() {
        let mut stack = stack_with(1);
        assert!(stack.fail_top(CallError::Reverted));
        assert!(!stack.fail_top(CallError::Halted("OutOfGas".into())));
        assert_eq!(stack.top().unwrap().error, Some(CallError::Reverted));
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut stack = stack_with(1);
        assert!(!stack.pop_into_parent());
        assert_eq!(stack.fold_above(0), 0);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_take_root_folds_dangling_frames() {
        let mut stack = stack_with(3);
        let root = stack.take_root().unwrap();
        assert!(stack.is_empty());
        assert_eq!(root.subtree_size(), 3);
        assert_eq!(root.get(&[0, 0]).unwrap().to, Address::repeat_byte(2));
    }
}
