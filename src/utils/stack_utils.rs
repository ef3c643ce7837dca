//! Helpers for reading the interpreter stack

use alloy::primitives::{Address, B256, U256};

/// Read the callee of a call-kind instruction from the stack view
///
/// `stack` is ordered bottom to top, as exposed by the interpreter. All call
/// instructions take the gas limit on top and the target address right below
/// it, so the callee lives in the second-from-top slot. Returns `None` when
/// the stack holds fewer than two words.
pub fn callee_from_stack(stack: &[U256]) -> Option<Address> {
    let index = stack.len().checked_sub(2)?;
    stack.get(index).map(|word| word_to_address(*word))
}

/// Truncate a stack word to its low 20 bytes
pub fn word_to_address(word: U256) -> Address {
    Address::from_word(B256::from(word.to_be_bytes::<32>()))
}
