//! Revert output decoding
//!
//! Turns the raw output of a reverted call into a readable reason:
//! - `Error(string)` reverts (selector `0x08c379a0`)
//! - `Panic(uint256)` codes (selector `0x4e487b71`)
//! - anything else is rendered as hex

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::hex,
};

/// Decode the reason carried by a revert output
///
/// # Returns
/// * `Some(String)` - Decoded message, panic description or hex fallback
/// * `None` - If the output is empty
pub fn decode_revert_reason(output: &[u8]) -> Option<String> {
    if output.is_empty() {
        return None;
    }
    Some(parse_custom_error(output).unwrap_or_else(|| format!("0x{}", hex::encode(output))))
}

/// Parse `Error(string)` and `Panic(uint256)` payloads
///
/// Returns `None` if the selector is unknown or the payload does not decode.
pub fn parse_custom_error(output: &[u8]) -> Option<String> {
    let (selector, payload) = output.split_first_chunk::<4>()?;
    match selector {
        [0x08, 0xc3, 0x79, 0xa0] => match DynSolType::String.abi_decode(payload) {
            Ok(DynSolValue::String(reason)) => Some(reason),
            _ => None,
        },
        [0x4e, 0x48, 0x7b, 0x71] => match DynSolType::Uint(256).abi_decode(payload) {
            Ok(DynSolValue::Uint(code, _)) => Some(panic_message(code.saturating_to::<u64>())),
            _ => None,
        },
        _ => None,
    }
}

fn panic_message(code: u64) -> String {
    let reason = match code {
        0x01 => "Assertion failed",
        0x11 => "Arithmetic overflow",
        0x12 => "Division by zero",
        0x21 => "Invalid enum value",
        0x22 => "Invalid storage byte array access",
        0x31 => "Pop on empty array",
        0x32 => "Array access out of bounds",
        0x41 => "Out of memory",
        0x51 => "Zero-initialized function pointer",
        code => return format!("Panic: Unknown error code (0x{code:x})"),
    };
    format!("Panic: {reason}")
}
