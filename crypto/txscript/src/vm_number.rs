//!
//! VM number encoding: little-endian magnitude, sign carried by the top bit
//! of the last byte.
//!

use crate::TxScriptError;

/// Minimal encoding of `value`. Zero is the empty byte string, and a spare
/// byte is appended whenever the magnitude already uses the sign bit.
pub fn encode_vm_number(value: i64) -> Vec<u8> {
    let magnitude = value.unsigned_abs();
    let width = (u64::BITS - magnitude.leading_zeros()).div_ceil(8) as usize;
    let mut bytes = magnitude.to_le_bytes()[..width].to_vec();
    match bytes.last() {
        Some(last) if last & 0x80 != 0 => bytes.push(0),
        _ => {}
    }
    if value < 0 {
        if let Some(last) = bytes.last_mut() {
            *last |= 0x80;
        }
    }
    bytes
}

/// Encodes `value` into exactly `length` bytes. The sign moves to the last
/// byte so contracts can split fixed-width numbers out of a commitment.
pub fn pad_vm_number(value: i64, length: usize) -> Result<Vec<u8>, TxScriptError> {
    let magnitude = value.unsigned_abs().to_le_bytes();
    let width = magnitude.iter().rposition(|&byte| byte != 0).map_or(0, |index| index + 1);
    let fits = match width {
        0 => true,
        _ => width < length || (width == length && magnitude[width - 1] & 0x80 == 0),
    };
    if !fits {
        return Err(TxScriptError::PaddingTooShort { value, length });
    }
    let mut bytes = vec![0u8; length];
    bytes[..width].copy_from_slice(&magnitude[..width]);
    if value < 0 {
        if let Some(last) = bytes.last_mut() {
            *last |= 0x80;
        }
    }
    Ok(bytes)
}
