//! Unsigned LEB128 integers, as used by the container header.

use crate::error::{HuffmanError, Result};

/// Maximum number of bytes needed to encode a u64.
pub(crate) const MAX_ENCODED_LEN: usize = 10;

/// Appends `value` to `buffer`, seven bits per byte, low bits first.
pub(crate) fn write_to_vec(buffer: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80; // Continuation bit
        }
        buffer.push(byte);

        if value == 0 {
            break;
        }
    }
}

/// Decodes a varint from the start of `data`.
///
/// Returns the value and the number of bytes consumed.
pub(crate) fn decode(data: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;

    for (index, &byte) in data.iter().take(MAX_ENCODED_LEN).enumerate() {
        let payload = (byte & 0x7F) as u64;
        // The tenth byte may only carry the top bit of a u64
        if shift == 63 && payload > 1 {
            return Err(HuffmanError::corrupt("varint overflows 64 bits"));
        }
        result |= payload << shift;

        if byte & 0x80 == 0 {
            return Ok((result, index + 1));
        }
        shift += 7;
    }

    if data.len() >= MAX_ENCODED_LEN {
        Err(HuffmanError::corrupt("varint longer than 10 bytes"))
    } else {
        Err(HuffmanError::corrupt("truncated varint"))
    }
}
