use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use bitvec::prelude::*;

/// A packed bit sequence together with its exact length in bits.
///
/// Bits are stored most significant bit first; the last byte is zero-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBits {
    pub bit_count: u64,
    pub packed: Vec<u8>,
}

impl EncodedBits {
    /// Size of the packed buffer, `ceil(bit_count / 8)`.
    pub fn packed_len(&self) -> usize {
        self.packed.len()
    }
}

/// Encodes `input` with `codes`, concatenating the code of each byte.
///
/// Fails with [`HuffmanError::UnknownSymbol`] on the first byte that has no
/// code, which happens when the table was derived from a different input.
pub fn encode(input: &[u8], codes: &CodeTable) -> Result<EncodedBits> {
    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(input.len());

    for (position, &symbol) in input.iter().enumerate() {
        let code = codes
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol, position })?;
        bits.extend_from_bitslice(code.bits());
    }

    let bit_count = bits.len() as u64;
    // Dead bits of the last byte are unspecified until cleared
    bits.set_uninitialized(false);

    Ok(EncodedBits {
        bit_count,
        packed: bits.into_vec(),
    })
}
