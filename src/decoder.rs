use crate::error::Result;
use crate::iter::Symbols;
use crate::tree::HuffmanTree;

/// Decodes exactly `bit_count` bits of `packed` against `tree`.
///
/// Padding bits after `bit_count` are never read. A single-leaf tree turns
/// every bit into one copy of its symbol. See [`Symbols`] for the error cases.
pub fn decode(bit_count: u64, packed: &[u8], tree: Option<&HuffmanTree>) -> Result<Vec<u8>> {
    Symbols::new(bit_count, packed, tree)?.collect()
}
