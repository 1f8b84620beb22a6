//! # Huffman - Prefix Coding for Byte Streams
//!
//! A Rust implementation of Huffman coding with a portable, versioned
//! container format.
//!
//! Compression runs in five steps:
//! 1. **Frequency model**: count each distinct byte of the input
//! 2. **Tree building**: merge the two lightest nodes until one remains,
//!    breaking ties deterministically
//! 3. **Code table**: `0` for each left edge, `1` for each right edge
//! 4. **Encoding**: concatenate the codes and pack them MSB-first
//! 5. **Container**: store the tree shape, bit count and packed bits
//!
//! ## Example
//!
//! ```
//! use huffman_rs::{compress, decompress, estimated_sizes};
//!
//! let text = "abracadabra";
//! let compressed = compress(text)?;
//!
//! // Reconstructs the original text
//! assert_eq!(decompress(&compressed.artifact)?, text);
//!
//! let sizes = estimated_sizes(text, &compressed.artifact)?;
//! assert!(sizes.compressed_bytes < sizes.original_bytes);
//! # Ok::<(), huffman_rs::HuffmanError>(())
//! ```
//!
//! ## Determinism
//!
//! The same input always produces byte-identical artifacts. Ties between
//! nodes of equal weight are broken by byte value for leaves and by creation
//! order for merged nodes, with leaves ahead of merged nodes.

mod code_table;
mod container;
mod decoder;
mod encoder;
mod error;
mod frequency;
mod iter;
mod node;
mod stats;
mod tree;
mod varint;


pub use code_table::{Code, CodeTable};
pub use container::{deserialize, serialize, Artifact, Container, FORMAT_VERSION};
pub use decoder::decode;
pub use encoder::{encode, EncodedBits};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use iter::Symbols;
pub use node::{Node, ShapeRecord};
pub use stats::{estimated_sizes, size_report, SizeReport};
pub use tree::HuffmanTree;

use log::debug;

/// Result of compressing an input.
///
/// The frequency and code tables are returned for display; only the artifact
/// is needed to decompress.
#[derive(Debug, Clone)]
pub struct Compression {
    pub artifact: Artifact,
    pub codes: CodeTable,
    pub frequencies: FrequencyTable,
}

/// Compresses the UTF-8 bytes of `text`.
pub fn compress(text: &str) -> Result<Compression> {
    compress_bytes(text.as_bytes())
}

/// Compresses arbitrary bytes.
pub fn compress_bytes(input: &[u8]) -> Result<Compression> {
    let frequencies = FrequencyTable::count(input);
    let tree = HuffmanTree::build(&frequencies);
    let codes = CodeTable::generate(tree.as_ref());
    let encoded = encode(input, &codes)?;
    let artifact = serialize(tree.as_ref(), encoded.bit_count, &encoded.packed)?;

    debug!(
        "compressed {} bytes ({} distinct) into {} bits, artifact {} bytes",
        input.len(),
        frequencies.len(),
        encoded.bit_count,
        artifact.len()
    );

    Ok(Compression {
        artifact,
        codes,
        frequencies,
    })
}

/// Decompresses an artifact produced by [`compress`] back into text.
///
/// Fails with [`HuffmanError::InvalidUtf8`] if the artifact holds bytes that
/// are not UTF-8, e.g. one made by [`compress_bytes`].
pub fn decompress(artifact: &Artifact) -> Result<String> {
    Ok(String::from_utf8(decompress_bytes(artifact)?)?)
}

/// Decompresses an artifact into the original bytes.
pub fn decompress_bytes(artifact: &Artifact) -> Result<Vec<u8>> {
    let container = deserialize(artifact)?;
    let output = container.decode()?;

    debug!(
        "decompressed {} bits from a {} byte artifact into {} bytes",
        container.bit_count,
        artifact.len(),
        output.len()
    );
    Ok(output)
}
