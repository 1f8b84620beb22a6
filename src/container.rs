//! Persisted artifact format.
//!
//! ```text
//! [1 byte]  format version
//! [varint]  node count
//! node records in pre-order, each:
//!   [1 byte] tag: 0x00 internal, 0x01 leaf
//!   [1 byte] symbol, leaves only
//! [varint]  bit count
//! [ceil(bit count / 8) bytes] packed bits, MSB first
//! ```
//!
//! Varints are unsigned LEB128. Weights are not stored; only the tree shape
//! is needed to decode.

use crate::decoder;
use crate::error::{HuffmanError, Result};
use crate::node::ShapeRecord;
use crate::tree::HuffmanTree;
use crate::varint;
use log::{debug, warn};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Version byte written at the start of every artifact.
pub const FORMAT_VERSION: u8 = 1;

const TAG_INTERNAL: u8 = 0x00;
const TAG_LEAF: u8 = 0x01;

/// A tree over bytes has at most 256 leaves and 255 internal nodes.
const MAX_NODES: u64 = 511;

/// The serialized form of a compressed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
}

impl Artifact {
    /// Wraps raw bytes, e.g. read from disk. Validation happens in [`deserialize`].
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of encoded bits declared by the artifact.
    ///
    /// Runs a full [`deserialize`], rebuilding the tree, so a corrupt artifact
    /// is reported here too. Callers that also decode should keep the
    /// [`Container`] instead of calling this.
    pub fn parse_bit_count(&self) -> Result<u64> {
        deserialize(self).map(|container| container.bit_count)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    /// Reads an artifact until EOF.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            bytes: fs::read(path)?,
        })
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for Artifact {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// The parsed contents of an [`Artifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub tree: Option<HuffmanTree>,
    pub bit_count: u64,
    pub packed: Vec<u8>,
}

impl Container {
    /// Decodes the packed bits against the stored tree.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decoder::decode(self.bit_count, &self.packed, self.tree.as_ref())
    }
}

/// Writes `tree`, `bit_count` and `packed` into a new artifact.
///
/// `packed` must hold exactly `ceil(bit_count / 8)` bytes, as produced by
/// [`crate::encode`]. Any other length fails with
/// [`HuffmanError::CorruptArtifact`].
pub fn serialize(
    tree: Option<&HuffmanTree>,
    bit_count: u64,
    packed: &[u8],
) -> Result<Artifact> {
    let expected = bit_count.div_ceil(8);
    if packed.len() as u64 != expected {
        return Err(HuffmanError::corrupt(format!(
            "{} bits need {} payload bytes, got {}",
            bit_count,
            expected,
            packed.len()
        )));
    }

    let records = tree.map(HuffmanTree::preorder).unwrap_or_default();
    let mut bytes =
        Vec::with_capacity(1 + 2 * records.len() + 2 * varint::MAX_ENCODED_LEN + packed.len());

    bytes.push(FORMAT_VERSION);
    varint::write_to_vec(&mut bytes, records.len() as u64);
    for record in &records {
        match *record {
            ShapeRecord::Internal => bytes.push(TAG_INTERNAL),
            ShapeRecord::Leaf(symbol) => {
                bytes.push(TAG_LEAF);
                bytes.push(symbol);
            }
        }
    }
    varint::write_to_vec(&mut bytes, bit_count);
    bytes.extend_from_slice(packed);

    debug!(
        "serialized {} nodes and {} bits into {} bytes",
        records.len(),
        bit_count,
        bytes.len()
    );
    Ok(Artifact { bytes })
}

/// Parses an artifact back into its tree, bit count and packed bits.
///
/// Fails with [`HuffmanError::CorruptArtifact`] on any structural
/// inconsistency: unknown version, truncation, bad tags, a node count that
/// does not match the records, duplicate leaves, a bit count larger than the
/// payload, or trailing bytes.
pub fn deserialize(artifact: &Artifact) -> Result<Container> {
    parse(&artifact.bytes).map_err(|err| {
        warn!("rejected artifact of {} bytes: {}", artifact.len(), err);
        err
    })
}

fn parse(data: &[u8]) -> Result<Container> {
    let mut reader = ByteReader::new(data);

    let version = reader.read_u8("format version")?;
    if version != FORMAT_VERSION {
        return Err(HuffmanError::corrupt(format!(
            "unsupported format version {}",
            version
        )));
    }

    let node_count = reader.read_varint("node count")?;
    if node_count > MAX_NODES || (node_count != 0 && node_count % 2 == 0) {
        return Err(HuffmanError::corrupt(format!(
            "node count {} cannot describe a full binary tree over bytes",
            node_count
        )));
    }

    let records = read_records(&mut reader, node_count as usize)?;

    let bit_count = reader.read_varint("bit count")?;
    let payload_len = bit_count.div_ceil(8);
    if payload_len > reader.remaining() as u64 {
        return Err(HuffmanError::corrupt(format!(
            "bit count {} needs {} payload bytes but only {} remain",
            bit_count,
            payload_len,
            reader.remaining()
        )));
    }
    let packed = reader.take(payload_len as usize, "payload")?.to_vec();
    if reader.remaining() != 0 {
        return Err(HuffmanError::corrupt(format!(
            "{} trailing bytes after payload",
            reader.remaining()
        )));
    }

    Ok(Container {
        tree: HuffmanTree::from_shape(&records)?,
        bit_count,
        packed,
    })
}

/// Reads `node_count` pre-order records, checking that they close exactly one tree.
fn read_records(reader: &mut ByteReader<'_>, node_count: usize) -> Result<Vec<ShapeRecord>> {
    let mut records = Vec::with_capacity(node_count);
    // Subtrees still expected before the tree is complete
    let mut open = usize::from(node_count > 0);

    for index in 0..node_count {
        if open == 0 {
            return Err(HuffmanError::corrupt(format!(
                "tree is complete after {} of {} declared nodes",
                index, node_count
            )));
        }
        open -= 1;

        match reader.read_u8("node tag")? {
            TAG_INTERNAL => {
                records.push(ShapeRecord::Internal);
                open += 2;
            }
            TAG_LEAF => records.push(ShapeRecord::Leaf(reader.read_u8("leaf symbol")?)),
            tag => {
                return Err(HuffmanError::corrupt(format!(
                    "unknown node tag {:#04x} at record {}",
                    tag, index
                )))
            }
        }
    }

    if open != 0 {
        return Err(HuffmanError::corrupt(format!(
            "{} declared nodes leave {} subtrees unfilled",
            node_count, open
        )));
    }
    Ok(records)
}

/// Bounds-checked cursor over artifact bytes.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self, what: &str) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| HuffmanError::corrupt(format!("truncated before {}", what)))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_varint(&mut self, what: &str) -> Result<u64> {
        let (value, used) = varint::decode(&self.data[self.pos..]).map_err(|err| match err {
            HuffmanError::CorruptArtifact(msg) => HuffmanError::corrupt(format!("{}: {}", what, msg)),
            other => other,
        })?;
        self.pos += used;
        Ok(value)
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(HuffmanError::corrupt(format!("truncated {}", what)));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}
