use crate::container::Artifact;
use crate::error::Result;

/// Sizes reported to callers that display compression results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    /// Byte length of the original input
    pub original_bytes: u64,
    /// Packed payload size, `ceil(bit_count / 8)`
    pub compressed_bytes: u64,
    /// Full artifact size including the header and tree
    pub artifact_bytes: u64,
    /// Number of encoded bits
    pub bit_count: u64,
}

impl SizeReport {
    /// Compressed payload size as a percentage of the original size.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            (self.compressed_bytes as f64 / self.original_bytes as f64) * 100.0
        }
    }

    /// Average code length over the input.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.bit_count as f64 / self.original_bytes as f64
        }
    }
}

/// Reports the original size of `text` and the packed size stored in `artifact`.
pub fn estimated_sizes(text: &str, artifact: &Artifact) -> Result<SizeReport> {
    size_report(text.as_bytes(), artifact)
}

/// Byte-level form of [`estimated_sizes`], for artifacts made by
/// [`crate::compress_bytes`].
pub fn size_report(input: &[u8], artifact: &Artifact) -> Result<SizeReport> {
    let bit_count = artifact.parse_bit_count()?;
    Ok(SizeReport {
        original_bytes: input.len() as u64,
        compressed_bytes: bit_count.div_ceil(8),
        artifact_bytes: artifact.len() as u64,
        bit_count,
    })
}
