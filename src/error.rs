use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors reported by the coding engine.
///
/// Every failure is returned to the caller; the engine never truncates output
/// or retries on its own.
#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("symbol {symbol:#04x} at position {position} has no code in the code table")]
    UnknownSymbol { symbol: u8, position: usize },

    #[error("encoded bits are present but the tree is empty")]
    CorruptTree,

    #[error("tree walk failed at bit {bit_index}")]
    Traversal { bit_index: u64 },

    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    #[error("decoded bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        HuffmanError::CorruptArtifact(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;
