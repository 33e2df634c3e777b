//! PSARC error types

use psarc_crypto::CryptoError;
use thiserror::Error;

/// PSARC-specific error type
#[derive(Debug, Error)]
pub enum PsarcError {
    /// Invalid PSARC magic
    #[error("invalid PSARC magic: expected \"PSAR\", got {0:?}")]
    InvalidMagic(String),

    /// Compression tag other than "zlib"
    #[error("unsupported compression: expected \"zlib\", got {0:?}")]
    UnsupportedCompression(String),

    /// Block size other than 65536
    #[error("unsupported block size: expected 65536, got {0}")]
    UnsupportedBlockSize(u32),

    /// Archive flags other than 4
    #[error("unsupported archive flags: expected 4, got {0}")]
    UnsupportedArchiveFlags(u32),

    /// Declared TOC length smaller than the plaintext header
    #[error("invalid TOC length: {0} (must be at least 32)")]
    InvalidTocLength(u32),

    /// Read past the end of the buffer
    #[error("unexpected end of data at offset {offset}: wanted {wanted} bytes, {remaining} remaining")]
    UnexpectedEndOfData {
        /// Cursor position of the failed read
        offset: usize,
        /// Bytes requested
        wanted: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Integer width the cursor cannot represent
    #[error("invalid field width: {0} bytes (maximum 8)")]
    InvalidFieldWidth(usize),

    /// TOC decryption failed
    #[error("TOC decryption failed: {0}")]
    DecryptionFailed(#[from] CryptoError),

    /// Reconstructed block grew past its declared size
    #[error("block size overflow: expected {expected} bytes, reconstructed {actual}")]
    BlockSizeOverflow {
        /// Declared decompressed size
        expected: u64,
        /// Bytes produced when the overflow was detected
        actual: u64,
    },

    /// Chunk-size table ran out before the block was complete
    #[error("truncated block: expected {expected} bytes, chunk table ended at index {chunk_index} after {actual}")]
    TruncatedBlock {
        /// Declared decompressed size
        expected: u64,
        /// Bytes produced before the table ran out
        actual: u64,
        /// First missing chunk index
        chunk_index: usize,
    },

    /// Descriptor index outside the TOC
    #[error("no block descriptor at index {index} (TOC has {count})")]
    MissingDescriptor {
        /// Requested index
        index: usize,
        /// Number of descriptors in the TOC
        count: usize,
    },

    /// No listed path matched a required manifest pattern
    #[error("no manifest matching {0}")]
    MissingManifest(&'static str),

    /// Path not present in the file listing
    #[error("file not found in archive: {0}")]
    FileNotFound(String),

    /// Logical file is not valid UTF-8 text
    #[error("invalid UTF-8 in {context}: {source}")]
    InvalidUtf8 {
        /// What was being decoded
        context: String,
        /// Underlying decode error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary serialization error
    #[error("binary serialization error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl PsarcError {
    /// Whether this error is one of the header constant checks
    pub fn is_format_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic(_)
                | Self::UnsupportedCompression(_)
                | Self::UnsupportedBlockSize(_)
                | Self::UnsupportedArchiveFlags(_)
        )
    }
}

/// Result type for PSARC operations
pub type PsarcResult<T> = Result<T, PsarcError>;
