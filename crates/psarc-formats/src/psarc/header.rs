//! PSARC header structures and parsing

use binrw::BinWrite;
use binrw::io::Cursor;

use super::cursor::ByteCursor;
use super::error::{PsarcError, PsarcResult};

/// PSARC magic bytes
pub const PSARC_MAGIC: [u8; 4] = *b"PSAR";

/// Only supported compression tag
pub const ZLIB_COMPRESSION: [u8; 4] = *b"zlib";

/// Only supported block size; also the size a stored `0` chunk entry stands for
pub const BLOCK_SIZE: u32 = 65536;

/// Only supported archive flags value
///
/// Undocumented upstream. Treated as an opaque guard, never as a feature switch.
pub const ARCHIVE_FLAGS: u32 = 4;

/// Size of the plaintext header preceding the encrypted TOC
pub const HEADER_SIZE: usize = 32;

/// Archive format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinWrite)]
#[bw(big)]
pub struct Version {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// TOC geometry as declared by the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinWrite)]
#[bw(big)]
pub struct TocGeometry {
    /// Total TOC length including the 32-byte header
    pub length: u32,
    /// Descriptor record size (informational)
    pub entry_size: u32,
    /// Number of block descriptors
    pub num_entries: u32,
}

/// PSARC file header
#[derive(Debug, Clone, PartialEq, Eq, BinWrite)]
#[bw(big)]
pub struct PsarcHeader {
    /// Magic bytes (always "PSAR")
    pub magic: [u8; 4],
    /// Format version
    pub version: Version,
    /// Compression tag (always "zlib")
    pub compression: [u8; 4],
    /// TOC geometry
    pub toc: TocGeometry,
    /// Fixed block size (always 65536)
    pub block_size: u32,
    /// Archive flags (always 4)
    pub archive_flags: u32,
}

impl PsarcHeader {
    /// Create a header carrying the supported constants
    pub fn new(version: Version, toc: TocGeometry) -> Self {
        Self {
            magic: PSARC_MAGIC,
            version,
            compression: ZLIB_COMPRESSION,
            toc,
            block_size: BLOCK_SIZE,
            archive_flags: ARCHIVE_FLAGS,
        }
    }

    /// Read and validate the header, leaving the cursor on the encrypted TOC
    pub fn read(cursor: &mut ByteCursor<'_>) -> PsarcResult<Self> {
        let magic = cursor.read_string(4)?;
        if magic.as_bytes() != PSARC_MAGIC {
            return Err(PsarcError::InvalidMagic(magic));
        }

        let version = Version {
            major: cursor.read_short()?,
            minor: cursor.read_short()?,
        };

        let compression = cursor.read_string(4)?;
        if compression.as_bytes() != ZLIB_COMPRESSION {
            return Err(PsarcError::UnsupportedCompression(compression));
        }

        let toc = TocGeometry {
            length: cursor.read_int()?,
            entry_size: cursor.read_int()?,
            num_entries: cursor.read_int()?,
        };

        let block_size = cursor.read_int()?;
        if block_size != BLOCK_SIZE {
            return Err(PsarcError::UnsupportedBlockSize(block_size));
        }

        let archive_flags = cursor.read_int()?;
        if archive_flags != ARCHIVE_FLAGS {
            return Err(PsarcError::UnsupportedArchiveFlags(archive_flags));
        }

        Ok(Self {
            magic: PSARC_MAGIC,
            version,
            compression: ZLIB_COMPRESSION,
            toc,
            block_size,
            archive_flags,
        })
    }

    /// Parse a header from the start of `data`
    pub fn parse(data: &[u8]) -> PsarcResult<Self> {
        Self::read(&mut ByteCursor::new(data))
    }

    /// Serialize the header to its 32-byte form
    pub fn build(&self) -> PsarcResult<Vec<u8>> {
        let mut writer = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Length of the encrypted TOC region following the header
    pub fn encrypted_toc_len(&self) -> PsarcResult<usize> {
        (self.toc.length as usize)
            .checked_sub(HEADER_SIZE)
            .ok_or(PsarcError::InvalidTocLength(self.toc.length))
    }

    /// Offset of the first physical chunk
    pub fn data_offset(&self) -> usize {
        self.toc.length as usize
    }
}
