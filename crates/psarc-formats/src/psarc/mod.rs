//! PSARC archive decoding
//!
//! A PSARC archive is a 32-byte plaintext header, an AES-encrypted table of
//! contents and a body of physical chunks. Each chunk is either a zlib stream
//! or stored verbatim. Logical files are addressed by block descriptors; the
//! first logical file lists the paths of all the others.
//!
//! # Layout
//!
//! ```text
//! 0   magic "PSAR"          4
//! 4   version major/minor   2 + 2
//! 8   compression "zlib"    4
//! 12  TOC length            4
//! 16  TOC entry size        4
//! 20  TOC entry count       4
//! 24  block size (65536)    4
//! 28  archive flags (4)     4
//! 32  encrypted TOC         TOC length - 32
//! ..  chunk data
//! ```
//!
//! # Example
//!
//! ```no_run
//! use psarc_formats::psarc::PsarcArchive;
//!
//! let data = std::fs::read("song_p.psarc")?;
//! let archive = PsarcArchive::parse(&data)?;
//! for (path, descriptor) in archive.entries() {
//!     println!("{path}: {} bytes", descriptor.size);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod block;
mod chunk;
mod cursor;
mod error;
mod header;
mod listing;
mod toc;

pub use block::BlockReader;
pub use chunk::{ChunkEncoding, DecodedChunk, decode_chunk, inflate_chunk};
pub use cursor::ByteCursor;
pub use error::{PsarcError, PsarcResult};
pub use header::{
    ARCHIVE_FLAGS, BLOCK_SIZE, HEADER_SIZE, PSARC_MAGIC, PsarcHeader, TocGeometry, Version,
    ZLIB_COMPRESSION,
};
pub use listing::{
    FileListing, HSAN_PATTERN, SONG_MANIFEST_PATTERN, is_hsan_path, is_song_manifest_path,
};
pub use toc::{BlockDescriptor, DESCRIPTOR_SIZE, Toc};

use psarc_crypto::TocCipher;
use tracing::debug;

/// Index of the descriptor holding the path listing
pub const LISTING_DESCRIPTOR: usize = 0;

/// A decoded archive over an in-memory buffer
#[derive(Debug, Clone)]
pub struct PsarcArchive<'a> {
    data: &'a [u8],
    header: PsarcHeader,
    toc: Toc,
    listing: FileListing,
}

impl<'a> PsarcArchive<'a> {
    /// Decode header, TOC and path listing with the published TOC key
    pub fn parse(data: &'a [u8]) -> PsarcResult<Self> {
        Self::parse_with_cipher(data, &TocCipher::default())
    }

    /// Decode header, TOC and path listing with an explicit TOC cipher
    pub fn parse_with_cipher(data: &'a [u8], cipher: &TocCipher) -> PsarcResult<Self> {
        let mut cursor = ByteCursor::new(data);
        let header = PsarcHeader::read(&mut cursor)?;
        debug!(
            version = %header.version,
            toc_length = header.toc.length,
            entries = header.toc.num_entries,
            "read PSARC header"
        );

        let toc = Toc::read(&mut cursor, &header, cipher)?;
        let listing_data =
            BlockReader::new(data, &toc.chunk_sizes).read_block(toc.descriptor(LISTING_DESCRIPTOR)?)?;
        let listing = FileListing::parse(&listing_data)?;
        debug!(paths = listing.len(), "read file listing");

        Ok(Self {
            data,
            header,
            toc,
            listing,
        })
    }

    /// Archive header
    pub fn header(&self) -> &PsarcHeader {
        &self.header
    }

    /// Decrypted table of contents
    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Path listing
    pub fn listing(&self) -> &FileListing {
        &self.listing
    }

    /// Listed paths paired with their descriptors
    ///
    /// Paths without a descriptor are skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BlockDescriptor)> {
        self.listing
            .paths()
            .iter()
            .enumerate()
            .filter_map(|(position, path)| {
                self.toc
                    .descriptors
                    .get(FileListing::descriptor_index(position))
                    .map(|descriptor| (path.as_str(), descriptor))
            })
    }

    /// Reconstruct the logical file at descriptor `index`
    pub fn read_descriptor(&self, index: usize) -> PsarcResult<Vec<u8>> {
        BlockReader::new(self.data, &self.toc.chunk_sizes).read_block(self.toc.descriptor(index)?)
    }

    /// Reconstruct a listed file by path
    pub fn read_file(&self, path: &str) -> PsarcResult<Vec<u8>> {
        let index = self
            .listing
            .find(path)
            .ok_or_else(|| PsarcError::FileNotFound(path.to_string()))?;
        self.read_descriptor(index)
    }

    /// Raw bytes of the first `.hsan` manifest
    pub fn hsan(&self) -> PsarcResult<Vec<u8>> {
        self.read_descriptor(self.listing.hsan_index()?)
    }

    /// The first `.hsan` manifest as text
    pub fn hsan_text(&self) -> PsarcResult<String> {
        String::from_utf8(self.hsan()?).map_err(|source| PsarcError::InvalidUtf8 {
            context: HSAN_PATTERN.to_string(),
            source,
        })
    }

    /// Every song manifest as `(path, bytes)`, in listing order
    pub fn song_manifests(&self) -> PsarcResult<Vec<(String, Vec<u8>)>> {
        self.listing
            .song_manifest_indices()?
            .into_iter()
            .map(|(path, index)| Ok((path.to_string(), self.read_descriptor(index)?)))
            .collect()
    }
}
