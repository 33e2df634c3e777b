//! In-memory archive builder for tests
//!
//! Produces archives in the layout the decoder reads: the path listing as
//! logical file #0, every file split into 64 KiB blocks, each block stored
//! or zlib-compressed, and the TOC encrypted with the published key.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use psarc_crypto::TocCipher;

use crate::psarc::{
    BLOCK_SIZE, BlockDescriptor, DESCRIPTOR_SIZE, HEADER_SIZE, PsarcHeader, PsarcResult, Toc,
    TocGeometry, Version,
};

/// How the builder stores each block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStorage {
    /// Always literal
    Stored,
    /// zlib, unless the stream would not fit the chunk-size table
    Zlib,
    /// Whichever is smaller
    Smallest,
}

/// Builder for PSARC test archives
#[derive(Debug, Clone)]
pub struct PsarcBuilder {
    files: Vec<(String, Vec<u8>)>,
    storage: ChunkStorage,
    version: Version,
    cipher: TocCipher,
}

impl Default for PsarcBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PsarcBuilder {
    /// Create an empty builder storing blocks with zlib
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            storage: ChunkStorage::Zlib,
            version: Version { major: 1, minor: 4 },
            cipher: TocCipher::default(),
        }
    }

    /// Set the block storage policy
    #[must_use]
    pub fn with_storage(mut self, storage: ChunkStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Set the header version
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Encrypt the TOC with a different cipher
    #[must_use]
    pub fn with_cipher(mut self, cipher: TocCipher) -> Self {
        self.cipher = cipher;
        self
    }

    /// Add a logical file; listing order follows insertion order
    #[must_use]
    pub fn add_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.into(), data.into()));
        self
    }

    fn encode_block(&self, block: &[u8]) -> PsarcResult<Vec<u8>> {
        if self.storage == ChunkStorage::Stored {
            return Ok(block.to_vec());
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(block)?;
        let compressed = encoder.finish()?;

        let fits = compressed.len() < BLOCK_SIZE as usize;
        let keep = match self.storage {
            ChunkStorage::Zlib => fits,
            _ => fits && compressed.len() < block.len(),
        };
        Ok(if keep { compressed } else { block.to_vec() })
    }

    /// Assemble the archive
    pub fn build(&self) -> PsarcResult<Vec<u8>> {
        let listing = self
            .files
            .iter()
            .map(|(path, _)| path.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut body = Vec::new();
        let mut chunk_sizes = Vec::new();
        let mut spans = Vec::with_capacity(self.files.len() + 1);

        let contents = std::iter::once(listing.as_bytes())
            .chain(self.files.iter().map(|(_, data)| data.as_slice()));
        for content in contents {
            spans.push((chunk_sizes.len(), body.len(), content.len()));
            for block in content.chunks(BLOCK_SIZE as usize) {
                let encoded = self.encode_block(block)?;
                chunk_sizes.push(encoded.len() as u32);
                body.extend_from_slice(&encoded);
            }
        }

        let toc_length = HEADER_SIZE + spans.len() * DESCRIPTOR_SIZE + chunk_sizes.len() * 2;
        let descriptors = spans
            .into_iter()
            .map(|(first_chunk, body_offset, size)| BlockDescriptor {
                name: [0; 16],
                offset: first_chunk as u32,
                size: size as u64,
                file_offset: (toc_length + body_offset) as u64,
            })
            .collect::<Vec<_>>();

        let header = PsarcHeader::new(
            self.version,
            TocGeometry {
                length: toc_length as u32,
                entry_size: DESCRIPTOR_SIZE as u32,
                num_entries: descriptors.len() as u32,
            },
        );
        let toc = Toc {
            descriptors,
            chunk_sizes,
        };

        let mut archive = header.build()?;
        archive.extend_from_slice(&self.cipher.encrypt(&toc.build()?)?);
        archive.extend_from_slice(&body);
        Ok(archive)
    }
}
