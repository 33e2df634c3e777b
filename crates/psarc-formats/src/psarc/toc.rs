//! Table of contents: block descriptors and the chunk-size table

use binrw::io::{Seek, Write};
use binrw::{BinResult, BinWrite};
use psarc_crypto::TocCipher;
use tracing::debug;

use super::cursor::ByteCursor;
use super::error::{PsarcError, PsarcResult};
use super::header::{BLOCK_SIZE, PsarcHeader};

/// Size of one descriptor record (16 + 4 + 5 + 5)
pub const DESCRIPTOR_SIZE: usize = 30;

/// Width of the size and file offset fields
const U40_WIDTH: usize = 5;

/// Width of one chunk-size table entry
const CHUNK_SIZE_WIDTH: usize = 2;

/// Location and size of one logical file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Name field, usually a path hash or zeros
    pub name: [u8; 16],
    /// Index of the first chunk in the chunk-size table
    pub offset: u32,
    /// Decompressed size in bytes
    pub size: u64,
    /// Absolute archive offset of the first chunk
    pub file_offset: u64,
}

impl BlockDescriptor {
    /// Read one 30-byte descriptor record
    pub fn read(cursor: &mut ByteCursor<'_>) -> PsarcResult<Self> {
        Ok(Self {
            name: cursor.read_array::<16>()?,
            offset: cursor.read_int()?,
            size: cursor.read_number(U40_WIDTH)?,
            file_offset: cursor.read_number(U40_WIDTH)?,
        })
    }
}

fn write_u40<W: Write + Seek>(writer: &mut W, value: u64) -> BinResult<()> {
    writer.write_all(&value.to_be_bytes()[8 - U40_WIDTH..])?;
    Ok(())
}

impl BinWrite for BlockDescriptor {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&self.name)?;
        self.offset.write_options(writer, binrw::Endian::Big, ())?;
        write_u40(writer, self.size)?;
        write_u40(writer, self.file_offset)?;
        Ok(())
    }
}

/// Decrypted table of contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    /// One descriptor per logical file, in archive order
    pub descriptors: Vec<BlockDescriptor>,
    /// Physical size of every chunk, with `0` already mapped to the block size
    pub chunk_sizes: Vec<u32>,
}

impl Toc {
    /// Parse a decrypted TOC buffer
    ///
    /// The descriptor table must be complete; the chunk-size table runs to the
    /// end of the buffer and a trailing odd byte is ignored.
    pub fn parse(plaintext: &[u8], num_entries: u32) -> PsarcResult<Self> {
        let mut cursor = ByteCursor::new(plaintext);

        let descriptors = (0..num_entries)
            .map(|_| BlockDescriptor::read(&mut cursor))
            .collect::<PsarcResult<Vec<_>>>()?;

        let mut chunk_sizes = Vec::with_capacity(cursor.remaining() / CHUNK_SIZE_WIDTH);
        while let Some(stored) = cursor.try_read_number(CHUNK_SIZE_WIDTH) {
            chunk_sizes.push(match stored {
                0 => BLOCK_SIZE,
                size => size as u32,
            });
        }

        debug!(
            descriptors = descriptors.len(),
            chunks = chunk_sizes.len(),
            "parsed TOC"
        );

        Ok(Self {
            descriptors,
            chunk_sizes,
        })
    }

    /// Decrypt the TOC region under the cursor and parse it
    ///
    /// The cursor must sit on the first byte after the header.
    pub fn read(
        cursor: &mut ByteCursor<'_>,
        header: &PsarcHeader,
        cipher: &TocCipher,
    ) -> PsarcResult<Self> {
        let ciphertext = cursor.read_bytes(header.encrypted_toc_len()?)?;
        let plaintext = cipher.decrypt(ciphertext)?;
        Self::parse(&plaintext, header.toc.num_entries)
    }

    /// Number of physical chunks
    pub fn chunk_count(&self) -> usize {
        self.chunk_sizes.len()
    }

    /// Descriptor at `index`
    pub fn descriptor(&self, index: usize) -> PsarcResult<&BlockDescriptor> {
        self.descriptors
            .get(index)
            .ok_or(PsarcError::MissingDescriptor {
                index,
                count: self.descriptors.len(),
            })
    }

    /// Serialize to the plaintext layout, mapping full blocks back to `0`
    pub fn build(&self) -> PsarcResult<Vec<u8>> {
        let mut writer = binrw::io::Cursor::new(Vec::with_capacity(
            self.descriptors.len() * DESCRIPTOR_SIZE + self.chunk_sizes.len() * CHUNK_SIZE_WIDTH,
        ));
        for descriptor in &self.descriptors {
            descriptor.write_options(&mut writer, binrw::Endian::Big, ())?;
        }
        for &size in &self.chunk_sizes {
            let stored = if size == BLOCK_SIZE { 0 } else { size as u16 };
            stored.write_options(&mut writer, binrw::Endian::Big, ())?;
        }
        Ok(writer.into_inner())
    }
}
