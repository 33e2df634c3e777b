//! Logical file reconstruction from physical chunks

use std::cmp::Ordering;

use tracing::debug;

use super::chunk::{ChunkEncoding, decode_chunk};
use super::error::{PsarcError, PsarcResult};
use super::header::BLOCK_SIZE;
use super::toc::BlockDescriptor;

/// Reassembles logical files from the archive body
#[derive(Debug, Clone, Copy)]
pub struct BlockReader<'a> {
    archive: &'a [u8],
    chunk_sizes: &'a [u32],
}

impl<'a> BlockReader<'a> {
    /// Create a reader over the whole archive buffer and its chunk-size table
    pub fn new(archive: &'a [u8], chunk_sizes: &'a [u32]) -> Self {
        Self {
            archive,
            chunk_sizes,
        }
    }

    fn physical_chunk(&self, position: usize, length: usize) -> PsarcResult<&'a [u8]> {
        position
            .checked_add(length)
            .and_then(|end| self.archive.get(position..end))
            .ok_or(PsarcError::UnexpectedEndOfData {
                offset: position,
                wanted: length,
                remaining: self.archive.len().saturating_sub(position),
            })
    }

    /// Reconstruct the logical file described by `descriptor`
    ///
    /// Chunks are consumed from `descriptor.offset` onwards, starting at the
    /// absolute position `descriptor.file_offset`, until exactly
    /// `descriptor.size` bytes have been produced.
    pub fn read_block(&self, descriptor: &BlockDescriptor) -> PsarcResult<Vec<u8>> {
        let expected = descriptor.size;
        if expected == 0 {
            return Ok(Vec::new());
        }

        let mut position = descriptor.file_offset as usize;
        let mut chunk_index = descriptor.offset as usize;
        // The declared size is untrusted; grow with the chunks actually decoded
        let mut output = Vec::with_capacity(expected.min(u64::from(BLOCK_SIZE)) as usize);
        let mut stored_chunks = 0usize;
        let mut inflated_chunks = 0usize;

        loop {
            let Some(&chunk_len) = self.chunk_sizes.get(chunk_index) else {
                return Err(PsarcError::TruncatedBlock {
                    expected,
                    actual: output.len() as u64,
                    chunk_index,
                });
            };
            let chunk_len = chunk_len as usize;

            let chunk = decode_chunk(self.physical_chunk(position, chunk_len)?);
            match chunk.encoding {
                ChunkEncoding::Zlib => inflated_chunks += 1,
                ChunkEncoding::Stored => stored_chunks += 1,
            }
            output.extend_from_slice(&chunk.data);
            position += chunk_len;
            chunk_index += 1;

            match (output.len() as u64).cmp(&expected) {
                Ordering::Less => {}
                Ordering::Equal => break,
                Ordering::Greater => {
                    return Err(PsarcError::BlockSizeOverflow {
                        expected,
                        actual: output.len() as u64,
                    });
                }
            }
        }

        debug!(
            first_chunk = descriptor.offset,
            size = expected,
            inflated_chunks,
            stored_chunks,
            "reconstructed block"
        );
        Ok(output)
    }
}
