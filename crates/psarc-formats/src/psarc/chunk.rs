//! Physical chunk decoding

use std::borrow::Cow;
use std::io::{self, Read};

use flate2::read::ZlibDecoder;

use super::header::BLOCK_SIZE;

/// How a physical chunk was stored
///
/// The format carries no per-chunk flag: chunks that did not shrink under
/// compression are stored verbatim, so inflation is attempted first and the
/// raw bytes are used when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEncoding {
    /// zlib stream that inflated successfully
    Zlib,
    /// Literal bytes
    Stored,
}

/// A chunk after decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedChunk<'a> {
    /// Which variant applied
    pub encoding: ChunkEncoding,
    /// Decoded bytes, borrowed from the archive when stored
    pub data: Cow<'a, [u8]>,
}

/// Inflate a zlib chunk, returning `None` when the bytes are not a valid stream
///
/// Output is capped one byte past the block size so a corrupt stream cannot
/// grow without bound; the block reconstructor reports the overflow. The
/// remainder of a capped stream is still decoded and discarded, so a stream
/// that breaks after the cap is rejected like any other.
pub fn inflate_chunk(raw: &[u8]) -> Option<Vec<u8>> {
    if raw.is_empty() {
        return None;
    }
    let mut decoder = ZlibDecoder::new(raw);
    let mut decompressed = Vec::with_capacity(BLOCK_SIZE as usize);
    decoder
        .by_ref()
        .take(u64::from(BLOCK_SIZE) + 1)
        .read_to_end(&mut decompressed)
        .ok()?;
    io::copy(&mut decoder, &mut io::sink()).ok()?;
    Some(decompressed)
}

/// Decode one physical chunk
pub fn decode_chunk(raw: &[u8]) -> DecodedChunk<'_> {
    match inflate_chunk(raw) {
        Some(data) => DecodedChunk {
            encoding: ChunkEncoding::Zlib,
            data: Cow::Owned(data),
        },
        None => DecodedChunk {
            encoding: ChunkEncoding::Stored,
            data: Cow::Borrowed(raw),
        },
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_zlib_chunk() {
        let data = b"manifests/songs_dlc_test/songs_dlc_test.hsan".repeat(10);
        let raw = zlib(&data);
        let decoded = decode_chunk(&raw);
        assert_eq!(decoded.encoding, ChunkEncoding::Zlib);
        assert_eq!(decoded.data.as_ref(), data.as_slice());
    }

    #[test]
    fn test_stored_chunk() {
        let data = b"songs/arr/test_lead.sng\nsongs/arr/test_bass.sng";
        let decoded = decode_chunk(data);
        assert_eq!(decoded.encoding, ChunkEncoding::Stored);
        assert!(matches!(decoded.data, Cow::Borrowed(_)));
        assert_eq!(decoded.data.as_ref(), data);
    }

    #[test]
    fn test_corrupt_zlib_header_is_stored() {
        let mut raw = zlib(&[7u8; 4096]);
        raw[0] = 0x00;
        let decoded = decode_chunk(&raw);
        assert_eq!(decoded.encoding, ChunkEncoding::Stored);
        assert_eq!(decoded.data.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_empty_chunk_is_stored() {
        let decoded = decode_chunk(&[]);
        assert_eq!(decoded.encoding, ChunkEncoding::Stored);
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn test_truncated_stream_past_cap_is_stored() {
        let data = b"stored bytes may begin like a zlib stream ".repeat(8000);
        let compressed = zlib(&data);
        let raw = &compressed[..compressed.len() / 2];

        assert!(inflate_chunk(raw).is_none());
        let decoded = decode_chunk(raw);
        assert_eq!(decoded.encoding, ChunkEncoding::Stored);
        assert_eq!(decoded.data.as_ref(), raw);
    }

    #[test]
    fn test_inflate_cap() {
        let compressed = zlib(&vec![0u8; BLOCK_SIZE as usize * 2]);
        let inflated = inflate_chunk(&compressed).unwrap();
        assert_eq!(inflated.len(), BLOCK_SIZE as usize + 1);
    }
}
