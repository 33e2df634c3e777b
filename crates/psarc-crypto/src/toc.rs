//! AES-256-CFB cipher for the PSARC table of contents
//!
//! The TOC of every PSARC archive is encrypted with a single published key:
//! - AES with a 256-bit key
//! - CFB mode with a full 128-bit feedback segment
//! - A fixed IV, so encryption is deterministic
//!
//! The ciphertext is zero-padded to the 16-byte segment size before it is
//! handed to the cipher and the output is cut back to the input length.

use aes::Aes256;
use cipher::{AsyncStreamCipher, KeyIvInit};

use crate::error::{CryptoError, CryptoResult};

type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;
type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;

/// Key size in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// IV and feedback segment size in bytes
pub const IV_SIZE: usize = 16;

/// Published TOC key
pub const TOC_KEY: [u8; KEY_SIZE] = [
    0xC5, 0x3D, 0xB2, 0x38, 0x70, 0xA1, 0xA2, 0xF7, 0x1C, 0xAE, 0x64, 0x06, 0x1F, 0xDD, 0x0E, 0x11,
    0x57, 0x30, 0x9D, 0xC8, 0x52, 0x04, 0xD4, 0xC5, 0xBF, 0xDF, 0x25, 0x09, 0x0D, 0xF2, 0x57, 0x2C,
];

/// Published TOC initialization vector
pub const TOC_IV: [u8; IV_SIZE] = [
    0xE9, 0x15, 0xAA, 0x01, 0x8F, 0xEF, 0x71, 0xFC, 0x50, 0x81, 0x32, 0xE4, 0xBB, 0x4C, 0xEB, 0x42,
];

/// TOC cipher holding a key/IV pair
#[derive(Clone, PartialEq, Eq)]
pub struct TocCipher {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl std::fmt::Debug for TocCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TocCipher")
            .field("key", &"<redacted>")
            .field("iv", &hex::encode_upper(self.iv))
            .finish()
    }
}

impl Default for TocCipher {
    fn default() -> Self {
        Self::new(TOC_KEY, TOC_IV)
    }
}

impl TocCipher {
    /// Create a cipher from a fixed key and IV
    pub const fn new(key: [u8; KEY_SIZE], iv: [u8; IV_SIZE]) -> Self {
        Self { key, iv }
    }

    /// Create a cipher from byte slices, checking their sizes
    pub fn from_slices(key: &[u8], iv: &[u8]) -> CryptoResult<Self> {
        let key: [u8; KEY_SIZE] = key.try_into().map_err(|_| CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;
        let iv: [u8; IV_SIZE] = iv.try_into().map_err(|_| CryptoError::InvalidIvSize {
            expected: IV_SIZE,
            actual: iv.len(),
        })?;
        Ok(Self::new(key, iv))
    }

    /// Parse key and IV from hex strings
    pub fn from_hex(key: &str, iv: &str) -> CryptoResult<Self> {
        let key = hex::decode(key.trim())
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("invalid key hex: {e}")))?;
        let iv = hex::decode(iv.trim())
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("invalid IV hex: {e}")))?;
        Self::from_slices(&key, &iv)
    }

    /// Decrypt a TOC region, returning exactly `ciphertext.len()` bytes
    pub fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut buffer = pad_to_segment(ciphertext);
        Aes256CfbDec::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?
            .decrypt(&mut buffer);
        buffer.truncate(ciphertext.len());
        Ok(buffer)
    }

    /// Encrypt a plaintext TOC region, returning exactly `plaintext.len()` bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut buffer = pad_to_segment(plaintext);
        Aes256CfbEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?
            .encrypt(&mut buffer);
        buffer.truncate(plaintext.len());
        Ok(buffer)
    }
}

fn pad_to_segment(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(IV_SIZE) * IV_SIZE;
    let mut buffer = Vec::with_capacity(padded_len);
    buffer.extend_from_slice(data);
    buffer.resize(padded_len, 0);
    buffer
}

/// Decrypt a TOC region with the published key and IV
pub fn decrypt_toc(ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    TocCipher::default().decrypt(ciphertext)
}

/// Encrypt a TOC region with the published key and IV
pub fn encrypt_toc(plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    TocCipher::default().encrypt(plaintext)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_published_constants() {
        assert_eq!(
            hex::encode_upper(TOC_KEY),
            "C53DB23870A1A2F71CAE64061FDD0E1157309DC85204D4C5BFDF25090DF2572C"
        );
        assert_eq!(hex::encode_upper(TOC_IV), "E915AA018FEF71FC508132E4BB4CEB42");
    }

    #[test]
    fn test_known_keystream_block() {
        // First CFB block of a zero plaintext is AES_k(IV)
        let ciphertext = encrypt_toc(&[0u8; 16]).expect("Operation should succeed");
        assert_eq!(hex::encode(ciphertext), "4e3a0a91b5ba6a24f914e46e640118c4");
    }

    #[test]
    fn test_known_partial_segment() {
        let plaintext = b"PSARC table of contents!";
        let ciphertext = encrypt_toc(plaintext).expect("Operation should succeed");
        assert_eq!(
            hex::encode(&ciphertext),
            "1e694bc3f69a1e459b78814e0b6738a7ab46f26cbafa9b3d"
        );

        let decrypted = decrypt_toc(&ciphertext).expect("Operation should succeed");
        assert_eq!(&decrypted[..], plaintext);
    }

    #[test]
    fn test_empty_input() {
        assert!(decrypt_toc(&[]).expect("Operation should succeed").is_empty());
    }

    #[test]
    fn test_from_hex_matches_constants() {
        let cipher = TocCipher::from_hex(
            "C53DB23870A1A2F71CAE64061FDD0E1157309DC85204D4C5BFDF25090DF2572C",
            "E915AA018FEF71FC508132E4BB4CEB42",
        )
        .expect("Operation should succeed");
        assert_eq!(cipher, TocCipher::default());
    }

    #[test]
    fn test_invalid_sizes() {
        let result = TocCipher::from_slices(&[0u8; 16], &TOC_IV);
        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeySize {
                expected: 32,
                actual: 16
            })
        ));

        let result = TocCipher::from_slices(&TOC_KEY, &[0u8; 8]);
        assert!(matches!(result, Err(CryptoError::InvalidIvSize { .. })));

        let result = TocCipher::from_hex("zz", "00");
        assert!(matches!(result, Err(CryptoError::InvalidKeyFormat(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", TocCipher::default());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("C53DB238"));
    }

    proptest! {
        #[test]
        fn decrypt_then_encrypt_reproduces_ciphertext(
            ciphertext in prop::collection::vec(any::<u8>(), 0..512)
        ) {
            let plaintext = decrypt_toc(&ciphertext).unwrap();
            prop_assert_eq!(plaintext.len(), ciphertext.len());
            let reencrypted = encrypt_toc(&plaintext).unwrap();
            prop_assert_eq!(reencrypted, ciphertext);
        }
    }
}
