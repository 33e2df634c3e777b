//! Cryptographic operations for PSARC archives
//!
//! PSARC archives keep their table of contents encrypted with AES-256 in
//! CFB mode (128-bit feedback segment) under a published key and IV. This
//! crate provides that cipher in both directions.
//!
//! # Examples
//!
//! ```
//! use psarc_crypto::{decrypt_toc, encrypt_toc};
//!
//! let plaintext = b"descriptor records";
//! let ciphertext = encrypt_toc(plaintext).expect("encrypt");
//! assert_eq!(decrypt_toc(&ciphertext).expect("decrypt"), plaintext);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod toc;

pub use error::{CryptoError, CryptoResult};
pub use toc::{IV_SIZE, KEY_SIZE, TOC_IV, TOC_KEY, TocCipher, decrypt_toc, encrypt_toc};
