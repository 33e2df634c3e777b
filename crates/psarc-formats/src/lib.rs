//! PSARC archive decoding and song manifest path names
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate decodes PSARC containers (as shipped with Rocksmith 2014 song
//! packs) and derives arrangement path names for their manifests.
//!
//! # Modules
//!
//! - **psarc**: header validation, TOC decryption, chunk reassembly, path listing
//! - **manifest**: per-song arrangement flags, path-name labels, manifest merge
//! - **extract**: the two end-to-end extraction modes
//!
//! # Example
//!
//! ```no_run
//! use psarc_formats::extract::{ExtractMode, render};
//!
//! let data = std::fs::read("song_p.psarc")?;
//! let json = render(ExtractMode::PathNames, &data)?;
//! println!("{json}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod extract;
pub mod manifest;
pub mod psarc;

/// In-memory archive builder for test suites
#[cfg(any(test, feature = "test-utils"))]
pub mod fixture;

pub use extract::{ExtractError, ExtractMode, ExtractResult};
pub use manifest::{ManifestError, PathName};
pub use psarc::{PsarcArchive, PsarcError};
