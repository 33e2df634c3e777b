//! Song manifests and arrangement path names
//!
//! The `.hsan` master manifest lists one entry per arrangement. Each entry
//! also has its own per-song manifest JSON carrying the arrangement flags.
//! This module derives display labels from those flags and writes them back
//! into the master manifest as `Attributes.PathName`.

mod error;
mod merge;
mod path_name;

pub use error::{ManifestError, ManifestResult};
pub use merge::{PATH_NAME_ATTRIBUTE, merge_path_names};
pub use path_name::{
    ArrangementProperties, Derivation, PathName, SongAttributes, VOCALS_ARRANGEMENT, deduplicate,
    derive_path_name, derive_path_names,
};
