//! End-to-end extraction from an archive buffer

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::manifest::{ManifestError, derive_path_names, merge_path_names};
use crate::psarc::{PsarcArchive, PsarcError};

/// Errors from either the container or the manifest stage
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Container decoding failed
    #[error(transparent)]
    Archive(#[from] PsarcError),

    /// Manifest JSON could not be read or updated
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Result type for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

/// What to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// The raw `.hsan` manifest text
    Manifest,
    /// The `.hsan` manifest with `PathName` attributes merged in
    PathNames,
}

/// Raw `.hsan` manifest text
pub fn extract_hsan(data: &[u8]) -> ExtractResult<String> {
    let archive = PsarcArchive::parse(data)?;
    Ok(archive.hsan_text()?)
}

/// Master manifest with derived path names merged in
pub fn extract_path_names(data: &[u8]) -> ExtractResult<Value> {
    let archive = PsarcArchive::parse(data)?;
    path_names_for(&archive)
}

/// Master manifest of an already decoded archive with path names merged in
pub fn path_names_for(archive: &PsarcArchive<'_>) -> ExtractResult<Value> {
    let mut manifest: Value =
        serde_json::from_slice(&archive.hsan()?).map_err(ManifestError::from)?;

    let songs = archive.song_manifests()?;
    let path_names = derive_path_names(songs.iter().map(|(_, json)| json.as_slice()))?;
    info!(
        song_manifests = songs.len(),
        path_names = path_names.len(),
        "derived path names"
    );

    merge_path_names(&mut manifest, &path_names)?;
    Ok(manifest)
}

/// Extract in `mode` and render as UTF-8 JSON text
pub fn render(mode: ExtractMode, data: &[u8]) -> ExtractResult<String> {
    match mode {
        ExtractMode::Manifest => extract_hsan(data),
        ExtractMode::PathNames => {
            let manifest = extract_path_names(data)?;
            Ok(serde_json::to_string_pretty(&manifest).map_err(ManifestError::from)?)
        }
    }
}
