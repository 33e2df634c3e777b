//! Path listing stored in logical file #0

use super::error::{PsarcError, PsarcResult};

/// Directory holding the `.hsan` and per-song manifests
const MANIFEST_DIR: &str = "manifests/";

/// Pattern description for `.hsan` lookups, used in errors
pub const HSAN_PATTERN: &str = "manifests/*.hsan";

/// Pattern description for song manifest lookups, used in errors
pub const SONG_MANIFEST_PATTERN: &str = "manifests/songs*.json";

/// Whether `path` matches `manifests/*.hsan`
///
/// `*` spans directory separators, so nested song directories match.
pub fn is_hsan_path(path: &str) -> bool {
    path.strip_prefix(MANIFEST_DIR)
        .is_some_and(|rest| rest.ends_with(".hsan"))
}

/// Whether `path` matches `manifests/songs*.json`
pub fn is_song_manifest_path(path: &str) -> bool {
    path.strip_prefix(MANIFEST_DIR)
        .is_some_and(|rest| rest.starts_with("songs") && rest.ends_with(".json"))
}

/// Ordered list of internal paths
///
/// Path `i` is stored under block descriptor `i + 1`; descriptor 0 holds the
/// listing itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    paths: Vec<String>,
}

impl FileListing {
    /// Parse the newline-delimited listing
    ///
    /// A trailing `\r` on each line and one trailing empty line are dropped.
    pub fn parse(data: &[u8]) -> PsarcResult<Self> {
        let text = String::from_utf8(data.to_vec()).map_err(|source| PsarcError::InvalidUtf8 {
            context: "file listing".to_string(),
            source,
        })?;

        let mut paths: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if paths.last().is_some_and(String::is_empty) {
            paths.pop();
        }

        Ok(Self { paths })
    }

    /// Listed paths in archive order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Number of listed paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the listing is empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Descriptor index for the path at `position`
    pub const fn descriptor_index(position: usize) -> usize {
        position + 1
    }

    /// Descriptor index of an exact path
    pub fn find(&self, path: &str) -> Option<usize> {
        self.paths
            .iter()
            .position(|listed| listed == path)
            .map(Self::descriptor_index)
    }

    /// Descriptor index of the first `.hsan` manifest
    pub fn hsan_index(&self) -> PsarcResult<usize> {
        self.paths
            .iter()
            .position(|path| is_hsan_path(path))
            .map(Self::descriptor_index)
            .ok_or(PsarcError::MissingManifest(HSAN_PATTERN))
    }

    /// Path and descriptor index of every song manifest, in listing order
    pub fn song_manifest_indices(&self) -> PsarcResult<Vec<(&str, usize)>> {
        let matches: Vec<(&str, usize)> = self
            .paths
            .iter()
            .enumerate()
            .filter(|(_, path)| is_song_manifest_path(path))
            .map(|(position, path)| (path.as_str(), Self::descriptor_index(position)))
            .collect();

        if matches.is_empty() {
            return Err(PsarcError::MissingManifest(SONG_MANIFEST_PATTERN));
        }
        Ok(matches)
    }
}
