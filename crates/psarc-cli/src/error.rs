//! Error types for the command-line tool.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Archive path does not exist
    #[error("archive not found: {}", .0.display())]
    MissingArchive(PathBuf),

    /// Archive path exists but is not a regular file
    #[error("archive is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Output directory does not exist
    #[error("output directory not found: {}", .0.display())]
    MissingOutputDir(PathBuf),
}
