//! Command-line configuration.
//!
//! Configuration comes from CLI arguments with environment variable
//! fallbacks:
//! - `PSARC_LOG_LEVEL`: default log level when `RUST_LOG` is unset
//! - `PSARC_OUTPUT`: directory receiving `<archive stem>.json` for the
//!   `manifest` and `paths` commands when `--output` is not given
//!
//! # Example
//!
//! ```no_run
//! use psarc_cli::CliConfig;
//!
//! let config = CliConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! println!("archive: {}", config.command.archive().display());
//! ```

use crate::error::ConfigError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "psarc",
    about = "Extract manifests and arrangement path names from PSARC archives",
    version
)]
pub struct CliConfig {
    /// Log level used when RUST_LOG is not set
    #[arg(
        long,
        value_enum,
        env = "PSARC_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    pub log_level: LogLevel,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Decoder internals
    Debug,
    /// Extraction summaries
    Info,
    /// Recoverable oddities only
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the raw .hsan manifest
    Manifest(ManifestArgs),
    /// Print the .hsan manifest with PathName attributes merged in
    Paths(ManifestArgs),
    /// List the logical files in the archive
    List(ArchiveArgs),
    /// Extract one logical file by its internal path
    Extract(ExtractArgs),
    /// Show header and table-of-contents details
    Info(ArchiveArgs),
}

impl Command {
    /// Archive the command operates on.
    #[must_use]
    pub fn archive(&self) -> &Path {
        match self {
            Self::Manifest(args) | Self::Paths(args) => &args.archive,
            Self::List(args) | Self::Info(args) => &args.archive,
            Self::Extract(args) => &args.archive,
        }
    }
}

/// Arguments naming an archive only.
#[derive(Debug, Clone, Args)]
pub struct ArchiveArgs {
    /// Path to the .psarc file
    pub archive: PathBuf,
}

/// Arguments for the JSON extraction commands.
#[derive(Debug, Clone, Args)]
pub struct ManifestArgs {
    /// Path to the .psarc file
    pub archive: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory receiving `<archive stem>.json` when --output is not given
    #[arg(long, env = "PSARC_OUTPUT")]
    pub output_dir: Option<PathBuf>,
}

impl ManifestArgs {
    /// Resolved output file, or `None` for stdout.
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let dir = self.output_dir.as_ref()?;
        let stem = self
            .archive
            .file_stem()
            .map_or_else(|| "manifest".into(), |stem| stem.to_string_lossy());
        Some(dir.join(format!("{stem}.json")))
    }
}

/// Arguments for extracting a single logical file.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Path to the .psarc file
    pub archive: PathBuf,

    /// Internal path as shown by `list`
    pub path: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The archive does not exist or is not a file
    /// - The output directory does not exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        let archive = self.command.archive();
        if !archive.exists() {
            return Err(ConfigError::MissingArchive(archive.to_path_buf()));
        }
        if !archive.is_file() {
            return Err(ConfigError::NotAFile(archive.to_path_buf()));
        }

        if let Command::Manifest(args) | Command::Paths(args) = &self.command
            && let Some(dir) = &args.output_dir
            && args.output.is_none()
            && !dir.is_dir()
        {
            return Err(ConfigError::MissingOutputDir(dir.clone()));
        }

        Ok(())
    }
}
