//! PSARC command-line tool.
//!
//! Thin layer over `psarc-formats`:
//! - `config`: CLI arguments, environment fallbacks and validation
//! - `error`: configuration errors
//!
//! Commands print to the supplied writer unless an output file is resolved,
//! which keeps them testable without touching stdout.
//!
//! # Example
//!
//! ```no_run
//! use psarc_cli::{CliConfig, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = CliConfig::from_args();
//!     config.validate()?;
//!     run(&config.command, &mut std::io::stdout().lock())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{ArchiveArgs, CliConfig, Command, ExtractArgs, LogLevel, ManifestArgs};
pub use error::ConfigError;

use anyhow::{Context, Result};
use psarc_formats::extract::path_names_for;
use psarc_formats::psarc::PsarcArchive;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Execute `command`, writing any stdout-bound output to `out`.
///
/// # Errors
///
/// Fails when the archive cannot be read or decoded, when the requested
/// file or manifest is absent, or when output cannot be written.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Result<()> {
    let path = command.archive();
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let archive = PsarcArchive::parse(&data)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    match command {
        Command::Manifest(args) => {
            let text = archive.hsan_text().context("failed to extract .hsan manifest")?;
            emit(text.as_bytes(), args.output_path().as_deref(), out)
        }
        Command::Paths(args) => {
            let manifest = path_names_for(&archive).context("failed to derive path names")?;
            let text = serde_json::to_string_pretty(&manifest)?;
            emit(text.as_bytes(), args.output_path().as_deref(), out)
        }
        Command::List(_) => {
            for (path, descriptor) in archive.entries() {
                writeln!(out, "{}\t{path}", descriptor.size)?;
            }
            Ok(())
        }
        Command::Extract(args) => {
            let contents = archive
                .read_file(&args.path)
                .with_context(|| format!("failed to extract {}", args.path))?;
            emit(&contents, args.output.as_deref(), out)
        }
        Command::Info(_) => print_info(&archive, out),
    }
}

fn emit<W: Write>(contents: &[u8], destination: Option<&Path>, out: &mut W) -> Result<()> {
    match destination {
        Some(file) => {
            std::fs::write(file, contents)
                .with_context(|| format!("failed to write {}", file.display()))?;
            info!(path = %file.display(), bytes = contents.len(), "wrote output");
        }
        None => {
            out.write_all(contents)?;
            if !contents.ends_with(b"\n") {
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn print_info<W: Write>(archive: &PsarcArchive<'_>, out: &mut W) -> Result<()> {
    let header = archive.header();
    let toc = archive.toc();

    writeln!(out, "PSARC Archive:")?;
    writeln!(out, "  Version: {}", header.version)?;
    writeln!(
        out,
        "  Compression: {}",
        String::from_utf8_lossy(&header.compression)
    )?;
    writeln!(out, "  Block size: {}", header.block_size)?;
    writeln!(out, "  TOC length: {}", header.toc.length)?;
    writeln!(out, "  TOC entry size: {}", header.toc.entry_size)?;
    writeln!(out, "  Entries: {}", header.toc.num_entries)?;
    writeln!(out, "  Chunks: {}", toc.chunk_count())?;
    writeln!(out, "  Listed files: {}", archive.listing().len())?;

    let total: u64 = toc.descriptors.iter().map(|descriptor| descriptor.size).sum();
    writeln!(out, "  Total uncompressed: {total} bytes")?;
    Ok(())
}
