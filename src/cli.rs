//! Command-line interface definitions for picuniq.
//!
//! One-shot batch tool, no subcommands: give it a source root and a
//! destination root and it copies one file per distinct image content.
//!
//! # Example
//!
//! ```bash
//! # Deduplicate a photo library into ./unique
//! picuniq ~/Pictures ./unique
//!
//! # Only JPEGs, eight hashing threads
//! picuniq ~/Pictures ./unique --ext .jpg --ext .jpeg --io-threads 8
//!
//! # See what would happen without writing anything
//! picuniq ~/Pictures ./unique --dry-run -v
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::placer::ExistingPolicy;

/// Copy one file per distinct image content into a mirror tree.
///
/// picuniq recursively discovers image files under SOURCE, fingerprints
/// them with SHA-256, and copies exactly one representative per distinct
/// content into DEST, preserving paths relative to SOURCE. SOURCE is never
/// modified.
#[derive(Debug, Parser)]
#[command(name = "picuniq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source root to scan (read-only)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination root for deduplicated copies
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Accepted file extension, including the dot (repeatable)
    ///
    /// Matching is exact and case-sensitive. Defaults to common image
    /// extensions when not given here or in the config file.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Number of hashing threads (0 = one per core)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// What to do when a destination file already exists
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_existing: Option<ExistingPolicy>,

    /// Path to a TOML config file (default: ./picuniq.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit errors as structured JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}
