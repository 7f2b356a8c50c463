//! Scanner module for file discovery and content hashing.
//!
//! This module provides functionality for:
//! - Recursive directory traversal with extension filtering
//! - Streaming SHA-256 content hashing
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use picuniq::scanner::Walker;
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let exts: HashSet<String> = [".jpg", ".png"].iter().map(|s| s.to_string()).collect();
//! let walker = Walker::new(Path::new("/photos"), exts);
//! let files = walker.discover().expect("source root must be readable");
//! println!("Found {} candidate files", files.len());
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_to_hex, hex_to_hash, Hash, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// Metadata for a discovered candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, rooted at the configured source root
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new `FileEntry`.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Errors that can occur during discovery.
///
/// Discovery is all-or-nothing: any of these aborts the run, since a
/// partially discovered file set would silently under-deduplicate.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The source root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The source root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while traversing.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while hashing a single file.
///
/// These are recoverable at batch level: the orchestrator records them
/// and carries on with the remaining files.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared between discovery and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// The path the failed hash was attributed to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }

    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
