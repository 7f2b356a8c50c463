//! Parallel hash orchestrator and pipeline front half.
//!
//! # Overview
//!
//! This module fans the discovered file set out across a bounded rayon
//! thread pool, computes every content hash, and aggregates the results
//! into [`ContentGroup`]s:
//!
//! 1. **Discover** - collect candidate files (see [`crate::scanner::Walker`])
//! 2. **Hash** - parallel SHA-256 over the full file set
//! 3. **Group** - single-threaded aggregation into fingerprint groups
//!
//! Each worker returns its result paired with the originating file, so
//! attribution is correct no matter which order computations finish in;
//! nothing is ever inferred from completion order. The caller observes a
//! synchronous barrier: `group_by_content` returns only once every hash
//! has completed or failed.
//!
//! A single file's failure never aborts the batch. Failed paths are
//! recorded in [`HashStats::errors`] and excluded from the grouping.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use super::ContentGroup;
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, Hash, HashError, Hasher, ScanError, Walker};

/// Configuration for the hash orchestrator.
#[derive(Clone, Default)]
pub struct GrouperConfig {
    /// Number of I/O threads for parallel hashing.
    /// Zero means one thread per available core.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for GrouperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrouperConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl GrouperConfig {
    /// Set the I/O thread count. Zero selects one thread per core.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files submitted for hashing
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Total bytes hashed
    pub bytes_hashed: u64,
    /// Distinct contents found
    pub distinct_contents: usize,
    /// Redundant copies beyond one representative per content
    pub duplicate_files: usize,
    /// Errors encountered while hashing, one per failed file
    pub errors: Vec<HashError>,
}

impl HashStats {
    /// Percentage of input files that turned out to be redundant copies.
    #[must_use]
    pub fn duplicate_rate(&self) -> f64 {
        if self.hashed_files == 0 {
            0.0
        } else {
            (self.duplicate_files as f64 / self.hashed_files as f64) * 100.0
        }
    }
}

/// Hash every file and group by fingerprint.
///
/// Returns the grouping plus statistics. The grouping partitions the
/// successfully hashed files: each appears in exactly one group, and
/// member order within a group follows submission order. Groups of size
/// one are kept; placement treats them identically to larger groups.
///
/// # Performance
///
/// Uses a dedicated rayon pool sized by `config.io_threads` so hashing
/// parallelism stays bounded regardless of the global pool. Memory per
/// worker is one read buffer; file descriptors in flight are capped by
/// the pool size.
#[must_use]
pub fn group_by_content(
    files: Vec<FileEntry>,
    hasher: Arc<Hasher>,
    config: &GrouperConfig,
) -> (Vec<ContentGroup>, HashStats) {
    let mut stats = HashStats {
        input_files: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        log::debug!("Hash phase: no files to process");
        return (Vec::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hash", files.len());
    }
    log::info!("Hashing {} files", files.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads)
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create custom thread pool, using global pool with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    // Each result carries its originating entry; completion order is
    // irrelevant to attribution.
    let hash_results: Vec<(FileEntry, Result<Hash, HashError>)> = pool.install(|| {
        files
            .into_par_iter()
            .enumerate()
            .map(|(idx, file)| {
                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(idx + 1, file.path.to_string_lossy().as_ref());
                }

                let result = hasher.hash_file(&file.path);
                match &result {
                    Ok(_) => {
                        log::trace!("Hashed {}", file.path.display());
                        if let Some(ref callback) = config.progress_callback {
                            callback.on_item_completed(file.size);
                        }
                    }
                    Err(e) => log::warn!("Failed to hash {}: {}", file.path.display(), e),
                }
                (file, result)
            })
            .collect()
    });

    // Single aggregation step after the barrier; workers share no state.
    let mut grouping: HashMap<Hash, Vec<FileEntry>> = HashMap::new();
    let mut order: Vec<Hash> = Vec::new();

    for (file, result) in hash_results {
        match result {
            Ok(hash) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                let members = grouping.entry(hash).or_insert_with(|| {
                    order.push(hash);
                    Vec::new()
                });
                members.push(file);
            }
            Err(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    // First-seen order keeps runs reproducible for a fixed input order.
    let groups: Vec<ContentGroup> = order
        .into_iter()
        .map(|hash| {
            let files = grouping.remove(&hash).unwrap_or_default();
            log::debug!(
                "Content group {}: {} file(s)",
                crate::scanner::hash_to_hex(&hash),
                files.len()
            );
            ContentGroup::new(hash, files)
        })
        .collect();

    stats.distinct_contents = groups.len();
    stats.duplicate_files = groups.iter().map(ContentGroup::duplicate_count).sum();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hash");
    }

    log::info!(
        "Hash phase complete: {} files, {} distinct contents, {} redundant copies ({:.1}%)",
        stats.hashed_files,
        stats.distinct_contents,
        stats.duplicate_files,
        stats.duplicate_rate()
    );

    (groups, stats)
}

/// Summary statistics for the discover + hash half of a run.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files discovered under the source root
    pub discovered_files: usize,
    /// Total size of discovered files in bytes
    pub discovered_bytes: u64,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files that failed to hash
    pub failed_files: usize,
    /// Distinct contents found
    pub distinct_contents: usize,
    /// Redundant copies found
    pub duplicate_files: usize,
    /// Hash failures, one per failed file
    pub hash_errors: Vec<HashError>,
    /// Wall-clock duration of discovery plus hashing
    pub duration: std::time::Duration,
}

/// Pipeline front half: discovery plus parallel hashing.
///
/// Placement is a separate sequential phase (see [`crate::placer`]); this
/// type only produces the grouping and never writes to the filesystem.
///
/// # Example
///
/// ```no_run
/// use picuniq::duplicates::{Deduplicator, GrouperConfig};
/// use std::collections::HashSet;
/// use std::path::Path;
///
/// let exts: HashSet<String> = [".jpg".to_string()].into();
/// let dedup = Deduplicator::new(Path::new("/photos"), exts, GrouperConfig::default());
/// let (groups, summary) = dedup.scan().unwrap();
/// println!("{} distinct contents", summary.distinct_contents);
/// ```
pub struct Deduplicator {
    root: PathBuf,
    extensions: HashSet<String>,
    config: GrouperConfig,
    hasher: Arc<Hasher>,
}

impl Deduplicator {
    /// Create a deduplicator for the given source root and extension set.
    #[must_use]
    pub fn new(root: &Path, extensions: HashSet<String>, config: GrouperConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            extensions,
            config,
            hasher: Arc::new(Hasher::new()),
        }
    }

    /// Discover candidates and group them by content.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only for discovery failures; per-file hash
    /// failures are reported through [`ScanSummary::hash_errors`].
    pub fn scan(&self) -> Result<(Vec<ContentGroup>, ScanSummary), ScanError> {
        let start = std::time::Instant::now();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("discover", 0);
            callback.on_message(&format!("Walking {}", self.root.display()));
        }

        let walker = Walker::new(&self.root, self.extensions.clone());
        let files = walker.discover()?;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("discover");
        }

        let mut summary = ScanSummary {
            discovered_files: files.len(),
            discovered_bytes: files.iter().map(|f| f.size).sum(),
            ..Default::default()
        };
        log::info!(
            "Found {} candidate files ({})",
            summary.discovered_files,
            format_size(summary.discovered_bytes)
        );

        let (groups, stats) = group_by_content(files, self.hasher.clone(), &self.config);

        summary.hashed_files = stats.hashed_files;
        summary.failed_files = stats.failed_files;
        summary.distinct_contents = stats.distinct_contents;
        summary.duplicate_files = stats.duplicate_files;
        summary.hash_errors = stats.errors;
        summary.duration = start.elapsed();

        Ok((groups, summary))
    }
}

/// Format a byte size as a human-readable string.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
