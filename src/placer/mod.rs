//! Representative selection and destination placement.
//!
//! # Overview
//!
//! For every content group this module picks one representative (the first
//! member in stored order), computes its destination as the path relative
//! to the source root re-rooted under the destination root, creates any
//! missing destination directories, and copies the file's bytes.
//!
//! Placement is strictly sequential. Directory creation uses
//! `create_dir_all`, which is idempotent, and the single control flow means
//! no concurrent-mkdir races exist. Groups with one member and groups with
//! many are handled identically: exactly one copy lands in the destination
//! either way.
//!
//! One group's failure never blocks the rest; failures are collected into
//! the [`PlacementReport`] and surfaced at the end of the run. The source
//! tree is never written to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::duplicates::ContentGroup;
use crate::progress::ProgressCallback;

/// What to do when the destination file already exists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExistingPolicy {
    /// Leave the existing file untouched and count a skip (default).
    #[default]
    Skip,
    /// Replace the existing file with the representative's bytes.
    Overwrite,
    /// Record a placement failure for the group.
    Error,
}

/// Errors that can occur while placing one group.
#[derive(thiserror::Error, Debug)]
pub enum PlaceError {
    /// The representative is not located under the source root.
    #[error("Path {path} is not under the source root {root}")]
    OutsideRoot {
        /// Representative path
        path: PathBuf,
        /// Configured source root
        root: PathBuf,
    },

    /// The destination exists and the policy is [`ExistingPolicy::Error`].
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Directory creation or copy failed.
    #[error("I/O error copying {src} to {dest}: {source}")]
    Io {
        /// Representative path
        src: PathBuf,
        /// Destination path
        dest: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of placing a single group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The representative was copied to the destination.
    Placed,
    /// The destination already existed and was left untouched.
    SkippedExisting,
}

/// Aggregated results of the placement phase.
#[derive(Debug, Default)]
pub struct PlacementReport {
    /// Groups whose representative was copied
    pub placed: usize,
    /// Groups skipped because the destination already existed
    pub skipped_existing: usize,
    /// Groups that failed to place
    pub failed: usize,
    /// Bytes copied to the destination tree
    pub bytes_copied: u64,
    /// Placement failures, one per failed group
    pub errors: Vec<PlaceError>,
}

/// Sequential per-group placer.
///
/// # Example
///
/// ```no_run
/// use picuniq::placer::{ExistingPolicy, Placer};
/// use std::path::Path;
///
/// let placer = Placer::new(Path::new("/photos"), Path::new("/unique"))
///     .with_existing_policy(ExistingPolicy::Skip);
/// ```
pub struct Placer {
    source_root: PathBuf,
    dest_root: PathBuf,
    on_existing: ExistingPolicy,
    dry_run: bool,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Placer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placer")
            .field("source_root", &self.source_root)
            .field("dest_root", &self.dest_root)
            .field("on_existing", &self.on_existing)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Placer {
    /// Create a placer copying from under `source_root` into `dest_root`.
    #[must_use]
    pub fn new(source_root: &Path, dest_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            on_existing: ExistingPolicy::default(),
            dry_run: false,
            progress_callback: None,
        }
    }

    /// Set the policy for pre-existing destination files.
    #[must_use]
    pub fn with_existing_policy(mut self, policy: ExistingPolicy) -> Self {
        self.on_existing = policy;
        self
    }

    /// Enable dry-run mode: log placements without writing anything.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Compute the destination path for a representative.
    ///
    /// The path relative to the source root is preserved under the
    /// destination root.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::OutsideRoot`] if the path does not start with
    /// the source root.
    pub fn dest_path(&self, representative: &Path) -> Result<PathBuf, PlaceError> {
        let relative =
            representative
                .strip_prefix(&self.source_root)
                .map_err(|_| PlaceError::OutsideRoot {
                    path: representative.to_path_buf(),
                    root: self.source_root.clone(),
                })?;
        Ok(self.dest_root.join(relative))
    }

    /// Place one group's representative into the destination tree.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError`] if the destination path cannot be computed,
    /// the destination exists under [`ExistingPolicy::Error`], or directory
    /// creation / copying fails.
    pub fn place(&self, group: &ContentGroup) -> Result<PlaceOutcome, PlaceError> {
        let rep = group.representative();
        let dest = self.dest_path(&rep.path)?;

        if dest.exists() {
            match self.on_existing {
                ExistingPolicy::Skip => {
                    log::debug!("Destination exists, skipping: {}", dest.display());
                    return Ok(PlaceOutcome::SkippedExisting);
                }
                ExistingPolicy::Error => {
                    return Err(PlaceError::DestinationExists(dest));
                }
                ExistingPolicy::Overwrite => {
                    log::debug!("Destination exists, overwriting: {}", dest.display());
                }
            }
        }

        if self.dry_run {
            log::info!(
                "[dry-run] would copy {} -> {}",
                rep.path.display(),
                dest.display()
            );
            return Ok(PlaceOutcome::Placed);
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PlaceError::Io {
                src: rep.path.clone(),
                dest: dest.clone(),
                source: e,
            })?;
        }

        std::fs::copy(&rep.path, &dest).map_err(|e| PlaceError::Io {
            src: rep.path.clone(),
            dest: dest.clone(),
            source: e,
        })?;

        log::trace!("Copied {} -> {}", rep.path.display(), dest.display());
        Ok(PlaceOutcome::Placed)
    }

    /// Place every group, fail-soft per group.
    #[must_use]
    pub fn place_all(&self, groups: &[ContentGroup]) -> PlacementReport {
        let mut report = PlacementReport::default();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("place", groups.len());
        }
        log::info!(
            "Placing {} representatives into {}",
            groups.len(),
            self.dest_root.display()
        );

        for (idx, group) in groups.iter().enumerate() {
            let rep = group.representative();
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(idx + 1, rep.path.to_string_lossy().as_ref());
            }

            match self.place(group) {
                Ok(PlaceOutcome::Placed) => {
                    report.placed += 1;
                    // Nothing is written in dry-run mode
                    if !self.dry_run {
                        report.bytes_copied += rep.size;
                    }
                }
                Ok(PlaceOutcome::SkippedExisting) => report.skipped_existing += 1,
                Err(e) => {
                    log::warn!("Failed to place group {}: {}", group.fingerprint(), e);
                    report.failed += 1;
                    report.errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("place");
        }

        log::info!(
            "Placement complete: {} placed, {} skipped, {} failed",
            report.placed,
            report.skipped_existing,
            report.failed
        );
        report
    }
}
