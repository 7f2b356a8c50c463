//! picuniq - One-shot image deduplicator
//!
//! Discovers image files under a source root, fingerprints them with
//! streaming SHA-256, groups files by content, and copies exactly one
//! representative per distinct content into a destination tree, preserving
//! paths relative to the source root. The source tree is never modified.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod placer;
pub mod progress;
pub mod scanner;

use std::sync::Arc;

use cli::Cli;
use config::Settings;
use duplicates::{format_size, Deduplicator, GrouperConfig, ScanSummary};
use error::ExitCode;
use placer::{Placer, PlacementReport};
use progress::{Progress, ProgressCallback};

/// Run the full pipeline: discover, hash, place, report.
///
/// # Errors
///
/// Returns an error for fatal failures only (bad configuration or a
/// discovery failure). Per-file hash failures and per-group placement
/// failures are reported in the summary and reflected in the exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(&cli)?;
    log::debug!("Resolved settings: {settings:?}");

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));

    let grouper = GrouperConfig::default()
        .with_io_threads(settings.io_threads)
        .with_progress_callback(progress.clone());
    let dedup = Deduplicator::new(&settings.source_root, settings.extension_set(), grouper);
    let (groups, scan) = dedup.scan()?;

    let placer = Placer::new(&settings.source_root, &settings.dest_root)
        .with_existing_policy(settings.on_existing)
        .with_dry_run(cli.dry_run)
        .with_progress_callback(progress);
    let report = placer.place_all(&groups);

    report_summary(&scan, &report, cli.dry_run);

    if scan.failed_files > 0 || report.failed > 0 {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Final operator-facing report: totals plus every failed path, so an
/// incomplete dedup is never silent.
fn report_summary(scan: &ScanSummary, report: &PlacementReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    log::info!(
        "{prefix}{} discovered ({}), {} hashed, {} distinct contents, {} redundant copies",
        scan.discovered_files,
        format_size(scan.discovered_bytes),
        scan.hashed_files,
        scan.distinct_contents,
        scan.duplicate_files,
    );
    log::info!(
        "{prefix}{} placed ({}), {} skipped existing, {} failed to hash, {} failed to place ({:.1}s)",
        report.placed,
        format_size(report.bytes_copied),
        report.skipped_existing,
        scan.failed_files,
        report.failed,
        scan.duration.as_secs_f64(),
    );

    for err in &scan.hash_errors {
        log::warn!("Not deduplicated: {err}");
    }
    for err in &report.errors {
        log::warn!("Not placed: {err}");
    }
}
