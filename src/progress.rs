//! Progress reporting utilities using indicatif.
//!
//! The pipeline reports through the [`ProgressCallback`] trait so the core
//! stays testable without a terminal; [`Progress`] is the indicatif-backed
//! implementation used by the CLI. Phases are `discover` (spinner), `hash`
//! and `place` (bars).

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for pipeline phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts with the number of items, if known.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed (1-based).
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item completes, with its size in bytes.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the displayed message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter.
///
/// Manages one bar per pipeline phase under a shared [`MultiProgress`].
pub struct Progress {
    multi: MultiProgress,
    discover: Mutex<Option<ProgressBar>>,
    hash: Mutex<Option<ProgressBar>>,
    place: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// With `quiet` set, no bars are displayed and callbacks are no-ops.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            discover: Mutex::new(None),
            hash: Mutex::new(None),
            place: Mutex::new(None),
            quiet,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:>8} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn slot(&self, phase: &str) -> Option<&Mutex<Option<ProgressBar>>> {
        match phase {
            "discover" => Some(&self.discover),
            "hash" => Some(&self.hash),
            "place" => Some(&self.place),
            _ => None,
        }
    }

    /// The bar currently active for any phase.
    fn active_bar(&self) -> Option<ProgressBar> {
        for slot in [&self.discover, &self.hash, &self.place] {
            if let Ok(guard) = slot.lock() {
                if let Some(bar) = guard.as_ref() {
                    if !bar.is_finished() {
                        return Some(bar.clone());
                    }
                }
            }
        }
        None
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let Some(slot) = self.slot(phase) else { return };

        let bar = if total == 0 {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(Self::spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            let bar = self.multi.add(ProgressBar::new(total as u64));
            bar.set_style(Self::bar_style());
            bar
        };
        bar.set_message(phase.to_string());

        if let Ok(mut guard) = slot.lock() {
            *guard = Some(bar);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        if let Some(bar) = self.active_bar() {
            bar.set_position(current as u64);
            // Only the file name; full paths overflow narrow terminals
            let name = std::path::Path::new(path)
                .file_name()
                .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
            bar.set_message(name);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        let Some(slot) = self.slot(phase) else { return };
        if let Ok(guard) = slot.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.finish_and_clear();
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        if let Some(bar) = self.active_bar() {
            bar.set_message(message.to_string());
        }
    }
}
