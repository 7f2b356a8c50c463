//! Layered run configuration.
//!
//! Settings are resolved by figment in increasing priority:
//! built-in defaults < TOML config file < `PICUNIQ_*` environment
//! variables < CLI flags. The resolved [`Settings`] value is immutable and
//! passed explicitly into each pipeline component, so components stay
//! independently testable against synthetic roots.
//!
//! Example `picuniq.toml`:
//!
//! ```toml
//! extensions = [".jpg", ".png"]
//! io_threads = 8
//! on_existing = "overwrite"
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::placer::ExistingPolicy;

/// Default config file name, looked up in the working directory.
const CONFIG_FILE: &str = "picuniq.toml";

/// Image extensions recognized when none are configured.
const DEFAULT_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff"];

/// Tunable settings with built-in defaults (everything except the roots).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Tunables {
    extensions: Vec<String>,
    io_threads: usize,
    on_existing: ExistingPolicy,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            io_threads: 4,
            on_existing: ExistingPolicy::default(),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Source root; read-only for the whole run
    pub source_root: PathBuf,
    /// Destination root; created on demand
    pub dest_root: PathBuf,
    /// Accepted extensions, each including the leading dot
    pub extensions: Vec<String>,
    /// Hashing thread count; zero selects one thread per core
    pub io_threads: usize,
    /// Policy for pre-existing destination files
    pub on_existing: ExistingPolicy,
}

impl Settings {
    /// Resolve settings from defaults, config file, environment and CLI.
    ///
    /// # Errors
    ///
    /// Fails if the config file or environment is malformed, or if a
    /// configured extension does not start with a dot.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Tunables::default()));
        figment = match &cli.config {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file(CONFIG_FILE)),
        };
        figment = figment.merge(Env::prefixed("PICUNIQ_"));

        let tunables: Tunables = figment
            .extract()
            .context("Failed to resolve configuration")?;

        let settings = Self {
            source_root: cli.source.clone(),
            dest_root: cli.dest.clone(),
            extensions: if cli.extensions.is_empty() {
                tunables.extensions
            } else {
                cli.extensions.clone()
            },
            io_threads: cli.io_threads.unwrap_or(tunables.io_threads),
            on_existing: cli.on_existing.unwrap_or(tunables.on_existing),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Extension matching is exact including the dot; catch the common
    /// misconfiguration of passing "jpg" instead of ".jpg" up front.
    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            bail!("At least one extension must be configured");
        }
        for ext in &self.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                bail!("Invalid extension {ext:?}: must start with a dot, e.g. \".jpg\"");
            }
        }
        if self.source_root == self.dest_root {
            bail!("Source and destination roots must differ");
        }
        Ok(())
    }

    /// The extension set handed to the walker.
    #[must_use]
    pub fn extension_set(&self) -> HashSet<String> {
        self.extensions.iter().cloned().collect()
    }
}
