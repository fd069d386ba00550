//! Manifest policy configuration.
//!
//! Policy flags can be set in code or loaded from a TOML file:
//!
//! ```toml
//! keep-all-units = false
//! keep-moochers = true
//! keep-original-order = false
//! sort-strategy = "depth-first"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::SortStrategy;

/// Policy applied by [`crate::ManifestBuilder`] when computing a manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManifestConfig {
    /// Skip pruning: every added unit ends up in the manifest.
    pub keep_all_units: bool,

    /// Treat units that provide nothing as entry points.
    pub keep_moochers: bool,

    /// Skip sorting: keep units in the order they were added.
    pub keep_original_order: bool,

    pub sort_strategy: SortStrategy,
}

impl ManifestConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse manifest config")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load manifest config from {}: {:#}",
                path.display(),
                e
            );
            Self::default()
        })
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize manifest config")
    }
}
