//! # CLI Configuration
//!
//! Optional `agrireg.yaml` passed with `--config`. Every field has a
//! default, so an empty file and no file behave the same.
//!
//! ```yaml
//! referential_delete: cascade   # or reject (default)
//! log_level: info               # tracing filter, default "warn"
//! seed:
//!   producers: 20
//!   rng_seed: 0
//!   harvest_years: 2
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use agrireg_state::{ReferentialPolicy, RegistryConfig};

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Delete policy for regions, localities, and crop kinds with dependents.
    pub referential_delete: ReferentialPolicy,
    /// Default tracing filter when neither `-v` nor `RUST_LOG` is given.
    pub log_level: String,
    /// Defaults for `agrireg seed`.
    pub seed: SeedConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            referential_delete: ReferentialPolicy::default(),
            log_level: "warn".to_string(),
            seed: SeedConfig::default(),
        }
    }
}

/// Seeder defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Number of producers to generate.
    pub producers: usize,
    /// Seed for the deterministic generator.
    pub rng_seed: u64,
    /// How many harvest years, ending with the current one, plantings span.
    pub harvest_years: u8,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            producers: 20,
            rng_seed: 0,
            harvest_years: 2,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// The library-level registry configuration.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            referential_delete: self.referential_delete,
        }
    }
}
