//! Runner configuration
//!
//! Loaded from an optional `autobench.toml`, then overridden from the
//! environment. Every field has a default so a partial file is valid.

use crate::error::ConfigError;
use autobench_analysis::EndpointPatterns;
use autobench_harness::HarnessConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "autobench.toml";

/// Overrides the solutions directory
pub const ENV_SOLUTIONS_DIR: &str = "AUTOBENCH_SOLUTIONS_DIR";

/// Overrides the artifacts directory
pub const ENV_ARTIFACTS_DIR: &str = "AUTOBENCH_ARTIFACTS_DIR";

/// Overrides the end-to-end concurrency cap
pub const ENV_E2E_CONCURRENCY: &str = "AUTOBENCH_E2E_CONCURRENCY";

/// Report file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportNames {
    /// Per-solution technical report
    pub technical: String,
    /// Cross-solution technical report
    pub aggregate: String,
    /// Product-owner report (per solution and aggregate)
    pub product_owner: String,
}

impl Default for ReportNames {
    fn default() -> Self {
        Self {
            technical: "BenchmarkReport.md".to_string(),
            aggregate: "AggregateReport.md".to_string(),
            product_owner: "ProductOwnerReport.md".to_string(),
        }
    }
}

/// Batch runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory searched for solution manifests
    pub solutions_dir: PathBuf,
    /// Directory receiving per-solution copies and aggregate reports
    pub artifacts_dir: PathBuf,
    /// Concurrent end-to-end partitions; 1 runs the project as a whole
    pub e2e_concurrency: usize,
    /// Report file names
    pub reports: ReportNames,
    /// Generated project settings
    pub harness: HarnessConfig,
    /// Live endpoint detection patterns
    pub endpoints: EndpointPatterns,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            solutions_dir: PathBuf::from("solutions"),
            artifacts_dir: PathBuf::from("artifacts"),
            e2e_concurrency: 1,
            reports: ReportNames::default(),
            harness: HarnessConfig::default(),
            endpoints: EndpointPatterns::default(),
        }
    }
}

impl RunnerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With solutions directory
    #[inline]
    #[must_use]
    pub fn with_solutions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.solutions_dir = dir.into();
        self
    }

    /// With artifacts directory
    #[inline]
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// With end-to-end concurrency cap
    #[inline]
    #[must_use]
    pub fn with_e2e_concurrency(mut self, cap: usize) -> Self {
        self.e2e_concurrency = cap.max(1);
        self
    }

    /// With harness settings
    #[inline]
    #[must_use]
    pub fn with_harness(mut self, harness: HarnessConfig) -> Self {
        self.harness = harness;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns `Parse` if the text does not match the schema.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns `Io` or `Parse` for an unreadable or invalid file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// Load an explicit file, else `autobench.toml` if present, else defaults;
    /// then apply environment overrides
    ///
    /// # Errors
    /// Propagates load errors and invalid overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(CONFIG_FILE).is_file() => Self::load(Path::new(CONFIG_FILE))?,
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    ///
    /// # Errors
    /// Returns `InvalidOverride` for a concurrency that is not a positive integer.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_SOLUTIONS_DIR).filter(|v| !v.is_empty()) {
            self.solutions_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_ARTIFACTS_DIR).filter(|v| !v.is_empty()) {
            self.artifacts_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_E2E_CONCURRENCY) {
            self.e2e_concurrency = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|cap| *cap > 0)
                .ok_or(ConfigError::InvalidOverride {
                    name: ENV_E2E_CONCURRENCY.to_string(),
                    value,
                })?;
        }
        Ok(self)
    }
}
