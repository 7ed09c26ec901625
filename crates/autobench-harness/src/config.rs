//! Harness generation settings

use serde::{Deserialize, Serialize};

/// Target framework, package versions and naming for generated projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Target framework moniker
    pub target_framework: String,
    /// BenchmarkDotNet package version
    pub benchmark_version: String,
    /// Version of the logging, options and caching extension packages
    pub extensions_version: String,
    /// Version of the web-testing and live-connection client packages
    pub aspnetcore_version: String,
    /// Suffix of the unit harness project name
    pub unit_suffix: String,
    /// Suffix of the end-to-end harness project name
    pub e2e_suffix: String,
    /// Namespace of generated harness classes
    pub namespace: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            target_framework: "net9.0".to_string(),
            benchmark_version: "0.14.0".to_string(),
            extensions_version: "9.0.0".to_string(),
            aspnetcore_version: "9.0.0".to_string(),
            unit_suffix: "UnitBenchmarks".to_string(),
            e2e_suffix: "E2EBenchmarks".to_string(),
            namespace: "Benchmarks".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set target framework
    #[inline]
    #[must_use]
    pub fn with_target_framework(mut self, framework: impl Into<String>) -> Self {
        self.target_framework = framework.into();
        self
    }

    /// Set BenchmarkDotNet version
    #[inline]
    #[must_use]
    pub fn with_benchmark_version(mut self, version: impl Into<String>) -> Self {
        self.benchmark_version = version.into();
        self
    }

    /// Set extension package version
    #[inline]
    #[must_use]
    pub fn with_extensions_version(mut self, version: impl Into<String>) -> Self {
        self.extensions_version = version.into();
        self
    }

    /// Set ASP.NET Core package version
    #[inline]
    #[must_use]
    pub fn with_aspnetcore_version(mut self, version: impl Into<String>) -> Self {
        self.aspnetcore_version = version.into();
        self
    }
}
