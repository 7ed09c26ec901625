//! Error types shared across the pipeline seams

use std::path::PathBuf;

/// Errors raised by an execution platform before a process result exists
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The tool binary could not be started
    #[error("failed to start '{program}' in {dir}: {source}")]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on or reading from the child process failed
    #[error("io error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl PlatformError {
    /// Create spawn error
    pub fn spawn(program: impl Into<String>, dir: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            dir: dir.into(),
            source,
        }
    }

    /// Create IO error
    pub fn io(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            program: program.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_display() {
        let err = PlatformError::spawn(
            "dotnet",
            "/tmp/App.UnitBenchmarks",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().starts_with("failed to start 'dotnet'"));
    }
}
