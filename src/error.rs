//! Error handling for ttlprobe
//!
//! Probe failures are recoverable by contract: the prober logs them and
//! degrades to an absent TTL reading. The typed errors below exist so callers
//! that want the detail (batch reports, tests) can still see it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running a single ping probe
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Ping command failed ({status}): {stderr}")]
    PingFailed { status: String, stderr: String },
}

impl ProbeError {
    /// Build a `PingFailed` from a finished child's exit code and stderr
    pub fn ping_failed(code: Option<i32>, stderr: &[u8]) -> Self {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            "no diagnostic output".to_string()
        } else {
            stderr
        };
        ProbeError::PingFailed { status, stderr }
    }

    /// Whether the failure happened before the ping binary ever ran
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, ProbeError::Spawn { .. })
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_failed_without_stderr() {
        let err = ProbeError::ping_failed(None, b"  \n");
        match err {
            ProbeError::PingFailed { status, stderr } => {
                assert_eq!(status, "terminated by signal");
                assert_eq!(stderr, "no diagnostic output");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ping_failed_keeps_stderr() {
        let err = ProbeError::ping_failed(Some(2), b"ping: unknown host nowhere.invalid\n");
        assert!(err.to_string().contains("exit code 2"));
        assert!(err.to_string().contains("unknown host nowhere.invalid"));
        assert!(!err.is_launch_failure());
    }

    #[test]
    fn test_spawn_is_launch_failure() {
        let err = ProbeError::Spawn {
            program: "ping".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_launch_failure());
        assert!(err.to_string().starts_with("Failed to launch ping"));
    }
}
