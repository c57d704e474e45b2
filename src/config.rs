//! Configuration module for ttlprobe

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values given on the command line; `None` leaves the layer below untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub count: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config
    }
}

/// Settings for a ping probe and the batch runner around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Number of echo requests sent per probe
    pub count: u32,

    /// Reply timeout in seconds
    pub timeout_secs: u64,

    /// Ping executable, looked up on PATH unless absolute
    pub ping_binary: String,

    /// Maximum number of probes running at once in batch mode
    pub concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            count: 1,
            timeout_secs: 2,
            ping_binary: "ping".to_string(),
            concurrency: 8,
        }
    }
}

impl ProbeConfig {
    /// Set the echo request count
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the ping executable
    pub fn with_ping_binary(mut self, ping_binary: impl Into<String>) -> Self {
        self.ping_binary = ping_binary.into();
        self
    }

    /// Set the batch concurrency limit
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `~/.ttlprobe.toml`, or `./.ttlprobe.toml` when there is no home directory
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ttlprobe.toml")
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load_default_config() -> Self {
        Self::load_or_default(Self::default_path())
    }

    /// Load `path` if it exists; a missing or unreadable file yields defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if path.exists() {
            match Self::from_toml_file(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    /// Layer defaults, config file, environment and command-line overrides
    ///
    /// An explicit `config_file` must load; otherwise `default_file` is used
    /// when it loads and silently skipped when it does not. The result is
    /// validated before it is returned.
    pub fn resolve<F>(
        config_file: Option<&Path>,
        default_file: &Path,
        lookup: F,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match config_file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::load_or_default(default_file),
        };

        let config = overrides.apply(base.apply_env_from(lookup));
        config.validate()?;
        Ok(config)
    }

    /// Apply `TTLPROBE_*` environment overrides
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(count) = lookup("TTLPROBE_COUNT") {
            match count.trim().parse() {
                Ok(count) => self.count = count,
                Err(_) => log::warn!("Ignoring TTLPROBE_COUNT={:?}: not a number", count),
            }
        }

        if let Some(timeout) = lookup("TTLPROBE_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(timeout) => self.timeout_secs = timeout,
                Err(_) => log::warn!("Ignoring TTLPROBE_TIMEOUT={:?}: not a number", timeout),
            }
        }

        if let Some(binary) = lookup("TTLPROBE_PING") {
            if !binary.trim().is_empty() {
                self.ping_binary = binary.trim().to_string();
            }
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::Invalid("Echo request count must be greater than 0".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("Timeout must be greater than 0".to_string()));
        } else if self.timeout_secs > 300 {
            return Err(ConfigError::Invalid("Timeout is too high (max 5 minutes)".to_string()));
        }

        if self.ping_binary.trim().is_empty() {
            return Err(ConfigError::Invalid("Ping binary cannot be empty".to_string()));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("Concurrency must be greater than 0".to_string()));
        }

        Ok(())
    }
}
