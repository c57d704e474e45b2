//! TTL prober - runs the system ping utility and pulls the TTL out of its output

use crate::config::ProbeConfig;
use crate::error::{ProbeError, ProbeResult};
use crate::platform::HostFamily;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::{Command, Stdio};
use std::sync::Arc;

// Windows: "TTL=128", iputils: "ttl=64", some BSD builds: "ttl 64"
static TTL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ttl[=:\s]?([0-9]+)").expect("TTL pattern is a valid regex")
});

/// Captured result of one finished ping process
#[derive(Debug, Clone, Default)]
pub struct PingOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs the ping command; swapped out in tests
pub trait PingRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<PingOutput>;
}

/// Spawns the real ping binary and waits for it to exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPing;

impl PingRunner for SystemPing {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<PingOutput> {
        // output() waits for the child, so it is always reaped here
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(PingOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Extract the first TTL value from ping output
///
/// Matching is case-insensitive and accepts `=`, `:`, a single whitespace
/// character or nothing between `ttl` and the digits. A digit run that does
/// not fit a TTL field (above 255) counts as no reading.
pub fn extract_ttl(output: &str) -> Option<u8> {
    let captures = TTL_PATTERN.captures(output)?;
    let digits = captures.get(1)?.as_str();
    match digits.parse::<u8>() {
        Ok(ttl) => Some(ttl),
        Err(_) => {
            debug!("Ignoring out-of-range TTL value {}", digits);
            None
        }
    }
}

/// Build the ping argument list for a target on the given host family
pub fn ping_args(target: &str, config: &ProbeConfig, family: HostFamily) -> Vec<String> {
    let flags = family.ping_flags();
    vec![
        flags.count.to_string(),
        config.count.to_string(),
        flags.timeout.to_string(),
        flags.format_timeout(config.timeout_duration()),
        target.to_string(),
    ]
}

/// Single-shot TTL prober
#[derive(Clone)]
pub struct TtlProber {
    config: ProbeConfig,
    runner: Arc<dyn PingRunner>,
}

impl std::fmt::Debug for TtlProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlProber").field("config", &self.config).finish()
    }
}

impl TtlProber {
    /// Prober backed by the system ping binary
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemPing))
    }

    /// Prober backed by a custom runner
    pub fn with_runner(config: ProbeConfig, runner: Arc<dyn PingRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe a target and report failures as typed errors
    ///
    /// `Ok(None)` means ping succeeded but printed nothing that looks like a TTL.
    pub fn try_probe(&self, target: &str) -> ProbeResult<Option<u8>> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ProbeError::InvalidTarget("Target cannot be empty".to_string()));
        }

        // Resolved per call; the flag set follows the machine running the probe.
        let family = HostFamily::current();
        let args = ping_args(target, &self.config, family);
        debug!("Running {} {} ({} host)", self.config.ping_binary, args.join(" "), family);

        let output = self
            .runner
            .run(&self.config.ping_binary, &args)
            .map_err(|source| ProbeError::Spawn {
                program: self.config.ping_binary.clone(),
                source,
            })?;

        if !output.success {
            return Err(ProbeError::ping_failed(output.code, &output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let ttl = extract_ttl(&stdout);
        if ttl.is_none() {
            debug!("No TTL found in ping output for {}", target);
        }
        Ok(ttl)
    }

    /// Probe a target, degrading every failure to an absent reading
    pub fn probe(&self, target: &str) -> Option<u8> {
        match self.try_probe(target) {
            Ok(ttl) => ttl,
            Err(e) => {
                error!("{}: {}", target.trim(), e);
                None
            }
        }
    }
}
