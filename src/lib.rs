//! ttlprobe - guess a remote host's operating system from its ping TTL
//!
//! The TTL in an echo reply starts at an OS-specific value and is decremented
//! by every router on the way, so the guess is a heuristic at best.

pub mod batch;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod platform;
pub mod probe;

// Re-export commonly used types
pub use classify::{classify, classify_detailed, Classification, MatchedRule, OsGuess};
pub use config::{ConfigOverrides, ProbeConfig};
pub use error::{ConfigError, ProbeError, ProbeResult};
pub use output::{OutputConfig, OutputFormat, OutputManager, ProbeReport};
pub use platform::HostFamily;
pub use probe::{extract_ttl, PingOutput, PingRunner, SystemPing, TtlProber};
