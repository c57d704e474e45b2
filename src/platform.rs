//! Host platform detection and ping flag selection
//!
//! `ping` spells its count and timeout options differently depending on the
//! machine it runs on. The flag set is always chosen from the *executing*
//! host, never from the probed target.

use std::time::Duration;

/// OS family of the machine running the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFamily {
    Windows,
    MacOs,
    Unix,
}

/// Unit the timeout flag expects its argument in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutUnit {
    Seconds,
    Milliseconds,
}

/// Count/timeout option letters for one host family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFlags {
    pub count: &'static str,
    pub timeout: &'static str,
    pub timeout_unit: TimeoutUnit,
}

impl PingFlags {
    /// Render a timeout in the unit this flag set expects
    pub fn format_timeout(&self, timeout: Duration) -> String {
        match self.timeout_unit {
            TimeoutUnit::Seconds => timeout.as_secs().max(1).to_string(),
            TimeoutUnit::Milliseconds => timeout.as_millis().max(1).to_string(),
        }
    }
}

// Windows and macOS take the per-reply wait in milliseconds, iputils and the
// BSDs in whole seconds.
const FLAG_TABLE: [(HostFamily, PingFlags); 3] = [
    (
        HostFamily::Windows,
        PingFlags { count: "-n", timeout: "-w", timeout_unit: TimeoutUnit::Milliseconds },
    ),
    (
        HostFamily::MacOs,
        PingFlags { count: "-c", timeout: "-W", timeout_unit: TimeoutUnit::Milliseconds },
    ),
    (
        HostFamily::Unix,
        PingFlags { count: "-c", timeout: "-W", timeout_unit: TimeoutUnit::Seconds },
    ),
];

impl HostFamily {
    /// Family of the machine this binary is running on
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a family
    pub fn from_os_name(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "windows" => HostFamily::Windows,
            "macos" | "ios" => HostFamily::MacOs,
            _ => HostFamily::Unix,
        }
    }

    /// Flag set used by `ping` on this family
    pub fn ping_flags(self) -> PingFlags {
        FLAG_TABLE
            .iter()
            .find(|(family, _)| *family == self)
            .map(|(_, flags)| *flags)
            .unwrap_or(FLAG_TABLE[2].1)
    }
}

impl std::fmt::Display for HostFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HostFamily::Windows => "windows",
            HostFamily::MacOs => "macos",
            HostFamily::Unix => "unix",
        };
        write!(f, "{}", name)
    }
}
