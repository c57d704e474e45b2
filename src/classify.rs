//! TTL-based OS classification
//!
//! Maps the TTL seen in an echo reply to a best-guess OS label. The rules are
//! an ordered table evaluated first-match-wins:
//!
//! 1. the first primary branch whose range contains the TTL is consulted, and
//!    only that branch (later branches are skipped even if it yields nothing);
//! 2. if no label came out of step 1, the fallback ranges are tried;
//! 3. otherwise the guess is [`OsGuess::Unknown`].
//!
//! Overlaps, dead entries and gaps are part of the heuristic and are kept as is.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

/// Closed set of guesses the classifier can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsGuess {
    CiscoDevice,
    Windows,
    UnixLike,
    Os2,
    MacOs,
    Windows9x,
    Aix,
    Bsdi,
    SunOs,
    Novell,
    SolarisAix,
    HpUx,
    LikelyUnixVariant,
    LikelyWindowsVariant,
    Unknown,
}

impl OsGuess {
    pub const ALL: [OsGuess; 15] = [
        OsGuess::CiscoDevice,
        OsGuess::Windows,
        OsGuess::UnixLike,
        OsGuess::Os2,
        OsGuess::MacOs,
        OsGuess::Windows9x,
        OsGuess::Aix,
        OsGuess::Bsdi,
        OsGuess::SunOs,
        OsGuess::Novell,
        OsGuess::SolarisAix,
        OsGuess::HpUx,
        OsGuess::LikelyUnixVariant,
        OsGuess::LikelyWindowsVariant,
        OsGuess::Unknown,
    ];

    /// Human-readable label printed to the operator
    pub fn label(self) -> &'static str {
        match self {
            OsGuess::CiscoDevice => "Cisco Device",
            OsGuess::Windows => "Windows OS (likely Windows Server or Desktop)",
            OsGuess::UnixLike => "Linux/FreeBSD/macOS/Unix-like",
            OsGuess::Os2 => "IBM OS/2",
            OsGuess::MacOs => "macOS",
            OsGuess::Windows9x => "Windows 95/98/ME",
            OsGuess::Aix => "AIX",
            OsGuess::Bsdi => "BSDI",
            OsGuess::SunOs => "SunOS",
            OsGuess::Novell => "Novell",
            OsGuess::SolarisAix => "Solaris/AIX",
            OsGuess::HpUx => "HP-UX",
            OsGuess::LikelyUnixVariant => "Likely Unix/Linux or macOS variant",
            OsGuess::LikelyWindowsVariant => "Likely Windows variant",
            OsGuess::Unknown => "Unknown OS or device",
        }
    }

    /// False for labels that sit behind a shadowed branch and can never be returned
    pub fn is_reachable(self) -> bool {
        !matches!(self, OsGuess::Novell | OsGuess::SolarisAix | OsGuess::HpUx)
    }
}

// Serialized as its label so reports carry the same text the operator sees
impl Serialize for OsGuess {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for OsGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a single entry inside a primary branch picks its TTL
#[derive(Debug, Clone, Copy)]
enum Pick {
    Exact(u8),
    /// Catch-all for the rest of the branch range
    Rest,
}

struct Branch {
    name: &'static str,
    range: RangeInclusive<u8>,
    picks: &'static [(Pick, OsGuess)],
}

static PRIMARY_BRANCHES: [Branch; 4] = [
    Branch {
        name: "high",
        range: 128..=255,
        picks: &[(Pick::Exact(255), OsGuess::CiscoDevice), (Pick::Rest, OsGuess::Windows)],
    },
    Branch {
        name: "mid",
        range: 64..=127,
        // 190 can never land in 64..=127; kept as a no-op entry. Values such
        // as 70 match nothing here and are not rescued by the fallbacks.
        picks: &[
            (Pick::Exact(64), OsGuess::UnixLike),
            (Pick::Exact(100), OsGuess::Os2),
            (Pick::Exact(127), OsGuess::MacOs),
            (Pick::Exact(190), OsGuess::MacOs),
        ],
    },
    Branch {
        name: "low",
        range: 30..=63,
        picks: &[
            (Pick::Exact(50), OsGuess::Windows9x),
            (Pick::Exact(60), OsGuess::Aix),
            (Pick::Exact(48), OsGuess::Bsdi),
            (Pick::Exact(30), OsGuess::SunOs),
        ],
    },
    // Shadowed by "high", which already owns 128..=255. Never consulted.
    Branch {
        name: "legacy-high",
        range: 200..=255,
        picks: &[
            (Pick::Exact(240), OsGuess::Novell),
            (Pick::Exact(254), OsGuess::SolarisAix),
            (Pick::Exact(200), OsGuess::HpUx),
        ],
    },
];

static FALLBACKS: [(RangeInclusive<u8>, OsGuess); 2] = [
    (50..=64, OsGuess::LikelyUnixVariant),
    (120..=130, OsGuess::LikelyWindowsVariant),
];

/// Which stage of the rule table produced a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum MatchedRule {
    Exact { branch: &'static str },
    BranchDefault { branch: &'static str },
    Fallback,
    Default,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedRule::Exact { branch } => write!(f, "exact value in {} range", branch),
            MatchedRule::BranchDefault { branch } => write!(f, "{} range", branch),
            MatchedRule::Fallback => write!(f, "fallback range"),
            MatchedRule::Default => write!(f, "no rule matched"),
        }
    }
}

/// A guess together with the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub ttl: u8,
    pub guess: OsGuess,
    pub rule: MatchedRule,
}

/// Classify a TTL, keeping track of the matched rule
pub fn classify_detailed(ttl: u8) -> Classification {
    if let Some(branch) = PRIMARY_BRANCHES.iter().find(|b| b.range.contains(&ttl)) {
        for (pick, guess) in branch.picks {
            let rule = match pick {
                Pick::Exact(value) if *value == ttl => MatchedRule::Exact { branch: branch.name },
                Pick::Exact(_) => continue,
                Pick::Rest => MatchedRule::BranchDefault { branch: branch.name },
            };
            return Classification { ttl, guess: *guess, rule };
        }
    }

    for (range, guess) in &FALLBACKS {
        if range.contains(&ttl) {
            return Classification { ttl, guess: *guess, rule: MatchedRule::Fallback };
        }
    }

    Classification { ttl, guess: OsGuess::Unknown, rule: MatchedRule::Default }
}

/// Best-guess OS for a TTL value
pub fn classify(ttl: u8) -> OsGuess {
    classify_detailed(ttl).guess
}
