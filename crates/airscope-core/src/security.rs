//! Security protocol normalization
//!
//! Every platform tool reports security in its own vocabulary
//! ("WPA2 Personal", "WPA2(PSK/AES/AES)", "WPA1 WPA2", "OPN", ...).
//! Everything is folded into [`SecurityClass`] before it leaves the engine.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Normalized security class of a wireless network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityClass {
    Open,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WPA2")]
    Wpa2,
    #[serde(rename = "WPA3")]
    Wpa3,
    /// WPA2/WPA3 transition mode; never produced by [`normalize_security`]
    #[serde(rename = "WPA2/WPA3")]
    Wpa2Wpa3,
}

impl SecurityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wpa3 => "WPA3",
            Self::Wpa2Wpa3 => "WPA2/WPA3",
        }
    }
}

impl Default for SecurityClass {
    fn default() -> Self {
        Self::Open
    }
}

impl std::fmt::Display for SecurityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Source vocabulary a raw security string was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityVocabulary {
    /// macOS system_profiler (text and JSON)
    Profiler,
    /// macOS airport utility
    Airport,
    /// Windows netsh
    Netsh,
    /// NetworkManager nmcli
    Nmcli,
    /// wireless-tools iwlist
    Iwlist,
}

impl SecurityVocabulary {
    /// Whether an uppercased security string is this tool's explicit "open" marker
    pub fn is_open_token(&self, upper: &str) -> bool {
        match self {
            Self::Profiler => upper == "NONE" || upper.ends_with("_NONE") || upper.contains("OPEN"),
            Self::Airport => matches!(upper, "OPN" | "--" | "NONE"),
            Self::Netsh => upper == "OPEN",
            Self::Nmcli => upper.is_empty() || upper == "--",
            Self::Iwlist => upper.is_empty() || upper.contains("ENCRYPTION KEY:OFF"),
        }
    }
}

/// Normalize a raw security string into a [`SecurityClass`]
///
/// Case-insensitive substring tests in priority order
/// WPA3 > WPA2 > WPA > WEP > Open. The profiler vocabulary maps the macOS
/// `WPA/WPA2` mixed mode to WPA ahead of the priority rule. Strings that are
/// neither a protocol nor the vocabulary's open token are logged and treated
/// as open.
pub fn normalize_security(raw: &str, vocabulary: SecurityVocabulary) -> SecurityClass {
    let upper = raw.trim().to_uppercase();

    if vocabulary == SecurityVocabulary::Profiler {
        if upper.contains("WPA/WPA2") || upper.contains("WPA_WPA2") {
            return SecurityClass::Wpa;
        }
    }

    if upper.contains("WPA3") {
        SecurityClass::Wpa3
    } else if upper.contains("WPA2") {
        SecurityClass::Wpa2
    } else if upper.contains("WPA") {
        SecurityClass::Wpa
    } else if upper.contains("WEP") {
        SecurityClass::Wep
    } else {
        if !vocabulary.is_open_token(&upper) {
            trace!(raw = %raw, ?vocabulary, "Unrecognised security string, treating as open");
        }
        SecurityClass::Open
    }
}
