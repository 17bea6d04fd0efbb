//! Parsers for platform wireless scan output
//!
//! Each parser turns the raw text of one tool into [`RawNetworkRecord`]s.
//! Lines or entries that do not match are skipped; only payloads that
//! cannot be read at all (invalid JSON) are reported as errors.

pub mod airport;
pub mod iwlist;
pub mod netsh;
pub mod nmcli;
pub mod profiler;
pub mod profiler_json;

use airscope_core::SecurityClass;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// A network as read from one tool, before enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNetworkRecord {
    /// Network name, empty for hidden networks
    pub ssid: String,
    /// Station address as printed by the tool, empty if not reported
    pub bssid: String,
    /// Signal level in dBm
    pub rssi: i32,
    pub channel: u32,
    pub security: SecurityClass,
}

/// Output format of a scan source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
    /// `system_profiler SPAirPortDataType -json`
    ProfilerJson,
    /// `system_profiler SPAirPortDataType`
    ProfilerText,
    /// `airport -s`
    Airport,
    /// `netsh wlan show networks mode=Bssid`
    Netsh,
    /// `nmcli -t -f SSID,BSSID,SIGNAL,CHAN,SECURITY device wifi list`
    Nmcli,
    /// `iwlist <iface> scan`
    Iwlist,
}

impl ScanFormat {
    pub fn parse(&self, output: &str) -> Result<Vec<RawNetworkRecord>, ParseError> {
        match self {
            Self::ProfilerJson => profiler_json::parse(output),
            Self::ProfilerText => Ok(profiler::parse(output)),
            Self::Airport => Ok(airport::parse(output)),
            Self::Netsh => Ok(netsh::parse(output)),
            Self::Nmcli => Ok(nmcli::parse(output)),
            Self::Iwlist => Ok(iwlist::parse(output)),
        }
    }

    /// Profiler output lists the associated network twice (current and
    /// other networks), so its records are deduplicated by name.
    pub fn needs_dedup(&self) -> bool {
        matches!(self, Self::ProfilerJson | Self::ProfilerText)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfilerJson => "profiler-json",
            Self::ProfilerText => "profiler-text",
            Self::Airport => "airport",
            Self::Netsh => "netsh",
            Self::Nmcli => "nmcli",
            Self::Iwlist => "iwlist",
        }
    }
}

impl std::fmt::Display for ScanFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a signal percentage to approximate dBm: `round(percent / 2 - 100)`
///
/// Halves round up, so 81% gives -59.
pub fn percent_to_dbm(percent: u32) -> i32 {
    (percent as f64 / 2.0 - 100.0 + 0.5).floor() as i32
}

/// Leading unsigned integer of a string ("5 (2GHz, 20MHz)" -> 5)
pub(crate) fn leading_u32(s: &str) -> Option<u32> {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Leading signed integer of a string ("-69 dBm / -97 dBm" -> -69)
///
/// Values outside the `i32` range give `None`.
pub(crate) fn leading_i32(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with('-'));
    let digits = s[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}
