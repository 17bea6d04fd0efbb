//! macOS `system_profiler SPAirPortDataType` text output
//!
//! Networks are nested by indentation:
//!
//! ```text
//!           Current Network Information:
//!             MyHomeWiFi:
//!               Channel: 5 (2GHz, 20MHz)
//!               Security: WPA/WPA2 Personal
//!               Signal / Noise: -69 dBm / -97 dBm
//!           Other Local Wi-Fi Networks:
//!             Neighbor_WiFi:
//!               ...
//! ```

use airscope_core::{normalize_security, SecurityClass, SecurityVocabulary};

use super::{leading_i32, leading_u32, RawNetworkRecord};

pub const CURRENT_SECTION: &str = "Current Network Information:";
pub const OTHER_SECTION: &str = "Other Local Wi-Fi Networks:";

/// Entry being collected under the current section
#[derive(Default)]
struct PendingEntry {
    ssid: String,
    bssid: String,
    rssi: Option<i32>,
    channel: u32,
    security: SecurityClass,
}

impl PendingEntry {
    fn named(ssid: &str) -> Self {
        Self {
            ssid: ssid.to_string(),
            ..Default::default()
        }
    }

    /// Complete entries have a name and a signal value
    fn finish(self) -> Option<RawNetworkRecord> {
        if self.ssid.is_empty() {
            return None;
        }
        Some(RawNetworkRecord {
            ssid: self.ssid,
            bssid: self.bssid,
            rssi: self.rssi?,
            channel: self.channel,
            security: self.security,
        })
    }
}

/// Parse both network sections, current network first
pub fn parse(output: &str) -> Vec<RawNetworkRecord> {
    let mut networks = Vec::new();
    for section in [CURRENT_SECTION, OTHER_SECTION] {
        if let Some((_, content)) = output.split_once(section) {
            parse_section(content, &mut networks);
        }
    }
    networks
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn parse_section(content: &str, networks: &mut Vec<RawNetworkRecord>) {
    let mut base_indent: Option<usize> = None;
    let mut pending: Option<PendingEntry> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let indent = indent_of(line);
        let base = *base_indent.get_or_insert(indent);

        if indent == base {
            if let Some(record) = pending.take().and_then(PendingEntry::finish) {
                networks.push(record);
            }
            let name = trimmed.strip_suffix(':').unwrap_or(trimmed);
            pending = Some(PendingEntry::named(name));
        } else if indent > base {
            if let Some(entry) = pending.as_mut() {
                apply_attribute(entry, trimmed);
            }
        } else {
            break;
        }
    }

    if let Some(record) = pending.and_then(PendingEntry::finish) {
        networks.push(record);
    }
}

fn apply_attribute(entry: &mut PendingEntry, line: &str) {
    if let Some(value) = line.strip_prefix("Channel:") {
        if let Some(channel) = leading_u32(value) {
            entry.channel = channel;
        }
    } else if let Some(value) = line.strip_prefix("Signal / Noise:") {
        if let Some(rssi) = leading_i32(value) {
            entry.rssi = Some(rssi);
        }
    } else if let Some(value) = line.strip_prefix("Security:") {
        entry.security = normalize_security(value, SecurityVocabulary::Profiler);
    } else if let Some(value) = line.strip_prefix("BSSID:") {
        entry.bssid = value.trim().to_string();
    }
}

/// Name of the first entry under the current network section
pub fn current_network_name(output: &str) -> Option<String> {
    let mut lines = output.lines();
    let header = lines.find(|l| l.trim() == CURRENT_SECTION)?;
    let header_indent = indent_of(header);

    let first = lines.find(|l| !l.trim().is_empty())?;
    if indent_of(first) <= header_indent {
        return None;
    }
    let trimmed = first.trim();
    let name = trimmed.strip_suffix(':').unwrap_or(trimmed);
    (!name.is_empty()).then(|| name.to_string())
}
