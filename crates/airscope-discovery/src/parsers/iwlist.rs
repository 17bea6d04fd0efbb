//! wireless-tools `iwlist <iface> scan` output
//!
//! ```text
//! wlan0     Scan completed :
//!           Cell 01 - Address: AA:BB:CC:DD:EE:FF
//!                     Channel:6
//!                     Frequency:2.437 GHz (Channel 6)
//!                     Quality=70/70  Signal level=-40 dBm
//!                     Encryption key:on
//!                     ESSID:"MyHomeWiFi"
//!                     IE: IEEE 802.11i/WPA2 Version 1
//! ```
//!
//! There is no labelled security field; the class is inferred from which
//! protocol names appear anywhere in the cell.

use airscope_core::{normalize_security, SecurityVocabulary};
use regex::Regex;
use std::sync::LazyLock;

use super::{percent_to_dbm, RawNetworkRecord};

/// Signal assumed when a cell carries no signal level
const DEFAULT_RSSI: i32 = -70;

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Cell \d+ - ").expect("valid pattern"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Address:\s*([0-9A-Fa-f:]{17})").expect("valid pattern"));
static ESSID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ESSID:"(.*)""#).expect("valid pattern"));
static SIGNAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Signal level[=:]\s*(-?\d+)(/100)?").expect("valid pattern"));
static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Channel[: ](\d+)").expect("valid pattern"));

pub fn parse(output: &str) -> Vec<RawNetworkRecord> {
    CELL_RE
        .split(output)
        .skip(1)
        .filter_map(parse_cell)
        .collect()
}

fn parse_cell(cell: &str) -> Option<RawNetworkRecord> {
    let bssid = ADDRESS_RE.captures(cell)?[1].to_uppercase();

    let ssid = ESSID_RE
        .captures(cell)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    let rssi = SIGNAL_RE
        .captures(cell)
        .and_then(|c| {
            let level: i32 = c[1].parse().ok()?;
            // Some drivers report "Signal level=45/100" instead of dBm
            if c.get(2).is_some() {
                Some(percent_to_dbm(level.clamp(0, 100) as u32))
            } else {
                Some(level)
            }
        })
        .unwrap_or(DEFAULT_RSSI);

    let channel = CHANNEL_RE
        .captures(cell)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);

    // The network name must not influence the security class
    let attributes: String = cell
        .lines()
        .filter(|line| !line.contains("ESSID:"))
        .collect::<Vec<_>>()
        .join("\n");

    Some(RawNetworkRecord {
        ssid,
        bssid,
        rssi,
        channel,
        security: normalize_security(&attributes, SecurityVocabulary::Iwlist),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airscope_core::SecurityClass;

    const IWLIST_OUTPUT: &str = r#"wlan0     Scan completed :
          Cell 01 - Address: aa:bb:cc:dd:ee:ff
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=70/70  Signal level=-40 dBm
                    Encryption key:on
                    ESSID:"MyHomeWiFi"
                    IE: IEEE 802.11i/WPA2 Version 1
                    IE: WPA Version 1
          Cell 02 - Address: 11:22:33:44:55:66
                    Frequency:5.18 GHz (Channel 36)
                    Quality=40/70  Signal level=-70 dBm
                    Encryption key:off
                    ESSID:"WPA3 is just my name"
          Cell 03 - Address: 00:0c:41:00:00:01
                    Channel:11
                    Quality:45/100  Signal level:45/100
                    ESSID:""
                    IE: Unknown: WEP
          Cell 04 - Channel:1
                    ESSID:"NoAddress"
"#;

    #[test]
    fn test_parse_cells() {
        let networks = parse(IWLIST_OUTPUT);
        assert_eq!(networks.len(), 3);

        assert_eq!(networks[0].ssid, "MyHomeWiFi");
        assert_eq!(networks[0].bssid, "AA:BB:CC:DD:EE:FF");
        assert_eq!(networks[0].rssi, -40);
        assert_eq!(networks[0].channel, 6);
        assert_eq!(networks[0].security, SecurityClass::Wpa2);

        assert_eq!(networks[1].ssid, "WPA3 is just my name");
        assert_eq!(networks[1].channel, 36);
        assert_eq!(networks[1].security, SecurityClass::Open);

        assert_eq!(networks[2].ssid, "");
        assert_eq!(networks[2].rssi, percent_to_dbm(45));
        assert_eq!(networks[2].security, SecurityClass::Wep);
    }

    #[test]
    fn test_no_cells() {
        assert!(parse("wlan0     No scan results\n").is_empty());
    }
}
