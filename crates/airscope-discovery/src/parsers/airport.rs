//! macOS `airport -s` columnar output (deprecated utility)
//!
//! ```text
//!                             SSID BSSID             RSSI CHANNEL HT CC SECURITY (auth/unicast/group)
//!                       MyHomeWiFi aa:bb:cc:dd:ee:ff -69  5       Y  US WPA2(PSK/AES/AES)
//! ```

use airscope_core::{normalize_security, SecurityVocabulary};
use regex::Regex;
use std::sync::LazyLock;

use super::RawNetworkRecord;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(.*?)\s+([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})\s+(-?\d+)\s+(\d+)\S*\s+\S+\s+\S+\s+(.+?)\s*$",
    )
    .expect("airport line pattern is valid")
});

pub fn parse(output: &str) -> Vec<RawNetworkRecord> {
    output
        .trim()
        .lines()
        .skip(1)
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<RawNetworkRecord> {
    let caps = LINE_RE.captures(line)?;
    Some(RawNetworkRecord {
        ssid: caps[1].trim().to_string(),
        bssid: caps[2].to_uppercase(),
        rssi: caps[3].parse().ok()?,
        channel: caps[4].parse().ok()?,
        security: normalize_security(&caps[5], SecurityVocabulary::Airport),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airscope_core::SecurityClass;

    const AIRPORT_OUTPUT: &str = "                            SSID BSSID             RSSI CHANNEL HT CC SECURITY (auth/unicast/group)
                      MyHomeWiFi aa:bb:cc:dd:ee:ff -69  5       Y  US WPA2(PSK/AES/AES)
                    Coffee Shop 11:22:33:44:55:66 -81  149,+1  Y  -- NONE
                        Legacy  00:0c:41:00:00:01 -75  11      N  US WEP
garbage line without address
";

    #[test]
    fn test_parse_airport() {
        let networks = parse(AIRPORT_OUTPUT);
        assert_eq!(networks.len(), 3);

        assert_eq!(networks[0].ssid, "MyHomeWiFi");
        assert_eq!(networks[0].bssid, "AA:BB:CC:DD:EE:FF");
        assert_eq!(networks[0].rssi, -69);
        assert_eq!(networks[0].channel, 5);
        assert_eq!(networks[0].security, SecurityClass::Wpa2);

        assert_eq!(networks[1].ssid, "Coffee Shop");
        assert_eq!(networks[1].channel, 149);
        assert_eq!(networks[1].security, SecurityClass::Open);

        assert_eq!(networks[2].security, SecurityClass::Wep);
    }

    #[test]
    fn test_header_only() {
        assert!(parse("SSID BSSID RSSI CHANNEL HT CC SECURITY").is_empty());
    }
}
