//! Windows `netsh wlan show networks mode=Bssid` output
//!
//! ```text
//! SSID 1 : MyHomeWiFi
//!     Network type            : Infrastructure
//!     Authentication          : WPA2-Personal
//!     Encryption              : CCMP
//!     BSSID 1                 : aa:bb:cc:dd:ee:ff
//!          Signal             : 80%
//!          Radio type         : 802.11ac
//!          Channel            : 36
//! ```
//!
//! One record is produced per BSSID sub-block.

use airscope_core::{normalize_security, SecurityClass, SecurityVocabulary};
use regex::Regex;
use std::sync::LazyLock;

use super::{percent_to_dbm, RawNetworkRecord};

/// Signal assumed when a BSSID block carries no percentage
const DEFAULT_SIGNAL_PERCENT: u32 = 50;

static SSID_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*SSID \d+[ \t]*:").expect("valid pattern"));
static SSID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*SSID \d+[ \t]*:[ \t]?(.*)$").expect("valid pattern"));
static BSSID_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*BSSID \d+[ \t]*:").expect("valid pattern"));
static BSSID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*BSSID \d+[ \t]*:[ \t]*([0-9A-Fa-f:]{17})").expect("valid pattern")
});
static SIGNAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Signal[ \t]*:[ \t]*(\d+)%").expect("valid pattern"));
static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Channel[ \t]*:[ \t]*(\d+)").expect("valid pattern"));
static AUTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Authentication[ \t]*:[ \t]*(.+)$").expect("valid pattern")
});
static INTERFACE_SSID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*SSID[ \t]+:[ \t]?(.+)$").expect("valid pattern"));

/// Split `text` into pieces that each start at a match of `header`
fn split_at_headers<'a>(text: &'a str, header: &Regex) -> Vec<&'a str> {
    let starts: Vec<usize> = header.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

pub fn parse(output: &str) -> Vec<RawNetworkRecord> {
    let mut networks = Vec::new();

    for block in split_at_headers(output, &SSID_HEADER_RE) {
        let Some(ssid) = SSID_RE.captures(block).map(|c| c[1].trim().to_string()) else {
            continue;
        };
        let security = AUTH_RE
            .captures(block)
            .map(|c| normalize_security(c[1].trim(), SecurityVocabulary::Netsh))
            .unwrap_or(SecurityClass::Open);

        for bss in split_at_headers(block, &BSSID_HEADER_RE) {
            let Some(bssid) = BSSID_RE.captures(bss).map(|c| c[1].to_uppercase()) else {
                continue;
            };
            let percent = SIGNAL_RE
                .captures(bss)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(DEFAULT_SIGNAL_PERCENT);
            let channel = CHANNEL_RE
                .captures(bss)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0);

            networks.push(RawNetworkRecord {
                ssid: ssid.clone(),
                bssid,
                rssi: percent_to_dbm(percent),
                channel,
                security,
            });
        }
    }

    networks
}

/// SSID of the associated network from `netsh wlan show interfaces`
pub fn current_network_name(output: &str) -> Option<String> {
    INTERFACE_SSID_RE
        .captures(output)
        .map(|c| c[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETSH_OUTPUT: &str = "
Interface name : Wi-Fi
There are 2 networks currently visible.

SSID 1 : MyHomeWiFi
    Network type            : Infrastructure
    Authentication          : WPA2-Personal
    Encryption              : CCMP
    BSSID 1                 : aa:bb:cc:dd:ee:ff
         Signal             : 80%
         Radio type         : 802.11ac
         Channel            : 36
    BSSID 2                 : aa:bb:cc:dd:ee:00
         Signal             : 41%
         Radio type         : 802.11n
         Channel            : 6

SSID 2 :
    Network type            : Infrastructure
    Authentication          : Open
    Encryption              : None
    BSSID 1                 : 10:fe:ed:01:02:03
         Signal             : 100%
         Channel            : 11

SSID 3 : NoBssid
    Network type            : Infrastructure
    Authentication          : WPA3-Personal
";

    #[test]
    fn test_parse_netsh_blocks() {
        let networks = parse(NETSH_OUTPUT);
        assert_eq!(networks.len(), 3);

        assert_eq!(networks[0].ssid, "MyHomeWiFi");
        assert_eq!(networks[0].bssid, "AA:BB:CC:DD:EE:FF");
        assert_eq!(networks[0].rssi, -60);
        assert_eq!(networks[0].channel, 36);
        assert_eq!(networks[0].security, SecurityClass::Wpa2);

        assert_eq!(networks[1].ssid, "MyHomeWiFi");
        assert_eq!(networks[1].rssi, -79);
        assert_eq!(networks[1].channel, 6);

        assert_eq!(networks[2].ssid, "");
        assert_eq!(networks[2].rssi, -50);
        assert_eq!(networks[2].security, SecurityClass::Open);
    }

    #[test]
    fn test_crlf_output() {
        let output = NETSH_OUTPUT.replace('\n', "\r\n");
        let networks = parse(&output);
        assert_eq!(networks.len(), 3);
        assert_eq!(networks[0].ssid, "MyHomeWiFi");
        assert_eq!(networks[0].security, SecurityClass::Wpa2);
    }

    #[test]
    fn test_current_network_name() {
        let output = "
    Name                   : Wi-Fi
    State                  : connected
    SSID                   : MyHomeWiFi
    BSSID                  : aa:bb:cc:dd:ee:ff
";
        assert_eq!(current_network_name(output).as_deref(), Some("MyHomeWiFi"));
        assert_eq!(current_network_name("    State : disconnected\n"), None);
    }
}
