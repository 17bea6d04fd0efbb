//! macOS `system_profiler SPAirPortDataType -json` output

use airscope_core::{normalize_security, SecurityVocabulary};
use serde_json::Value;

use super::{leading_i32, leading_u32, ParseError, RawNetworkRecord};

/// Signal assumed when the profiler omits signal/noise for a network
const DEFAULT_RSSI: i32 = -70;

const INTERFACES_POINTER: &str = "/SPAirPortDataType/0/spairport_airport_interfaces";

fn interfaces(data: &Value) -> impl Iterator<Item = &Value> {
    data.pointer(INTERFACES_POINTER)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Parse the current network, then every other visible network
pub fn parse(output: &str) -> Result<Vec<RawNetworkRecord>, ParseError> {
    let data: Value = serde_json::from_str(output)?;
    let mut networks = Vec::new();

    for iface in interfaces(&data) {
        if let Some(current) = iface.get("spairport_current_network_information") {
            if let Some(record) = transform(current) {
                networks.push(record);
            }
        }

        let others = iface
            .get("spairport_airport_other_local_wireless_networks")
            .and_then(Value::as_array);
        for net in others.into_iter().flatten() {
            if let Some(record) = transform(net) {
                networks.push(record);
            }
        }
    }

    Ok(networks)
}

/// Name of the network the host is associated with
pub fn current_network_name(output: &str) -> Option<String> {
    let data: Value = serde_json::from_str(output).ok()?;
    let found = interfaces(&data).find_map(|iface| {
        iface
            .get("spairport_current_network_information")
            .and_then(|c| c.get("_name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    });
    found
}

fn transform(net: &Value) -> Option<RawNetworkRecord> {
    let ssid = net.get("_name").and_then(Value::as_str)?;
    if ssid.is_empty() {
        return None;
    }

    // "5 (2GHz, 20MHz)" or a bare number
    let channel = match net.get("spairport_network_channel") {
        Some(Value::Number(n)) => n.as_u64().map(|c| c as u32),
        Some(Value::String(s)) => leading_u32(s),
        _ => None,
    }
    .unwrap_or(0);

    let rssi = net
        .get("spairport_signal_noise")
        .and_then(Value::as_str)
        .and_then(leading_i32)
        .unwrap_or(DEFAULT_RSSI);

    let bssid = net
        .get("spairport_network_bssid")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let security = net
        .get("spairport_security_mode")
        .and_then(Value::as_str)
        .unwrap_or("Open");

    Some(RawNetworkRecord {
        ssid: ssid.to_string(),
        bssid,
        rssi,
        channel,
        security: normalize_security(security, SecurityVocabulary::Profiler),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airscope_core::SecurityClass;

    const PROFILER_JSON: &str = r#"{
      "SPAirPortDataType": [{
        "spairport_airport_interfaces": [{
          "_name": "en0",
          "spairport_current_network_information": {
            "_name": "MyHomeWiFi",
            "spairport_network_channel": "5 (2GHz, 20MHz)",
            "spairport_security_mode": "spairport_security_mode_wpa2_wpa3_personal",
            "spairport_signal_noise": "-69 dBm / -97 dBm"
          },
          "spairport_airport_other_local_wireless_networks": [
            {
              "_name": "Neighbor_WiFi",
              "spairport_network_channel": 149,
              "spairport_security_mode": "spairport_security_mode_wpa2_personal",
              "spairport_signal_noise": "-59 dBm / -89 dBm",
              "spairport_network_bssid": "aa:bb:cc:dd:ee:ff"
            },
            { "spairport_network_channel": "1" },
            { "_name": "NoSignal", "spairport_network_channel": "11" }
          ]
        }]
      }]
    }"#;

    #[test]
    fn test_parse_profiler_json() {
        let networks = parse(PROFILER_JSON).unwrap();
        assert_eq!(networks.len(), 3);

        assert_eq!(networks[0].ssid, "MyHomeWiFi");
        assert_eq!(networks[0].channel, 5);
        assert_eq!(networks[0].rssi, -69);
        assert_eq!(networks[0].security, SecurityClass::Wpa3);
        assert_eq!(networks[0].bssid, "");

        assert_eq!(networks[1].channel, 149);
        assert_eq!(networks[1].bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(networks[1].security, SecurityClass::Wpa2);

        assert_eq!(networks[2].ssid, "NoSignal");
        assert_eq!(networks[2].rssi, DEFAULT_RSSI);
        assert_eq!(networks[2].security, SecurityClass::Open);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse("Wi-Fi:\n  Interfaces:\n").is_err());
    }

    #[test]
    fn test_missing_interfaces_is_empty() {
        assert!(parse(r#"{"SPAirPortDataType": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_current_network_name() {
        assert_eq!(
            current_network_name(PROFILER_JSON).as_deref(),
            Some("MyHomeWiFi")
        );
        assert_eq!(current_network_name("not json"), None);
    }
}
