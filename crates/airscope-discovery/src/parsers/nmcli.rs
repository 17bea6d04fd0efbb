//! NetworkManager `nmcli -t -f SSID,BSSID,SIGNAL,CHAN,SECURITY device wifi list`
//!
//! Terse mode prints one network per line with `:` between fields and
//! escapes literal colons inside values as `\:`. Output captured without
//! that escaping has the BSSID spread over six fields, which is detected
//! and reassembled.

use airscope_core::{normalize_security, SecurityVocabulary};
use tracing::trace;

use super::{percent_to_dbm, RawNetworkRecord};

/// Split a terse line on unescaped colons, unescaping `\:` and `\\`
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn is_octet(field: &str) -> bool {
    field.len() == 2 && field.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse(output: &str) -> Vec<RawNetworkRecord> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let record = parse_line(line);
            if record.is_none() {
                trace!(line = %line, "Skipping malformed nmcli line");
            }
            record
        })
        .collect()
}

fn parse_line(line: &str) -> Option<RawNetworkRecord> {
    let fields = split_terse(line.trim_end_matches('\r'));

    let (ssid, bssid, rest) = if fields.len() >= 10 && fields[1..7].iter().all(|f| is_octet(f)) {
        (&fields[0], fields[1..7].join(":"), &fields[7..])
    } else if fields.len() >= 5 {
        (&fields[0], fields[1].clone(), &fields[2..])
    } else {
        return None;
    };

    let percent: u32 = rest[0].trim().parse().ok()?;
    let channel: u32 = rest[1].trim().parse().ok()?;
    let security = rest[2..].join(":");

    Some(RawNetworkRecord {
        ssid: ssid.clone(),
        bssid: bssid.to_uppercase(),
        rssi: percent_to_dbm(percent),
        channel,
        security: normalize_security(&security, SecurityVocabulary::Nmcli),
    })
}

/// SSID of the active network from `nmcli -t -f active,ssid device wifi list`
pub fn current_network_name(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.starts_with("yes:"))
        .map(split_terse)
        .and_then(|fields| fields.get(1).cloned())
        .map(|ssid| ssid.trim_end_matches('\r').to_string())
        .filter(|ssid| !ssid.is_empty())
}
