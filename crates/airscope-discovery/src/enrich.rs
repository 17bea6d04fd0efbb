//! Raw record enrichment: frequency, band, vendor, connected flag

use airscope_core::{
    band_for_frequency, canonicalize_mac, channel_to_frequency, NetworkRecord, VendorTable,
    ZERO_MAC,
};
use std::collections::HashMap;
use tracing::trace;

use crate::parsers::RawNetworkRecord;

/// Turn one raw record into a finished record (not yet correlated)
pub fn enrich(raw: RawNetworkRecord, vendors: &VendorTable) -> NetworkRecord {
    let bssid = canonicalize_mac(&raw.bssid).unwrap_or_else(|| ZERO_MAC.to_string());
    let frequency = channel_to_frequency(raw.channel);

    NetworkRecord {
        vendor: vendors.lookup(&bssid).to_string(),
        ssid: raw.ssid,
        bssid,
        rssi: raw.rssi,
        channel: raw.channel,
        frequency,
        band: band_for_frequency(frequency),
        security: raw.security,
        is_connected: false,
    }
}

/// Keep one record per network name, the one with the strongest signal
///
/// Order of first appearance is preserved.
pub fn dedupe_by_ssid(raw: Vec<RawNetworkRecord>) -> Vec<RawNetworkRecord> {
    let mut unique: Vec<RawNetworkRecord> = Vec::with_capacity(raw.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in raw {
        match index.get(&record.ssid) {
            Some(&i) => {
                if unique[i].rssi < record.rssi {
                    trace!(ssid = %record.ssid, rssi = record.rssi, "Replacing weaker duplicate");
                    unique[i] = record;
                }
            }
            None => {
                index.insert(record.ssid.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

/// Flag every record whose name or station address equals `current`
///
/// Repeated SSIDs across access points can flag more than one record.
pub fn mark_connected(records: &mut [NetworkRecord], current: Option<&str>) {
    let Some(current) = current.map(str::trim).filter(|c| !c.is_empty()) else {
        return;
    };
    let current_mac = canonicalize_mac(current);

    for record in records.iter_mut() {
        if record.ssid == current || current_mac.as_deref() == Some(record.bssid.as_str()) {
            record.is_connected = true;
        }
    }
}

/// Full pipeline for one scan: optional dedup, enrichment, correlation
pub fn enrich_all(
    raw: Vec<RawNetworkRecord>,
    vendors: &VendorTable,
    dedupe: bool,
    current: Option<&str>,
) -> Vec<NetworkRecord> {
    let raw = if dedupe { dedupe_by_ssid(raw) } else { raw };
    let mut records: Vec<NetworkRecord> = raw.into_iter().map(|r| enrich(r, vendors)).collect();
    mark_connected(&mut records, current);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use airscope_core::{Band, SecurityClass, UNKNOWN_VENDOR};

    fn raw(ssid: &str, bssid: &str, rssi: i32, channel: u32) -> RawNetworkRecord {
        RawNetworkRecord {
            ssid: ssid.to_string(),
            bssid: bssid.to_string(),
            rssi,
            channel,
            security: SecurityClass::Wpa2,
        }
    }

    #[test]
    fn test_enrich_derives_fields() {
        let vendors = VendorTable::builtin();
        let record = enrich(raw("Home", "00:03:93:aa:bb:cc", -50, 36), &vendors);
        assert_eq!(record.bssid, "00:03:93:AA:BB:CC");
        assert_eq!(record.frequency, 5180);
        assert_eq!(record.band, Band::Ghz5);
        assert_eq!(record.vendor, "Apple");
        assert!(!record.is_connected);
    }

    #[test]
    fn test_missing_bssid_is_zero() {
        let vendors = VendorTable::builtin();
        let record = enrich(raw("Home", "", -50, 200), &vendors);
        assert_eq!(record.bssid, ZERO_MAC);
        assert_eq!(record.vendor, UNKNOWN_VENDOR);
        assert_eq!(record.frequency, 0);
        assert_eq!(record.band, Band::Ghz2_4);
    }

    #[test]
    fn test_dedupe_keeps_strongest() {
        let deduped = dedupe_by_ssid(vec![
            raw("Home", "", -69, 5),
            raw("Other", "", -80, 1),
            raw("Home", "", -59, 5),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].ssid, "Home");
        assert_eq!(deduped[0].rssi, -59);
        assert_eq!(deduped[1].ssid, "Other");
    }

    #[test]
    fn test_dedupe_keeps_first_on_tie() {
        let deduped = dedupe_by_ssid(vec![
            raw("Home", "00:00:00:00:00:01", -60, 5),
            raw("Home", "00:00:00:00:00:02", -60, 5),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].bssid, "00:00:00:00:00:01");
    }

    #[test]
    fn test_mark_connected_by_name_or_address() {
        let vendors = VendorTable::builtin();
        let mut records = enrich_all(
            vec![
                raw("Home", "aa:bb:cc:dd:ee:01", -50, 1),
                raw("Other", "aa:bb:cc:dd:ee:02", -60, 6),
            ],
            &vendors,
            false,
            Some("Home"),
        );
        assert!(records[0].is_connected);
        assert!(!records[1].is_connected);

        mark_connected(&mut records, Some("aa:bb:cc:dd:ee:02"));
        assert!(records[1].is_connected);
    }

    #[test]
    fn test_unknown_current_flags_nothing() {
        let vendors = VendorTable::builtin();
        let records = enrich_all(vec![raw("", "", -50, 1)], &vendors, false, Some(""));
        assert!(!records[0].is_connected);
        let records = enrich_all(vec![raw("Home", "", -50, 1)], &vendors, false, None);
        assert!(!records[0].is_connected);
    }

    #[test]
    fn test_enrich_all_dedupes_when_asked() {
        let vendors = VendorTable::builtin();
        let input = vec![raw("Home", "", -69, 5), raw("Home", "", -59, 5)];
        assert_eq!(enrich_all(input.clone(), &vendors, true, None).len(), 1);
        assert_eq!(enrich_all(input, &vendors, false, None).len(), 2);
    }
}
