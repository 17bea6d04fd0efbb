//! Static MAC prefix to vendor lookup
//!
//! Lookup is an exact match on the first three octets. Longer MA-M/MA-S
//! assignments are not modelled.

use std::collections::HashMap;
use tracing::debug;

use crate::mac::canonicalize_mac;

/// Vendor name returned when a prefix is not in the table
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Built-in prefix table, `XX:XX:XX` -> vendor
const BUILTIN_PREFIXES: &[(&str, &str)] = &[
    ("00:03:93", "Apple"),
    ("00:0A:27", "Apple"),
    ("00:0A:95", "Apple"),
    ("00:0D:93", "Apple"),
    ("00:11:24", "Apple"),
    ("00:14:51", "Apple"),
    ("00:16:CB", "Apple"),
    ("00:17:F2", "Apple"),
    ("00:19:E3", "Apple"),
    ("00:1B:63", "Apple"),
    ("00:1C:B3", "Apple"),
    ("00:1D:4F", "Apple"),
    ("00:1E:52", "Apple"),
    ("00:1F:5B", "Apple"),
    ("00:1F:F3", "Apple"),
    ("00:21:E9", "Apple"),
    ("00:22:41", "Apple"),
    ("00:23:12", "Apple"),
    ("00:23:32", "Apple"),
    ("00:23:6C", "Apple"),
    ("00:23:DF", "Apple"),
    ("00:24:36", "Apple"),
    ("00:25:00", "Apple"),
    ("00:25:BC", "Apple"),
    ("00:26:08", "Apple"),
    ("00:26:4A", "Apple"),
    ("00:26:B0", "Apple"),
    ("00:26:BB", "Apple"),
    ("A4:83:E7", "Apple"),
    ("AC:BC:32", "Apple"),
    ("B8:17:C2", "Apple"),
    ("C8:69:CD", "Apple"),
    ("00:00:F0", "Samsung"),
    ("00:02:78", "Samsung"),
    ("00:09:18", "Samsung"),
    ("00:0D:AE", "Samsung"),
    ("00:12:47", "Samsung"),
    ("00:12:FB", "Samsung"),
    ("00:13:77", "Samsung"),
    ("00:15:99", "Samsung"),
    ("00:16:32", "Samsung"),
    ("00:16:6B", "Samsung"),
    ("00:16:6C", "Samsung"),
    ("00:17:C9", "Samsung"),
    ("00:17:D5", "Samsung"),
    ("00:18:AF", "Samsung"),
    ("00:00:0C", "Cisco"),
    ("00:01:42", "Cisco"),
    ("00:01:43", "Cisco"),
    ("00:01:63", "Cisco"),
    ("00:01:64", "Cisco"),
    ("00:01:96", "Cisco"),
    ("00:01:97", "Cisco"),
    ("00:01:C7", "Cisco"),
    ("00:01:C9", "Cisco"),
    ("00:14:78", "TP-Link"),
    ("00:1D:0F", "TP-Link"),
    ("00:21:27", "TP-Link"),
    ("00:23:CD", "TP-Link"),
    ("00:25:86", "TP-Link"),
    ("00:27:19", "TP-Link"),
    ("10:FE:ED", "TP-Link"),
    ("14:CC:20", "TP-Link"),
    ("14:CF:92", "TP-Link"),
    ("00:09:5B", "Netgear"),
    ("00:0F:B5", "Netgear"),
    ("00:14:6C", "Netgear"),
    ("00:18:4D", "Netgear"),
    ("00:1B:2F", "Netgear"),
    ("00:1E:2A", "Netgear"),
    ("00:1F:33", "Netgear"),
    ("00:22:3F", "Netgear"),
    ("00:24:B2", "Netgear"),
    ("00:26:F2", "Netgear"),
    ("00:05:5D", "D-Link"),
    ("00:0D:88", "D-Link"),
    ("00:0F:3D", "D-Link"),
    ("00:11:95", "D-Link"),
    ("00:13:46", "D-Link"),
    ("00:15:E9", "D-Link"),
    ("00:17:9A", "D-Link"),
    ("00:18:E7", "D-Link"),
    ("00:19:5B", "D-Link"),
    ("00:1B:11", "D-Link"),
    ("00:1C:F0", "D-Link"),
    ("00:1E:58", "D-Link"),
    ("00:0C:6E", "ASUS"),
    ("00:0E:A6", "ASUS"),
    ("00:11:2F", "ASUS"),
    ("00:11:D8", "ASUS"),
    ("00:13:D4", "ASUS"),
    ("00:15:F2", "ASUS"),
    ("00:17:31", "ASUS"),
    ("00:18:F3", "ASUS"),
    ("00:1A:92", "ASUS"),
    ("00:1B:FC", "ASUS"),
    ("00:1D:60", "ASUS"),
    ("00:1E:8C", "ASUS"),
    ("00:1F:C6", "ASUS"),
    ("00:22:15", "ASUS"),
    ("00:23:54", "ASUS"),
    ("00:24:8C", "ASUS"),
    ("00:25:22", "ASUS"),
    ("00:26:18", "ASUS"),
    ("00:06:25", "Linksys"),
    ("00:0C:41", "Linksys"),
    ("00:0F:66", "Linksys"),
    ("00:12:17", "Linksys"),
    ("00:13:10", "Linksys"),
    ("00:14:BF", "Linksys"),
    ("00:16:B6", "Linksys"),
    ("00:18:39", "Linksys"),
    ("00:18:F8", "Linksys"),
    ("00:1A:70", "Linksys"),
    ("00:1C:10", "Linksys"),
    ("00:1D:7E", "Linksys"),
    ("00:1E:E5", "Linksys"),
    ("00:21:29", "Linksys"),
    ("00:22:6B", "Linksys"),
    ("00:23:69", "Linksys"),
    ("00:25:9C", "Linksys"),
    ("00:02:B3", "Intel"),
    ("00:03:47", "Intel"),
    ("00:04:23", "Intel"),
    ("00:07:E9", "Intel"),
    ("00:0C:F1", "Intel"),
    ("00:0E:0C", "Intel"),
    ("00:0E:35", "Intel"),
    ("00:11:11", "Intel"),
    ("00:12:F0", "Intel"),
    ("00:13:02", "Intel"),
    ("00:13:20", "Intel"),
    ("00:13:CE", "Intel"),
    ("00:13:E8", "Intel"),
    ("00:15:00", "Intel"),
    ("00:15:17", "Intel"),
    ("00:03:FF", "Microsoft"),
    ("00:0D:3A", "Microsoft"),
    ("00:12:5A", "Microsoft"),
    ("00:15:5D", "Microsoft"),
    ("00:17:FA", "Microsoft"),
    ("00:1D:D8", "Microsoft"),
    ("00:22:48", "Microsoft"),
    ("00:25:AE", "Microsoft"),
    ("00:50:F2", "Microsoft"),
    ("00:1A:11", "Google"),
    ("3C:5A:B4", "Google"),
    ("54:60:09", "Google"),
    ("94:EB:2C", "Google"),
    ("F4:F5:D8", "Google"),
    ("F4:F5:E8", "Google"),
    ("00:18:82", "Huawei"),
    ("00:1E:10", "Huawei"),
    ("00:22:A1", "Huawei"),
    ("00:25:68", "Huawei"),
    ("00:25:9E", "Huawei"),
    ("00:25:9F", "Huawei"),
    ("00:46:4B", "Huawei"),
    ("00:66:4B", "Huawei"),
    ("00:9A:CD", "Huawei"),
    ("00:E0:FC", "Huawei"),
    ("00:11:32", "Synology"),
];

/// Immutable MAC prefix to vendor table
#[derive(Debug, Clone)]
pub struct VendorTable {
    prefixes: HashMap<String, String>,
}

impl VendorTable {
    /// Table backed by the built-in prefix list
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_PREFIXES
                .iter()
                .map(|(prefix, vendor)| (prefix.to_string(), vendor.to_string())),
        )
    }

    /// Build a table from `(prefix, vendor)` pairs
    ///
    /// Prefixes are normalized to uppercase `XX:XX:XX`; malformed prefixes
    /// are dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut prefixes = HashMap::new();
        for (prefix, vendor) in entries {
            match normalize_prefix(&prefix) {
                Some(key) => {
                    prefixes.insert(key, vendor);
                }
                None => debug!(prefix = %prefix, "Ignoring malformed vendor prefix"),
            }
        }
        Self { prefixes }
    }

    /// Consume the table and return a new one with extra entries layered on top
    pub fn extended<I>(self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut prefixes = self.prefixes;
        prefixes.extend(Self::from_entries(extra).prefixes);
        Self { prefixes }
    }

    /// Resolve the vendor for a hardware address, or [`UNKNOWN_VENDOR`]
    pub fn lookup(&self, mac: &str) -> &str {
        oui_prefix(mac)
            .and_then(|prefix| self.prefixes.get(&prefix))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VENDOR)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for VendorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// First three octets of a hardware address as uppercase `XX:XX:XX`
fn oui_prefix(mac: &str) -> Option<String> {
    let canonical = canonicalize_mac(mac)?;
    Some(canonical[..8].to_string())
}

fn normalize_prefix(prefix: &str) -> Option<String> {
    let hex: String = prefix
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_uppercase();
    if hex.len() != 6 || prefix.chars().any(|c| !c.is_ascii_hexdigit() && c != ':' && c != '-') {
        return None;
    }
    Some(format!("{}:{}:{}", &hex[0..2], &hex[2..4], &hex[4..6]))
}
