//! Finished wireless network records

use serde::{Deserialize, Serialize};

use crate::channel::Band;
use crate::security::SecurityClass;

/// A wireless network as seen in one scan cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    /// Network name (SSID), empty for hidden networks
    pub ssid: String,
    /// Station address (BSSID), canonical uppercase colon-hex
    pub bssid: String,
    /// Signal level in dBm
    pub rssi: i32,
    /// Channel number
    pub channel: u32,
    /// Center frequency in MHz derived from the channel (0 if unmapped)
    pub frequency: u32,
    /// Band derived from the frequency
    pub band: Band,
    /// Normalized security class
    pub security: SecurityClass,
    /// Vendor resolved from the BSSID prefix
    pub vendor: String,
    /// Whether this is the network the host is currently associated with
    #[serde(default)]
    pub is_connected: bool,
}

impl NetworkRecord {
    /// Signal quality as a 0-100 percentage
    pub fn quality(&self) -> u8 {
        signal_quality(self.rssi)
    }

    /// Coarse signal strength label
    pub fn strength(&self) -> SignalStrength {
        SignalStrength::from_rssi(self.rssi)
    }
}

/// Coarse signal strength label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Excellent,
    Good,
    Fair,
    Weak,
    Poor,
}

impl SignalStrength {
    pub fn from_rssi(rssi: i32) -> Self {
        match rssi {
            r if r >= -50 => Self::Excellent,
            r if r >= -60 => Self::Good,
            r if r >= -70 => Self::Fair,
            r if r >= -80 => Self::Weak,
            _ => Self::Poor,
        }
    }
}

/// Map RSSI onto 0-100%, -30 dBm and above being full strength
pub fn signal_quality(rssi: i32) -> u8 {
    if rssi >= -30 {
        return 100;
    }
    if rssi <= -100 {
        return 0;
    }
    ((rssi + 100) as f64 / 70.0 * 100.0).round() as u8
}
