//! Neighbor and connectivity measurement records

use serde::{Deserialize, Serialize};

/// A device found in the local neighbor (ARP) table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRecord {
    /// IPv4 address as reported by the tool
    pub ip: String,
    /// Hardware address, canonical uppercase colon-hex
    pub mac: String,
    /// Hostname, when the tool reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Vendor resolved from the MAC prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

/// Result of a latency probe against one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub host: String,
    /// Average round-trip time in milliseconds
    pub latency: u32,
    pub success: bool,
    /// Packet loss, 0-100
    pub packet_loss: f64,
}

impl ProbeResult {
    /// Result reported when the probe could not be carried out at all
    pub fn failed(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            latency: 0,
            success: false,
            packet_loss: 100.0,
        }
    }
}

/// Result of a throughput sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputResult {
    /// Download rate in Mbit/s
    pub download: f64,
    /// Upload rate in Mbit/s
    pub upload: f64,
    /// Latency to the probe server in milliseconds
    pub ping: u32,
    /// Probe server identifier
    pub server: String,
}

impl ThroughputResult {
    pub fn failed(server: &str) -> Self {
        Self {
            download: 0.0,
            upload: 0.0,
            ping: 0,
            server: format!("{} (failed)", server),
        }
    }
}

/// Host platform description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub platform: String,
    pub arch: String,
    pub hostname: String,
}
