//! Configuration loading

use airscope_core::VendorTable;
use airscope_discovery::{ProbeConfig, ScannerConfig, ThroughputConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub scanner: ScannerSection,
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub vendors: VendorsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for the HTTP service
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8470".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSection {
    /// Timeout for each scan or query command
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// Wireless interface for iwlist; detected when unset
    #[serde(default)]
    pub wireless_interface: Option<String>,
    #[serde(default = "default_airport_path")]
    pub airport_path: String,
    #[serde(default)]
    pub use_sudo_for_iwlist: bool,
}

impl Default for ScannerSection {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout(),
            wireless_interface: None,
            airport_path: default_airport_path(),
            use_sudo_for_iwlist: false,
        }
    }
}

fn default_command_timeout() -> u64 {
    20
}

fn default_airport_path() -> String {
    airscope_discovery::scanner::DEFAULT_AIRPORT_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSection {
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_arp_timeout")]
    pub arp_timeout_secs: u64,
    /// Speed-test host
    #[serde(default = "default_speed_server")]
    pub speed_server: String,
    #[serde(default = "default_download_bytes")]
    pub download_bytes: u64,
    #[serde(default = "default_upload_bytes")]
    pub upload_bytes: usize,
    #[serde(default = "default_latency_timeout")]
    pub latency_timeout_secs: u64,
    #[serde(default = "default_transfer_timeout")]
    pub transfer_timeout_secs: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            ping_count: default_ping_count(),
            ping_timeout_secs: default_ping_timeout(),
            arp_timeout_secs: default_arp_timeout(),
            speed_server: default_speed_server(),
            download_bytes: default_download_bytes(),
            upload_bytes: default_upload_bytes(),
            latency_timeout_secs: default_latency_timeout(),
            transfer_timeout_secs: default_transfer_timeout(),
        }
    }
}

fn default_ping_count() -> u32 {
    4
}

fn default_ping_timeout() -> u64 {
    15
}

fn default_arp_timeout() -> u64 {
    10
}

fn default_speed_server() -> String {
    "speed.cloudflare.com".to_string()
}

fn default_download_bytes() -> u64 {
    10_000_000
}

fn default_upload_bytes() -> usize {
    1_000_000
}

fn default_latency_timeout() -> u64 {
    5
}

fn default_transfer_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorsSection {
    /// Extra `"XX:XX:XX" = "Vendor"` entries merged into the built-in table
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Config {
    /// Convert to ScannerConfig
    pub fn to_scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            command_timeout_secs: self.scanner.command_timeout_secs,
            wireless_interface: self.scanner.wireless_interface.clone(),
            airport_path: self.scanner.airport_path.clone(),
            use_sudo_for_iwlist: self.scanner.use_sudo_for_iwlist,
        }
    }

    /// Convert to ProbeConfig
    pub fn to_probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            ping_count: self.probe.ping_count,
            ping_timeout_secs: self.probe.ping_timeout_secs,
            arp_timeout_secs: self.probe.arp_timeout_secs,
            throughput: ThroughputConfig {
                server: self.probe.speed_server.clone(),
                download_bytes: self.probe.download_bytes,
                upload_bytes: self.probe.upload_bytes,
                latency_timeout_secs: self.probe.latency_timeout_secs,
                transfer_timeout_secs: self.probe.transfer_timeout_secs,
            },
        }
    }

    /// Built-in vendor table extended with the configured entries
    pub fn vendor_table(&self) -> VendorTable {
        VendorTable::builtin().extended(
            self.vendors
                .extra
                .iter()
                .map(|(prefix, vendor)| (prefix.clone(), vendor.clone())),
        )
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("airscope.toml")).unwrap();
        assert_eq!(config.daemon.bind, "127.0.0.1:8470");
        assert_eq!(config.scanner.command_timeout_secs, 20);
        assert_eq!(config.probe.ping_count, 4);
        assert_eq!(config.probe.speed_server, "speed.cloudflare.com");
        assert!(config.vendors.extra.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[daemon]
bind = "0.0.0.0:9000"

[scanner]
wireless_interface = "wlp3s0"
use_sudo_for_iwlist = true

[probe]
ping_count = 2
download_bytes = 1000

[vendors.extra]
"AC:DE:48" = "Lab Gear"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.daemon.bind, "0.0.0.0:9000");

        let scanner = config.to_scanner_config();
        assert_eq!(scanner.wireless_interface.as_deref(), Some("wlp3s0"));
        assert!(scanner.use_sudo_for_iwlist);
        assert_eq!(scanner.command_timeout_secs, 20);

        let probe = config.to_probe_config();
        assert_eq!(probe.ping_count, 2);
        assert_eq!(probe.ping_timeout_secs, 15);
        assert_eq!(probe.throughput.download_bytes, 1000);
        assert_eq!(probe.throughput.upload_bytes, 1_000_000);

        let vendors = config.vendor_table();
        assert_eq!(vendors.lookup("ac:de:48:00:11:22"), "Lab Gear");
        assert_eq!(vendors.lookup("00:03:93:00:00:01"), "Apple");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe]\nping_count = \"four\"").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
