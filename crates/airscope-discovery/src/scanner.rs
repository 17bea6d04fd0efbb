//! Wireless scanner that walks the platform's scan sources in order

use airscope_core::{NetworkRecord, VendorTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{args, CommandError, CommandRunner};
use crate::enrich::enrich_all;
use crate::parsers::{netsh, nmcli, profiler, profiler_json, ParseError, RawNetworkRecord, ScanFormat};
use crate::platform::Platform;

/// Location of the deprecated macOS airport utility
pub const DEFAULT_AIRPORT_PATH: &str =
    "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport";

/// Interface name used when none is configured or detected
const FALLBACK_INTERFACE: &str = "wlan0";

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Timeout applied to every scan or query command
    pub command_timeout_secs: u64,
    /// Wireless interface for iwlist (auto-detected when unset)
    pub wireless_interface: Option<String>,
    /// Path of the macOS airport utility
    pub airport_path: String,
    /// Run iwlist through sudo
    pub use_sudo_for_iwlist: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 20,
            wireless_interface: None,
            airport_path: DEFAULT_AIRPORT_PATH.to_string(),
            use_sudo_for_iwlist: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Malformed(#[from] ParseError),
    #[error("No wireless scan source for platform {0}")]
    Unsupported(Platform),
}

/// One candidate scan command and the format of its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSource {
    pub format: ScanFormat,
    pub program: String,
    pub args: Vec<String>,
}

impl ScanSource {
    fn new(format: ScanFormat, program: &str, arguments: &[&str]) -> Self {
        Self {
            format,
            program: program.to_string(),
            args: args(arguments),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A query for the currently associated network
struct ConnectedQuery {
    program: &'static str,
    args: &'static [&'static str],
    extract: fn(&str) -> Option<String>,
}

fn iwgetid_name(output: &str) -> Option<String> {
    Some(output.trim().to_string()).filter(|name| !name.is_empty())
}

const MACOS_CONNECTED: &[ConnectedQuery] = &[
    ConnectedQuery {
        program: "system_profiler",
        args: &["SPAirPortDataType", "-json"],
        extract: profiler_json::current_network_name,
    },
    ConnectedQuery {
        program: "system_profiler",
        args: &["SPAirPortDataType"],
        extract: profiler::current_network_name,
    },
];

const LINUX_CONNECTED: &[ConnectedQuery] = &[
    ConnectedQuery {
        program: "nmcli",
        args: &["-t", "-f", "active,ssid", "device", "wifi", "list"],
        extract: nmcli::current_network_name,
    },
    ConnectedQuery {
        program: "iwgetid",
        args: &["-r"],
        extract: iwgetid_name,
    },
];

const WINDOWS_CONNECTED: &[ConnectedQuery] = &[ConnectedQuery {
    program: "netsh",
    args: &["wlan", "show", "interfaces"],
    extract: netsh::current_network_name,
}];

/// Find the first wireless interface (`wl*`) known to the system
fn detect_wireless_interface() -> Option<String> {
    use network_interface::{NetworkInterface, NetworkInterfaceConfig};

    match NetworkInterface::show() {
        Ok(interfaces) => interfaces
            .into_iter()
            .map(|iface| iface.name)
            .find(|name| name.starts_with("wl")),
        Err(e) => {
            debug!(error = %e, "Failed to list network interfaces");
            None
        }
    }
}

/// Wireless network scanner
///
/// Holds no state between calls; concurrent scans are the caller's concern.
pub struct WifiScanner {
    runner: Arc<dyn CommandRunner>,
    vendors: Arc<VendorTable>,
    config: ScannerConfig,
    platform: Platform,
    /// Resolved once at construction; interface listing blocks
    interface: String,
}

impl WifiScanner {
    /// Create a scanner for the platform this binary runs on
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        vendors: Arc<VendorTable>,
        config: ScannerConfig,
    ) -> Self {
        let interface = config
            .wireless_interface
            .clone()
            .or_else(detect_wireless_interface)
            .unwrap_or_else(|| FALLBACK_INTERFACE.to_string());
        debug!(interface = %interface, "Wireless interface selected");

        Self {
            runner,
            vendors,
            config,
            platform: Platform::current(),
            interface,
        }
    }

    /// Override the platform used to pick sources
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_secs)
    }

    /// Interface handed to iwlist
    pub fn wireless_interface(&self) -> &str {
        &self.interface
    }

    /// Candidate scan sources for this platform, most preferred first
    pub fn sources(&self) -> Vec<ScanSource> {
        match self.platform {
            Platform::MacOs => vec![
                ScanSource::new(
                    ScanFormat::ProfilerJson,
                    "system_profiler",
                    &["SPAirPortDataType", "-json"],
                ),
                ScanSource::new(ScanFormat::ProfilerText, "system_profiler", &["SPAirPortDataType"]),
                ScanSource::new(ScanFormat::Airport, &self.config.airport_path, &["-s"]),
            ],
            Platform::Linux => {
                let iface = self.wireless_interface();
                let iwlist = if self.config.use_sudo_for_iwlist {
                    ScanSource::new(ScanFormat::Iwlist, "sudo", &["iwlist", iface, "scan"])
                } else {
                    ScanSource::new(ScanFormat::Iwlist, "iwlist", &[iface, "scan"])
                };
                vec![
                    ScanSource::new(
                        ScanFormat::Nmcli,
                        "nmcli",
                        &["-t", "-f", "SSID,BSSID,SIGNAL,CHAN,SECURITY", "device", "wifi", "list"],
                    ),
                    iwlist,
                ]
            }
            Platform::Windows => vec![ScanSource::new(
                ScanFormat::Netsh,
                "netsh",
                &["wlan", "show", "networks", "mode=Bssid"],
            )],
            Platform::Unsupported => Vec::new(),
        }
    }

    fn connected_queries(&self) -> &'static [ConnectedQuery] {
        match self.platform {
            Platform::MacOs => MACOS_CONNECTED,
            Platform::Linux => LINUX_CONNECTED,
            Platform::Windows => WINDOWS_CONNECTED,
            Platform::Unsupported => &[],
        }
    }

    async fn run_source(&self, source: &ScanSource) -> Result<Vec<RawNetworkRecord>, ScanError> {
        let output = self
            .runner
            .run(&source.program, &source.args, self.timeout())
            .await?;
        Ok(source.format.parse(&output)?)
    }

    /// Run sources front to back until one succeeds
    ///
    /// Returns the winning format with its records, or the last failure.
    pub async fn scan_raw(&self) -> Result<(ScanFormat, Vec<RawNetworkRecord>), ScanError> {
        let mut last_error = ScanError::Unsupported(self.platform);

        for source in self.sources() {
            match self.run_source(&source).await {
                Ok(records) => {
                    debug!(source = %source.format, count = records.len(), "Scan source succeeded");
                    return Ok((source.format, records));
                }
                Err(e) => {
                    warn!(source = %source.format, command = %source.command_line(), error = %e, "Scan source failed, trying next");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Name of the currently associated network, if it can be determined
    pub async fn connected_identifier(&self) -> Option<String> {
        for query in self.connected_queries() {
            match self
                .runner
                .run(query.program, &args(query.args), self.timeout())
                .await
            {
                Ok(output) => {
                    if let Some(name) = (query.extract)(&output) {
                        return Some(name);
                    }
                }
                Err(e) => debug!(program = query.program, error = %e, "Connected network query failed"),
            }
        }
        None
    }

    /// Scan for nearby networks
    ///
    /// Never fails: when every source fails the result is empty.
    pub async fn scan(&self) -> Vec<NetworkRecord> {
        let (format, raw) = match self.scan_raw().await {
            Ok(found) => found,
            Err(e) => {
                warn!(platform = %self.platform, error = %e, "Wireless scan failed");
                return Vec::new();
            }
        };

        let current = self.connected_identifier().await;
        let records = enrich_all(raw, &self.vendors, format.needs_dedup(), current.as_deref());
        info!(count = records.len(), source = %format, "Wireless scan complete");
        records
    }

    /// The associated network as it appears in a fresh scan
    pub async fn current_network(&self) -> Option<NetworkRecord> {
        self.scan().await.into_iter().find(|n| n.is_connected)
    }
}
