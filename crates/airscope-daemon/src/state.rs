//! Application state management

use airscope_core::{NetworkRecord, SystemInfo};
use airscope_discovery::{
    system_info, CommandRunner, HttpTransport, NetworkProbe, SystemCommandRunner, WifiScanner,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::config::Config;

/// Result of one wireless scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub networks: Vec<NetworkRecord>,
    /// When the scan finished; `None` if no scan has completed yet
    pub scanned_at: Option<DateTime<Utc>>,
    /// Set when another scan was running and this is the previous result
    pub in_progress: bool,
}

/// Shared application state
pub struct AppState {
    /// Wireless scanner
    pub scanner: Arc<WifiScanner>,
    /// Latency, throughput and neighbor probes
    pub probe: Arc<NetworkProbe>,
    /// Process boundary shared by scanner and probe
    pub runner: Arc<dyn CommandRunner>,
    /// Configuration
    pub config: Config,
    /// Held while a scan runs
    scan_gate: Mutex<()>,
    last_scan: RwLock<Option<ScanSnapshot>>,
}

impl AppState {
    /// Create new application state backed by real processes and HTTP
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
        let transport = Arc::new(HttpTransport::new()?);

        let vendors = Arc::new(config.vendor_table());
        info!(prefixes = vendors.len(), "Vendor table ready");

        let scanner = WifiScanner::new(runner.clone(), vendors.clone(), config.to_scanner_config());
        let probe = NetworkProbe::new(runner.clone(), transport, vendors, config.to_probe_config());
        info!(platform = %scanner.platform(), "Discovery engine ready");

        Ok(Self::from_parts(config, scanner, probe, runner))
    }

    /// Assemble state from already constructed services
    pub fn from_parts(
        config: Config,
        scanner: WifiScanner,
        probe: NetworkProbe,
        runner: Arc<dyn CommandRunner>,
    ) -> Arc<Self> {
        Arc::new(Self {
            scanner: Arc::new(scanner),
            probe: Arc::new(probe),
            runner,
            config,
            scan_gate: Mutex::new(()),
            last_scan: RwLock::new(None),
        })
    }

    /// Scan, unless a scan is already running
    ///
    /// Overlapping requests get the last completed snapshot with
    /// `in_progress` set instead of starting a second scan.
    pub async fn scan(&self) -> ScanSnapshot {
        let Ok(_guard) = self.scan_gate.try_lock() else {
            debug!("Scan already in progress, returning last snapshot");
            let last = self.last_scan.read().await.clone();
            return match last {
                Some(snapshot) => ScanSnapshot {
                    in_progress: true,
                    ..snapshot
                },
                None => ScanSnapshot {
                    networks: Vec::new(),
                    scanned_at: None,
                    in_progress: true,
                },
            };
        };

        let networks = self.scanner.scan().await;
        let snapshot = ScanSnapshot {
            networks,
            scanned_at: Some(Utc::now()),
            in_progress: false,
        };
        *self.last_scan.write().await = Some(snapshot.clone());
        snapshot
    }

    /// The network flagged connected in a (possibly cached) scan
    pub async fn connected_network(&self) -> Option<NetworkRecord> {
        self.scan().await.networks.into_iter().find(|n| n.is_connected)
    }

    pub async fn system_info(&self) -> SystemInfo {
        system_info(self.runner.as_ref()).await
    }
}
