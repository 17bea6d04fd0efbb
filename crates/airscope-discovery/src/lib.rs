//! Airscope Discovery - Wireless network discovery and probing
//!
//! This crate turns the text output of platform diagnostic tools into
//! uniform records:
//! - Per-platform parsers for scan and neighbor-table output
//! - Enrichment (frequency, band, vendor, connected flag, deduplication)
//! - A scanner that walks an ordered list of sources with fallback
//! - Latency probing, neighbor discovery and throughput sampling
//!
//! Every public operation is best-effort: failures are logged and turned
//! into empty or zeroed results instead of errors.

pub mod arp;
pub mod command;
pub mod enrich;
pub mod parsers;
pub mod platform;
pub mod probe;
pub mod scanner;
pub mod throughput;

pub use arp::{discover_neighbors, NeighborFormat};
pub use command::{CommandError, CommandRunner, SystemCommandRunner};
pub use parsers::{RawNetworkRecord, ScanFormat};
pub use platform::{system_info, Platform};
pub use probe::{parse_ping_summary, NetworkProbe, PingSummary, ProbeConfig};
pub use scanner::{ScanError, ScanSource, ScannerConfig, WifiScanner};
pub use throughput::{
    measure_throughput, rate_mbps, HttpTransport, ThroughputConfig, Transport, TransportError,
};
