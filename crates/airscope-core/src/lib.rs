//! Airscope Core - Value types and lookup tables
//!
//! This crate provides the foundational types for the Airscope system:
//! - Finished network, neighbor and measurement records
//! - Security-protocol normalization into a fixed set of classes
//! - Channel to frequency to band mapping
//! - Static MAC prefix to vendor lookup

pub mod channel;
pub mod mac;
pub mod measurement;
pub mod network;
pub mod security;
pub mod vendor;

pub use channel::{band_for_frequency, channel_to_frequency, Band};
pub use mac::{canonicalize_mac, ZERO_MAC};
pub use measurement::{NeighborRecord, ProbeResult, SystemInfo, ThroughputResult};
pub use network::{signal_quality, NetworkRecord, SignalStrength};
pub use security::{normalize_security, SecurityClass, SecurityVocabulary};
pub use vendor::{VendorTable, UNKNOWN_VENDOR};
