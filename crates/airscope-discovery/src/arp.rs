//! Neighbor (ARP) table discovery

use airscope_core::{canonicalize_mac, NeighborRecord, VendorTable};
use regex::Regex;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::command::{args, CommandRunner};
use crate::platform::Platform;

/// `host (192.168.1.1) at 0:1a:2b:3:4:5 on en0 ifscope [ethernet]`
static BSD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\S+)\s+\((\d{1,3}(?:\.\d{1,3}){3})\)\s+at\s+([0-9A-Fa-f]{1,2}(?::[0-9A-Fa-f]{1,2}){5})\b",
    )
    .expect("valid pattern")
});

/// `  192.168.1.1           aa-bb-cc-dd-ee-ff     dynamic`
static WINDOWS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3}(?:\.\d{1,3}){3})\s+([0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5})\b")
        .expect("valid pattern")
});

const ARP_ARGS: &[&str] = &["-a"];
const IP_NEIGH_ARGS: &[&str] = &["neigh", "show"];

/// One neighbor table entry before vendor resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborEntry {
    pub ip: Ipv4Addr,
    /// Canonical uppercase colon-hex
    pub mac: String,
    pub hostname: Option<String>,
}

/// Output format of the platform's neighbor table command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborFormat {
    /// macOS / BSD `arp -a`
    Bsd,
    /// Windows `arp -a`
    Windows,
    /// Linux `ip neigh show`
    IpNeigh,
}

impl NeighborFormat {
    /// Format and command used on `platform`
    pub fn for_platform(platform: Platform) -> Option<(Self, &'static str, &'static [&'static str])> {
        match platform {
            Platform::MacOs => Some((Self::Bsd, "arp", ARP_ARGS)),
            Platform::Windows => Some((Self::Windows, "arp", ARP_ARGS)),
            Platform::Linux => Some((Self::IpNeigh, "ip", IP_NEIGH_ARGS)),
            Platform::Unsupported => None,
        }
    }

    pub fn parse(&self, output: &str) -> Vec<NeighborEntry> {
        let parse_line: fn(&str) -> Option<NeighborEntry> = match self {
            Self::Bsd => parse_bsd_line,
            Self::Windows => parse_windows_line,
            Self::IpNeigh => parse_ip_neigh_line,
        };
        output.lines().filter_map(parse_line).collect()
    }
}

fn parse_bsd_line(line: &str) -> Option<NeighborEntry> {
    let caps = BSD_LINE_RE.captures(line)?;
    let hostname = Some(caps[1].to_string()).filter(|h| h != "?");
    Some(NeighborEntry {
        ip: Ipv4Addr::from_str(&caps[2]).ok()?,
        mac: canonicalize_mac(&caps[3])?,
        hostname,
    })
}

fn parse_windows_line(line: &str) -> Option<NeighborEntry> {
    let caps = WINDOWS_LINE_RE.captures(line)?;
    Some(NeighborEntry {
        ip: Ipv4Addr::from_str(&caps[1]).ok()?,
        mac: canonicalize_mac(&caps[2])?,
        hostname: None,
    })
}

/// Parse a line from `ip neigh show` output
fn parse_ip_neigh_line(line: &str) -> Option<NeighborEntry> {
    // Format: "192.168.1.1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE"
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() < 4 {
        return None;
    }

    // IPv6 neighbors fail here
    let ip = Ipv4Addr::from_str(parts[0]).ok()?;

    // INCOMPLETE and FAILED entries carry no lladdr
    let lladdr_idx = parts.iter().position(|&p| p == "lladdr")?;
    let mac = canonicalize_mac(parts.get(lladdr_idx + 1)?)?;

    Some(NeighborEntry {
        ip,
        mac,
        hostname: None,
    })
}

/// Read the neighbor table and resolve vendors
///
/// Any command failure yields an empty list.
pub async fn discover_neighbors(
    runner: &dyn CommandRunner,
    platform: Platform,
    vendors: &VendorTable,
    timeout: Duration,
) -> Vec<NeighborRecord> {
    let Some((format, program, arguments)) = NeighborFormat::for_platform(platform) else {
        warn!(platform = %platform, "No neighbor table command for platform");
        return Vec::new();
    };

    let output = match runner.run(program, &args(arguments), timeout).await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to read neighbor table");
            return Vec::new();
        }
    };

    let neighbors: Vec<NeighborRecord> = format
        .parse(&output)
        .into_iter()
        .map(|entry| {
            trace!(ip = %entry.ip, mac = %entry.mac, "Neighbor entry");
            NeighborRecord {
                vendor: Some(vendors.lookup(&entry.mac).to_string()),
                ip: entry.ip.to_string(),
                mac: entry.mac,
                hostname: entry.hostname,
            }
        })
        .collect();

    debug!("Found {} neighbor entries", neighbors.len());
    neighbors
}
