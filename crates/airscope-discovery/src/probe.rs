//! Connectivity probing: latency, throughput and neighbor discovery

use airscope_core::{NeighborRecord, ProbeResult, ThroughputResult, VendorTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::arp;
use crate::command::CommandRunner;
use crate::platform::Platform;
use crate::throughput::{self, ThroughputConfig, Transport};

/// `rtt min/avg/max/mdev = 9.1/10.2/11.3/0.5 ms` (also BSD `stddev`, busybox)
static RTT_SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"min/avg/max(?:/(?:mdev|stddev))?\s*=\s*[\d.]+/([\d.]+)/").expect("valid pattern")
});
/// Windows `Minimum = 9ms, Maximum = 11ms, Average = 10ms`
static WINDOWS_AVERAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Average\s*=\s*(\d+)\s*ms").expect("valid pattern"));
/// Per-reply `time=10.2 ms` or `time<1ms`
static REPLY_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time\s*[=<]\s*([\d.]+)\s*ms").expect("valid pattern"));
/// `25% packet loss` or Windows `(25% loss)`
static LOSS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.]+)%\s*(?:packet\s+)?loss").expect("valid pattern")
});

/// Probe service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Echo requests sent per latency probe
    pub ping_count: u32,
    pub ping_timeout_secs: u64,
    /// Timeout for reading the neighbor table
    pub arp_timeout_secs: u64,
    pub throughput: ThroughputConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ping_count: 4,
            ping_timeout_secs: 15,
            arp_timeout_secs: 10,
            throughput: ThroughputConfig::default(),
        }
    }
}

/// Average round-trip time and loss read from ping output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingSummary {
    pub latency_ms: f64,
    pub packet_loss: f64,
}

/// Read the ping summary, falling back to `elapsed / count` for the average
pub fn parse_ping_summary(output: &str, count: u32, elapsed: Duration) -> PingSummary {
    let summary_avg = RTT_SUMMARY_RE
        .captures(output)
        .or_else(|| WINDOWS_AVERAGE_RE.captures(output))
        .and_then(|c| c[1].parse::<f64>().ok());

    let latency_ms = summary_avg
        .or_else(|| {
            let times: Vec<f64> = REPLY_TIME_RE
                .captures_iter(output)
                .filter_map(|c| c[1].parse().ok())
                .collect();
            (!times.is_empty()).then(|| times.iter().sum::<f64>() / times.len() as f64)
        })
        .unwrap_or_else(|| elapsed.as_secs_f64() * 1000.0 / count.max(1) as f64);

    let packet_loss = LOSS_RE
        .captures(output)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|loss| loss.clamp(0.0, 100.0))
        .unwrap_or(0.0);

    PingSummary {
        latency_ms,
        packet_loss,
    }
}

/// Hosts are passed to ping as a single argument; refuse anything that
/// ping could read as an option.
fn valid_host(host: &str) -> bool {
    !host.is_empty() && !host.starts_with('-') && !host.chars().any(char::is_whitespace)
}

/// Network probe service
pub struct NetworkProbe {
    runner: Arc<dyn CommandRunner>,
    transport: Arc<dyn Transport>,
    vendors: Arc<VendorTable>,
    config: ProbeConfig,
    platform: Platform,
}

impl NetworkProbe {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        transport: Arc<dyn Transport>,
        vendors: Arc<VendorTable>,
        config: ProbeConfig,
    ) -> Self {
        Self {
            runner,
            transport,
            vendors,
            config,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    fn ping_args(&self, host: &str) -> Vec<String> {
        let count_flag = match self.platform {
            Platform::Windows => "-n",
            _ => "-c",
        };
        vec![
            count_flag.to_string(),
            self.config.ping_count.to_string(),
            host.to_string(),
        ]
    }

    /// Send echo requests to `host` and summarise the replies
    pub async fn probe_latency(&self, host: &str) -> ProbeResult {
        if !valid_host(host) {
            warn!(host = %host, "Refusing to ping invalid host");
            return ProbeResult::failed(host);
        }

        let timeout = Duration::from_secs(self.config.ping_timeout_secs);
        let start = Instant::now();
        let output = match self.runner.run("ping", &self.ping_args(host), timeout).await {
            Ok(output) => output,
            Err(e) => {
                debug!(host = %host, error = %e, "Ping failed");
                return ProbeResult::failed(host);
            }
        };

        let summary = parse_ping_summary(&output, self.config.ping_count, start.elapsed());
        debug!(host = %host, latency_ms = summary.latency_ms, loss = summary.packet_loss, "Ping complete");

        ProbeResult {
            host: host.to_string(),
            latency: summary.latency_ms.round() as u32,
            success: true,
            packet_loss: summary.packet_loss,
        }
    }

    /// Sample download and upload rates against the configured server
    pub async fn measure_throughput(&self) -> ThroughputResult {
        throughput::measure_throughput(self.transport.as_ref(), &self.config.throughput).await
    }

    /// Enumerate devices in the local neighbor table
    pub async fn discover_neighbors(&self) -> Vec<NeighborRecord> {
        arp::discover_neighbors(
            self.runner.as_ref(),
            self.platform,
            &self.vendors,
            Duration::from_secs(self.config.arp_timeout_secs),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;
    use crate::throughput::TransportError;
    use async_trait::async_trait;

    struct OfflineTransport;

    #[async_trait]
    impl Transport for OfflineTransport {
        async fn head(&self, url: &str, _timeout: Duration) -> Result<(), TransportError> {
            Err(TransportError::Timeout { url: url.to_string() })
        }

        async fn download(&self, url: &str, _timeout: Duration) -> Result<u64, TransportError> {
            Err(TransportError::Timeout { url: url.to_string() })
        }

        async fn upload(
            &self,
            url: &str,
            _payload: Vec<u8>,
            _timeout: Duration,
        ) -> Result<(), TransportError> {
            Err(TransportError::Timeout { url: url.to_string() })
        }
    }

    fn probe(runner: Arc<ScriptedRunner>, platform: Platform) -> NetworkProbe {
        NetworkProbe::new(
            runner,
            Arc::new(OfflineTransport),
            Arc::new(VendorTable::builtin()),
            ProbeConfig::default(),
        )
        .with_platform(platform)
    }

    const LINUX_PING: &str = "\
PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data.
64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=11.2 ms
64 bytes from 1.1.1.1: icmp_seq=2 ttl=57 time=12.8 ms

--- 1.1.1.1 ping statistics ---
4 packets transmitted, 3 received, 25% packet loss, time 3004ms
rtt min/avg/max/mdev = 11.2/12.4/13.9/1.0 ms
";

    const WINDOWS_PING: &str = "\r
Pinging 1.1.1.1 with 32 bytes of data:\r
Reply from 1.1.1.1: bytes=32 time=9ms TTL=57\r
Reply from 1.1.1.1: bytes=32 time<1ms TTL=57\r
\r
Ping statistics for 1.1.1.1:\r
    Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),\r
Approximate round trip times in milli-seconds:\r
    Minimum = 1ms, Maximum = 11ms, Average = 7ms\r
";

    #[test]
    fn test_parse_linux_summary() {
        let summary = parse_ping_summary(LINUX_PING, 4, Duration::from_secs(3));
        assert_eq!(summary.latency_ms, 12.4);
        assert_eq!(summary.packet_loss, 25.0);
    }

    #[test]
    fn test_parse_bsd_summary() {
        let output = "\
3 packets transmitted, 3 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 14.1/15.6/16.3/0.9 ms
";
        let summary = parse_ping_summary(output, 3, Duration::ZERO);
        assert_eq!(summary.latency_ms, 15.6);
        assert_eq!(summary.packet_loss, 0.0);
    }

    #[test]
    fn test_parse_windows_summary() {
        let summary = parse_ping_summary(WINDOWS_PING, 4, Duration::ZERO);
        assert_eq!(summary.latency_ms, 7.0);
        assert_eq!(summary.packet_loss, 0.0);
    }

    #[test]
    fn test_parse_reply_times_without_summary() {
        let output = "time=10 ms\ntime=20 ms\ntime<1ms\n";
        let summary = parse_ping_summary(output, 3, Duration::from_secs(9));
        assert!((summary.latency_ms - 31.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_falls_back_to_elapsed() {
        let summary = parse_ping_summary("garbled", 4, Duration::from_millis(400));
        assert_eq!(summary.latency_ms, 100.0);
        assert_eq!(summary.packet_loss, 0.0);
    }

    #[tokio::test]
    async fn test_probe_latency_success() {
        let runner = Arc::new(ScriptedRunner::new().reply("ping", LINUX_PING));
        let result = probe(runner.clone(), Platform::Linux)
            .probe_latency("1.1.1.1")
            .await;

        assert!(result.success);
        assert_eq!(result.latency, 12);
        assert_eq!(result.packet_loss, 25.0);
        assert_eq!(runner.called(), vec!["ping -c 4 1.1.1.1".to_string()]);
    }

    #[tokio::test]
    async fn test_probe_latency_windows_args() {
        let runner = Arc::new(ScriptedRunner::new().reply("ping", WINDOWS_PING));
        let result = probe(runner.clone(), Platform::Windows)
            .probe_latency("1.1.1.1")
            .await;
        assert_eq!(result.latency, 7);
        assert_eq!(runner.called(), vec!["ping -n 4 1.1.1.1".to_string()]);
    }

    #[tokio::test]
    async fn test_probe_latency_failure() {
        let runner = Arc::new(ScriptedRunner::new());
        let result = probe(runner, Platform::Linux).probe_latency("10.255.255.1").await;
        assert_eq!(result, ProbeResult::failed("10.255.255.1"));
    }

    #[tokio::test]
    async fn test_probe_rejects_option_like_host() {
        let runner = Arc::new(ScriptedRunner::new().reply("ping", LINUX_PING));
        let p = probe(runner.clone(), Platform::Linux);

        assert!(!p.probe_latency("-f").await.success);
        assert!(!p.probe_latency("").await.success);
        assert!(!p.probe_latency("a b").await.success);
        assert!(runner.called().is_empty());
    }

    #[tokio::test]
    async fn test_offline_throughput_and_neighbors() {
        let p = probe(Arc::new(ScriptedRunner::new()), Platform::Linux);
        let result = p.measure_throughput().await;
        assert_eq!(result.server, "speed.cloudflare.com (failed)");
        assert!(p.discover_neighbors().await.is_empty());
    }
}
