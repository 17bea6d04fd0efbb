//! Throughput sampling against an HTTP speed-test endpoint
//!
//! Three sequential phases: a HEAD request for baseline latency, a timed
//! bulk download and a timed bulk upload. A failed phase contributes zero
//! and does not stop the phases after it.

use airscope_core::ThroughputResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Capability to issue outbound HTTP requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a HEAD request; any response counts as success
    async fn head(&self, url: &str, timeout: Duration) -> Result<(), TransportError>;

    /// GET `url` and drain the body, returning the number of bytes received
    async fn download(&self, url: &str, timeout: Duration) -> Result<u64, TransportError>;

    /// POST `payload` to `url`
    async fn upload(&self, url: &str, payload: Vec<u8>, timeout: Duration)
        -> Result<(), TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("airscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    fn classify(url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = e.status() {
            TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &str, timeout: Duration) -> Result<(), TransportError> {
        self.client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;
        Ok(())
    }

    async fn download(&self, url: &str, timeout: Duration) -> Result<u64, TransportError> {
        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Self::classify(url, e))?;

        let mut received = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| Self::classify(url, e))? {
            received += chunk.len() as u64;
        }
        Ok(received)
    }

    async fn upload(
        &self,
        url: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        self.client
            .post(url)
            .timeout(timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Self::classify(url, e))?;
        Ok(())
    }
}

/// Throughput sampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputConfig {
    /// Speed-test host, reached over HTTPS
    pub server: String,
    /// Size of the download payload requested from the server
    pub download_bytes: u64,
    /// Size of the generated upload payload
    pub upload_bytes: usize,
    pub latency_timeout_secs: u64,
    pub transfer_timeout_secs: u64,
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        Self {
            server: "speed.cloudflare.com".to_string(),
            download_bytes: 10_000_000,
            upload_bytes: 1_000_000,
            latency_timeout_secs: 5,
            transfer_timeout_secs: 30,
        }
    }
}

impl ThroughputConfig {
    fn base_url(&self) -> String {
        format!("https://{}", self.server)
    }

    pub fn latency_url(&self) -> String {
        format!("{}/", self.base_url())
    }

    pub fn download_url(&self) -> String {
        format!("{}/__down?bytes={}", self.base_url(), self.download_bytes)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/__up", self.base_url())
    }
}

/// Megabits per second for `bytes` moved in `elapsed`, rounded to 2 decimals
pub fn rate_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    let mbps = (bytes as f64 * 8.0) / secs / 1_000_000.0;
    (mbps * 100.0).round() / 100.0
}

/// Await `fut`, returning its output with the time it took
async fn timed<T>(fut: impl Future<Output = T>) -> (T, Duration) {
    let start = Instant::now();
    let out = fut.await;
    (out, start.elapsed())
}

/// Run the three phases in order and aggregate the result
pub async fn measure_throughput(
    transport: &dyn Transport,
    config: &ThroughputConfig,
) -> ThroughputResult {
    let latency_timeout = Duration::from_secs(config.latency_timeout_secs);
    let transfer_timeout = Duration::from_secs(config.transfer_timeout_secs);
    let mut failures = 0;

    let ping = match timed(transport.head(&config.latency_url(), latency_timeout)).await {
        (Ok(()), elapsed) => elapsed.as_millis().min(u32::MAX as u128) as u32,
        (Err(e), _) => {
            warn!(error = %e, "Latency phase failed");
            failures += 1;
            0
        }
    };

    let download = match timed(transport.download(&config.download_url(), transfer_timeout)).await
    {
        (Ok(bytes), elapsed) => {
            debug!(bytes, elapsed_ms = elapsed.as_millis() as u64, "Download phase complete");
            rate_mbps(bytes, elapsed)
        }
        (Err(e), _) => {
            warn!(error = %e, "Download phase failed");
            failures += 1;
            0.0
        }
    };

    let payload = vec![b'x'; config.upload_bytes];
    let upload = match timed(transport.upload(&config.upload_url(), payload, transfer_timeout)).await
    {
        (Ok(()), elapsed) => rate_mbps(config.upload_bytes as u64, elapsed),
        (Err(e), _) => {
            warn!(error = %e, "Upload phase failed");
            failures += 1;
            0.0
        }
    };

    if failures == 3 {
        warn!(server = %config.server, "Throughput test failed");
        return ThroughputResult::failed(&config.server);
    }

    info!(download, upload, ping, server = %config.server, "Throughput test complete");
    ThroughputResult {
        download,
        upload,
        ping,
        server: config.server.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Transport whose phases take a fixed (virtual) time or fail
    #[derive(Default)]
    struct FakeTransport {
        head_delay: Option<Duration>,
        download: Option<(u64, Duration)>,
        upload_delay: Option<Duration>,
        urls: Mutex<Vec<String>>,
    }

    fn timeout_error(url: &str) -> TransportError {
        TransportError::Timeout {
            url: url.to_string(),
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn head(&self, url: &str, _timeout: Duration) -> Result<(), TransportError> {
            self.urls.lock().unwrap().push(format!("HEAD {url}"));
            let delay = self.head_delay.ok_or_else(|| timeout_error(url))?;
            tokio::time::sleep(delay).await;
            Ok(())
        }

        async fn download(&self, url: &str, _timeout: Duration) -> Result<u64, TransportError> {
            self.urls.lock().unwrap().push(format!("GET {url}"));
            let (bytes, delay) = self.download.ok_or_else(|| timeout_error(url))?;
            tokio::time::sleep(delay).await;
            Ok(bytes)
        }

        async fn upload(
            &self,
            url: &str,
            payload: Vec<u8>,
            _timeout: Duration,
        ) -> Result<(), TransportError> {
            self.urls
                .lock()
                .unwrap()
                .push(format!("POST {url} {}", payload.len()));
            let delay = self.upload_delay.ok_or_else(|| timeout_error(url))?;
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }

    #[test]
    fn test_rate_mbps() {
        assert_eq!(rate_mbps(10_000_000, Duration::from_secs(1)), 80.0);
        assert_eq!(rate_mbps(1_000_000, Duration::from_millis(500)), 16.0);
        assert_eq!(rate_mbps(1_234_567, Duration::from_secs(3)), 3.29);
        assert_eq!(rate_mbps(1_000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ThroughputConfig::default();
        assert_eq!(config.latency_url(), "https://speed.cloudflare.com/");
        assert_eq!(
            config.download_url(),
            "https://speed.cloudflare.com/__down?bytes=10000000"
        );
        assert_eq!(config.upload_url(), "https://speed.cloudflare.com/__up");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_phases_succeed() {
        let transport = FakeTransport {
            head_delay: Some(Duration::from_millis(25)),
            download: Some((10_000_000, Duration::from_secs(1))),
            upload_delay: Some(Duration::from_millis(500)),
            ..Default::default()
        };
        let config = ThroughputConfig::default();

        let result = measure_throughput(&transport, &config).await;
        assert_eq!(result.server, "speed.cloudflare.com");
        assert!((result.download - 80.0).abs() < 0.5);
        assert!((result.upload - 16.0).abs() < 0.5);
        assert!((25..30).contains(&result.ping));

        let urls = transport.urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            vec![
                "HEAD https://speed.cloudflare.com/".to_string(),
                "GET https://speed.cloudflare.com/__down?bytes=10000000".to_string(),
                "POST https://speed.cloudflare.com/__up 1000000".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_phase_does_not_stop_others() {
        let transport = FakeTransport {
            head_delay: Some(Duration::from_millis(10)),
            download: None,
            upload_delay: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let result = measure_throughput(&transport, &ThroughputConfig::default()).await;
        assert_eq!(result.download, 0.0);
        assert!(result.upload > 0.0);
        assert_eq!(result.server, "speed.cloudflare.com");
        assert_eq!(transport.urls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_total_failure_is_tagged() {
        let transport = FakeTransport::default();
        let result = measure_throughput(&transport, &ThroughputConfig::default()).await;
        assert_eq!(result, ThroughputResult::failed("speed.cloudflare.com"));
        assert_eq!(result.server, "speed.cloudflare.com (failed)");
    }
}
