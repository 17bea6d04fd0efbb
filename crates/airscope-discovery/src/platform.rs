//! Host platform selection

use airscope_core::SystemInfo;
use std::time::Duration;
use tracing::debug;

use crate::command::CommandRunner;

/// Operating system family, which decides the tools and parsers used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Unsupported,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Windows => "win32",
            Self::Linux => "linux",
            Self::Unsupported => std::env::consts::OS,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describe the host: platform, architecture and hostname
pub async fn system_info(runner: &dyn CommandRunner) -> SystemInfo {
    let hostname = match runner.run("hostname", &[], Duration::from_secs(5)).await {
        Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
        Ok(_) => "unknown".to_string(),
        Err(e) => {
            debug!(error = %e, "Hostname lookup failed");
            "unknown".to_string()
        }
    };

    SystemInfo {
        platform: Platform::current().to_string(),
        arch: std::env::consts::ARCH.to_string(),
        hostname,
    }
}
