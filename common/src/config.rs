//! # Scan Configuration
//!
//! Built once at startup and shared read-only by every component of a scan.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_INPUT: &str = "cloud.txt";
pub const DEFAULT_RATE: u32 = 200;
pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("scan rate must be at least 1 host per second")]
    ZeroRate,
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Newline-delimited list of hosts, IPs or URLs.
    pub input: PathBuf,
    /// Hosts dispatched per second.
    pub rate: u32,
    /// Number of concurrent probe executors.
    pub workers: usize,
    /// Per-request timeout, covering connect, TLS and response headers.
    pub timeout: Duration,
    /// Optional file that receives a copy of every result line.
    pub output: Option<PathBuf>,
    /// Ignores `HTTP_PROXY` / `HTTPS_PROXY` and connects directly.
    pub no_proxy: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            rate: DEFAULT_RATE,
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            output: None,
            no_proxy: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Fixed gap between two successive enqueue operations.
    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_secs(1) / self.rate.max(1)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
