pub mod download;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use alpho_common::config::{DEFAULT_INPUT, DEFAULT_RATE, DEFAULT_WORKERS, ScanConfig};
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "alpho")]
#[command(about = "A rate-limited HTTP reachability scanner.")]
#[command(version)]
pub struct CommandLine {
    /// Input file containing hosts, IPs or URLs, one per line
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub file: PathBuf,

    /// Scan rate in hosts per second
    #[arg(short, long, default_value_t = DEFAULT_RATE)]
    pub rate: u32,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub threads: usize,

    /// Timeout for each HTTP request (e.g. 3s, 500ms, 1m)
    #[arg(long, default_value = "3s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Also append responsive hosts to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Connect directly, ignoring proxy environment variables
    #[arg(long)]
    pub no_proxy: bool,

    /// Download the varnish IP range list to varnish.txt before scanning
    #[arg(long)]
    pub varnish: bool,

    /// Less terminal noise: -q hides headers and summary, -qq the progress bar too
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More diagnostics: -v shows unreachable hosts, -vv everything
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            input: self.file.clone(),
            rate: self.rate,
            workers: self.threads,
            timeout: self.timeout,
            output: self.output.clone(),
            no_proxy: self.no_proxy,
        }
    }
}

/// Accepts `500ms`, `3s`, `1m`, or a bare number of seconds.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s: &str = s.trim();
    let (value, unit) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };

    let value: f64 = value
        .parse()
        .map_err(|_| format!("invalid duration '{s}'"))?;

    let secs: f64 = match unit {
        "ms" => value / 1_000.0,
        "s" => value,
        "m" => value * 60.0,
        _ => return Err(format!("unknown unit '{unit}' in '{s}', use ms, s or m")),
    };

    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{s}': {e}"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
