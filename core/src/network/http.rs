use std::time::Duration;

use alpho_common::config::ScanConfig;
use alpho_common::network::outcome::{FailureKind, ScanOutcome};
use alpho_common::network::target::Target;
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use super::Prober;
use crate::error::ScanError;

const USER_AGENT: &str = concat!("alpho/", env!("CARGO_PKG_VERSION"));

/// Issues a single `GET` per target and reports the status line.
///
/// Any HTTP status counts as reachable. Only transport failures (refused,
/// DNS, TLS, timeout) make a target unreachable. The body is never read, and
/// idle pooling is off so the connection is closed as soon as the response
/// is dropped.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(cfg: &ScanConfig) -> Result<Self, ScanError> {
        Self::with_timeout(cfg.timeout, cfg.no_proxy)
    }

    pub fn with_timeout(timeout: Duration, no_proxy: bool) -> Result<Self, ScanError> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT);

        if no_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> ScanOutcome {
        match self.client.get(target.url()).send().await {
            Ok(response) => ScanOutcome::reachable(target.clone(), response_status_line(&response)),
            Err(err) => {
                let reason: FailureKind = classify(&err);
                debug!(url = %target, %reason, error = %err, "host unreachable");
                ScanOutcome::unreachable(target.clone(), reason)
            }
        }
    }
}

/// The status line as the server sent it.
///
/// hyper only keeps the reason phrase when it differs from the canonical one.
fn response_status_line(response: &Response) -> String {
    let sent: Option<&[u8]> = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(ReasonPhrase::as_bytes);
    status_line(response.status(), sent)
}

/// `"200 OK"` style line. The sent reason wins over the canonical one, and a
/// code with neither is shown alone.
fn status_line(status: StatusCode, sent_reason: Option<&[u8]>) -> String {
    let reason: Option<String> = match sent_reason {
        Some(raw) if !raw.is_empty() => Some(String::from_utf8_lossy(raw).into_owned()),
        _ => status.canonical_reason().map(str::to_string),
    };

    match reason {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn classify(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else if err.is_builder() {
        FailureKind::Request
    } else {
        FailureKind::Other
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
