//! Fetches the third-party varnish IP range list ahead of a scan.

use std::path::Path;

use anyhow::Context;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{Instrument, Span, info, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::progress;

pub const VARNISH_LIST_URL: &str = "https://raw.githubusercontent.com/elon30/varnish/main/varnish.txt";
pub const VARNISH_LIST_PATH: &str = "varnish.txt";

pub async fn download_varnish_list(no_proxy: bool) -> anyhow::Result<()> {
    let mut builder = Client::builder().user_agent(concat!("alpho/", env!("CARGO_PKG_VERSION")));
    if no_proxy {
        builder = builder.no_proxy();
    }
    let client: Client = builder.build().context("failed to build HTTP client")?;

    info!("Downloading varnish IP ranges...");
    let bytes: u64 = download(&client, VARNISH_LIST_URL, Path::new(VARNISH_LIST_PATH)).await?;
    info!("Download completed, saved {bytes} bytes as {VARNISH_LIST_PATH}");
    Ok(())
}

/// Streams `url` into `dest` chunk by chunk and returns the number of bytes written.
pub async fn download(client: &Client, url: &str, dest: &Path) -> anyhow::Result<u64> {
    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("failed to download {url}"))?;

    let mut file: File = File::create(dest)
        .await
        .with_context(|| format!("failed to create {}", dest.display()))?;

    let span: Span = info_span!("download", indicatif.pb_show = true);
    span.pb_set_style(&progress::bytes_style());
    if let Some(len) = response.content_length() {
        span.pb_set_length(len);
    }

    let written: u64 = stream_to_file(&mut response, &mut file, &span)
        .instrument(span.clone())
        .await
        .with_context(|| format!("failed to save {url} to {}", dest.display()))?;

    Ok(written)
}

async fn stream_to_file(response: &mut Response, file: &mut File, span: &Span) -> anyhow::Result<u64> {
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        span.pb_set_position(written);
    }
    file.flush().await?;
    Ok(written)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
