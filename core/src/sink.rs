//! # Result Sink
//!
//! Single consumer of every [`ScanOutcome`]. Reachable targets become one
//! `"<host> <status line>"` line on the console and, optionally, in the output
//! file. Unreachable targets are dropped silently.
//!
//! Workers never touch the file. They send outcomes over a channel and this
//! sink appends them one whole line at a time, so concurrent results cannot
//! interleave partial writes.
//!
//! Lines come out in completion order, not input order.

use std::io;
use std::path::{Path, PathBuf};

use alpho_common::network::outcome::{Reachability, ScanOutcome};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::error::ScanError;

/// Receives each result line as soon as it is known.
pub type ConsoleWriter = Box<dyn Fn(&str) + Send + Sync>;

/// Append-only result file, kept open for the whole run.
pub struct OutputFile {
    path: PathBuf,
    file: File,
}

impl OutputFile {
    /// Creates the file, truncating any previous run's content.
    pub async fn create(path: &Path) -> Result<Self, ScanError> {
        let file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .map_err(|source| ScanError::Output {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one line and waits for it to land, so a failure is reported
    /// against the line that caused it.
    async fn append(&mut self, line: &str) -> io::Result<()> {
        let mut record: String = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file.write_all(record.as_bytes()).await?;
        self.file.flush().await
    }

    async fn close(mut self) -> io::Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkReport {
    pub reachable: usize,
    pub unreachable: usize,
    pub write_failures: usize,
}

pub struct ResultSink {
    console: ConsoleWriter,
    file: Option<OutputFile>,
    report: SinkReport,
}

impl ResultSink {
    pub fn new(console: ConsoleWriter) -> Self {
        Self {
            console,
            file: None,
            report: SinkReport::default(),
        }
    }

    pub fn with_file(mut self, file: OutputFile) -> Self {
        self.file = Some(file);
        self
    }

    pub async fn record(&mut self, outcome: ScanOutcome) {
        let line: String = match outcome.report_line() {
            Some(line) => line,
            None => {
                if let Reachability::Unreachable { reason } = outcome.reachability {
                    debug!(url = %outcome.target, %reason, "dropping unreachable host");
                }
                self.report.unreachable += 1;
                return;
            }
        };

        self.report.reachable += 1;
        (self.console)(&line);

        if let Some(file) = self.file.as_mut() {
            if let Err(e) = file.append(&line).await {
                error!(path = %file.path().display(), "Failed to append '{line}': {e}");
                self.report.write_failures += 1;
            }
        }
    }

    /// Records outcomes until every sender is gone, then flushes and closes the file.
    pub async fn drain(mut self, mut results: mpsc::Receiver<ScanOutcome>) -> SinkReport {
        while let Some(outcome) = results.recv().await {
            self.record(outcome).await;
        }
        self.close().await
    }

    /// Every line was already flushed by `record`, so a failed sync here is
    /// logged but not counted as a lost line.
    pub async fn close(self) -> SinkReport {
        if let Some(file) = self.file {
            let path: PathBuf = file.path.clone();
            if let Err(e) = file.close().await {
                warn!(path = %path.display(), "Failed to sync output file: {e}");
            }
        }
        self.report
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
