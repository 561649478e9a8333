//! # Target Source
//!
//! Streams [`Target`]s lazily out of a newline-delimited list.
//!
//! The total number of targets is known up front so progress can be reported
//! while dispatching. [`TargetSource::open`] gets it with a counting pre-pass over
//! the file, then reopens it for streaming.

use std::io;
use std::path::Path;

use alpho_common::network::target::Target;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::ScanError;

pub struct TargetSource<R> {
    reader: R,
    total: usize,
    line: Vec<u8>,
}

impl TargetSource<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self, ScanError> {
        let input_error = |source: io::Error| ScanError::Input {
            path: path.to_path_buf(),
            source,
        };

        let counting = BufReader::new(File::open(path).await.map_err(input_error)?);
        let total: usize = count_targets(counting).await.map_err(input_error)?;

        let reader = BufReader::new(File::open(path).await.map_err(input_error)?);
        Ok(Self::new(reader, total))
    }
}

impl<R> TargetSource<R>
where
    R: AsyncBufRead + Unpin,
{
    /// `total` is what progress reporting will use as the denominator.
    pub fn new(reader: R, total: usize) -> Self {
        Self {
            reader,
            total,
            line: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Next target in input order, or `None` once the input is exhausted.
    pub async fn next_target(&mut self) -> io::Result<Option<Target>> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                return Ok(None);
            }
            if let Some(target) = Target::from_line(&String::from_utf8_lossy(&self.line)) {
                return Ok(Some(target));
            }
        }
    }
}

/// Counts the lines that [`TargetSource::next_target`] would turn into targets.
pub async fn count_targets<R>(mut reader: R) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut line: Vec<u8> = Vec::new();
    let mut total: usize = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(total);
        }
        if Target::from_line(&String::from_utf8_lossy(&line)).is_some() {
            total += 1;
        }
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
