use std::io;
use std::path::PathBuf;

use alpho_common::config::ConfigError;
use thiserror::Error;

/// Fatal startup failures. Any of these aborts the run before a worker starts.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read input file {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
