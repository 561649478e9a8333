//! # Scan Outcome Model
//!
//! One [`ScanOutcome`] is produced per probed [`Target`]. Probe failures are
//! plain values here, never errors.

use std::fmt;

use crate::network::target::Target;

/// Why a target did not answer.
///
/// Only used for diagnostics. Result lines never mention unreachable hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No response within the configured timeout.
    Timeout,
    /// Connection refused, DNS failure or TLS handshake failure.
    Connect,
    /// The request could not be built, usually a malformed URL.
    Request,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: &str = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Request => "request",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    Reachable { status_line: String },
    Unreachable { reason: FailureKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub target: Target,
    pub reachability: Reachability,
}

impl ScanOutcome {
    pub fn reachable(target: Target, status_line: impl Into<String>) -> Self {
        Self {
            target,
            reachability: Reachability::Reachable {
                status_line: status_line.into(),
            },
        }
    }

    pub fn unreachable(target: Target, reason: FailureKind) -> Self {
        Self {
            target,
            reachability: Reachability::Unreachable { reason },
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self.reachability, Reachability::Reachable { .. })
    }

    pub fn status_line(&self) -> Option<&str> {
        match &self.reachability {
            Reachability::Reachable { status_line } => Some(status_line),
            Reachability::Unreachable { .. } => None,
        }
    }

    /// `"<host> <status line>"` for reachable targets, `None` otherwise.
    pub fn report_line(&self) -> Option<String> {
        self.status_line()
            .map(|status| format!("{} {}", self.target.host(), status))
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
