//! Probing strategies.
//!
//! The worker pool only talks to the [`Prober`] trait. [`http::HttpProber`] is
//! the one used by real scans.

use alpho_common::network::{outcome::ScanOutcome, target::Target};
use async_trait::async_trait;

pub mod http;

/// Performs exactly one reachability check per call.
///
/// Failures are reported inside the returned [`ScanOutcome`], so a probe never
/// errors and never panics on a bad target.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target) -> ScanOutcome;
}
