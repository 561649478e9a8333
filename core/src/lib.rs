//! # alpho scanning engine
//!
//! Probes a list of hosts over HTTP with a paced dispatcher and a fixed-size
//! worker pool, and reports the hosts that answered.
//!
//! * **[`source`]**: lazy, normalized targets out of a newline-delimited list.
//! * **[`scanner`]**: dispatcher, worker pool and the [`scanner::Scanner`] that ties them together.
//! * **[`network`]**: the [`network::Prober`] seam and its HTTP implementation.
//! * **[`sink`]**: console and file output of reachable hosts.
//! * **[`signal`]**: operator stop request.
//!
//! Results are emitted in completion order. Input order is not preserved.

pub mod error;
pub mod network;
pub mod scanner;
pub mod signal;
pub mod sink;
pub mod source;
