//! Models shared by the `alpho` engine and its command line front-end.
//!
//! Nothing in this crate performs IO.

pub mod config;
pub mod network;
