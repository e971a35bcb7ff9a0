//! Shared building blocks for `portprobe`.
//!
//! Everything here is free of socket or process I/O: the port model, the
//! process-wide switches, the error type and helpers over `pnet` interface
//! records. The probing engine itself lives in `portprobe-core`.

pub mod config;
pub mod error;
pub mod network;
pub mod utils;

pub use error::PortError;
