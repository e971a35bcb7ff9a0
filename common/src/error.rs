use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::network::port::PortStatus;

/// Every failure the engine can surface.
///
/// A bind that fails with "address in use" or "permission denied" is not an
/// error: it is reported as [`PortStatus::Busy`]. Likewise a port observed in
/// the wrong state while waiting is only a retry signal and never leaves the
/// polling loop. What remains falls into three groups:
///
/// * hard probe failures (sockets, subprocesses, malformed input),
/// * [`PortError::Timeout`] when the desired state never showed up,
/// * [`PortError::InsufficientPorts`] when a range search runs dry.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("invalid port range {min}-{max}")]
    InvalidRange { min: u16, max: u16 },

    #[error("could not resolve host '{host}'")]
    Resolve { host: String },

    #[error("probing {host}:{port} failed: {source}")]
    Probe {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("no OS command available to list listening ports")]
    CommandUnavailable,

    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with status {}", .code.map_or("unknown".to_string(), |c| c.to_string()))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("invalid output pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("port {port} did not become {desired} within {elapsed:?}")]
    Timeout {
        port: u16,
        desired: PortStatus,
        elapsed: Duration,
    },

    #[error("only found {found} of {needed} ports")]
    InsufficientPorts { found: usize, needed: usize },
}

impl PortError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PortError::Timeout { .. })
    }
}
