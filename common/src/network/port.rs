//! # Port Model
//!
//! Value types shared by every probe: the observed state of a port, the way
//! it was probed, and the parameters of a free-port search.

use std::fmt;

use crate::error::PortError;

/// Observed state of a single TCP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortStatus {
    /// Nothing is listening; a server could be started on the port.
    Free,
    /// Something holds the port, or we are not allowed to find out.
    Busy,
}

impl PortStatus {
    pub fn is_busy(self) -> bool {
        self == PortStatus::Busy
    }

    pub fn from_busy(busy: bool) -> Self {
        if busy { PortStatus::Busy } else { PortStatus::Free }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Free => write!(f, "free"),
            PortStatus::Busy => write!(f, "busy"),
        }
    }
}

/// How a single port is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Open a listening socket and close it again. Local addresses only.
    Bind,
    /// Open a client connection. Works for any host.
    Connect,
}

/// Parameters of a free-port search over an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreePortQuery {
    pub min: u16,
    pub max: u16,
    /// Number of free ports wanted.
    pub count: usize,
    /// Require the returned ports to be contiguous.
    pub consecutive: bool,
}

impl FreePortQuery {
    pub fn new(min: u16, max: u16) -> Self {
        Self {
            min,
            max,
            count: 1,
            consecutive: false,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn consecutive(mut self, consecutive: bool) -> Self {
        self.consecutive = consecutive;
        self
    }

    pub fn validate(&self) -> Result<(), PortError> {
        if self.min == 0 || self.min > self.max {
            return Err(PortError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Rejects port `0`; every other `u16` is a valid TCP port.
pub fn validate_port(port: u16) -> Result<u16, PortError> {
    if port == 0 {
        return Err(PortError::InvalidPort(port));
    }
    Ok(port)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_builder_defaults_to_single_port() {
        let query = FreePortQuery::new(3000, 3100);
        assert_eq!(query.count, 1);
        assert!(!query.consecutive);

        let query = query.count(4).consecutive(true);
        assert_eq!(query.count, 4);
        assert!(query.consecutive);
    }

    #[test]
    fn query_rejects_inverted_range() {
        let result = FreePortQuery::new(5000, 4000).validate();
        assert!(matches!(
            result,
            Err(PortError::InvalidRange { min: 5000, max: 4000 })
        ));
    }

    #[test]
    fn query_rejects_port_zero_as_minimum() {
        assert!(FreePortQuery::new(0, 10).validate().is_err());
        assert!(FreePortQuery::new(10, 10).validate().is_ok());
    }

    #[test]
    fn validate_port_rejects_zero() {
        assert!(matches!(validate_port(0), Err(PortError::InvalidPort(0))));
        assert_eq!(validate_port(65535).unwrap(), 65535);
    }

    #[test]
    fn status_from_busy_flag() {
        assert_eq!(PortStatus::from_busy(true), PortStatus::Busy);
        assert_eq!(PortStatus::from_busy(false), PortStatus::Free);
        assert!(PortStatus::Busy.is_busy());
        assert_eq!(PortStatus::Free.to_string(), "free");
    }
}
