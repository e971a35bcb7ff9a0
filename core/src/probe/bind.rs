use std::io;
use std::net::SocketAddr;

use portprobe_common::network::port::PortStatus;
use tokio::net::TcpListener;
use tracing::debug;

/// Listens on `addr` and closes again.
///
/// "Address in use" means busy. "Permission denied" is reported as busy too:
/// we cannot prove the port free, so we must not claim it is. Everything else
/// is returned as an error.
pub(super) async fn probe_bind(addr: SocketAddr) -> io::Result<PortStatus> {
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            drop(listener);
            Ok(PortStatus::Free)
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Ok(PortStatus::Busy),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!("bind {addr}: permission denied, treating as busy");
            Ok(PortStatus::Busy)
        }
        Err(e) => Err(e),
    }
}
