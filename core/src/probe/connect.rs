use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use portprobe_common::network::port::PortStatus;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Connects to `addr` as a client.
///
/// A completed handshake means something is listening; the connection is
/// shut down before returning. Refused or unreachable means free. A connect
/// that outlives `limit` is an error since the state stays unknown.
pub(super) async fn probe_connect(addr: SocketAddr, limit: Duration) -> io::Result<PortStatus> {
    settle_connect(addr, limit, TcpStream::connect(addr)).await
}

async fn settle_connect<F>(addr: SocketAddr, limit: Duration, connecting: F) -> io::Result<PortStatus>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    match timeout(limit, connecting).await {
        Ok(Ok(mut stream)) => {
            if let Err(e) = stream.shutdown().await {
                trace!("shutdown of connection to {addr} failed: {e}");
            }
            Ok(PortStatus::Busy)
        }
        Ok(Err(e)) if is_refusal(e.kind()) => Ok(PortStatus::Free),
        Ok(Err(e)) => Err(e),
        Err(_elapsed) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect to {addr} timed out after {limit:?}"),
        )),
    }
}

fn is_refusal(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
    )
}
