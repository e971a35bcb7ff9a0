//! # Free Port Search
//!
//! Walks an inclusive port range upwards and collects free ports. Ports are
//! probed one after the other; only the aliases of a single port are probed
//! concurrently.

use std::future::Future;

use portprobe_common::error::PortError;
use portprobe_common::network::port::{FreePortQuery, PortStatus};
use tokio::time::Instant;
use tracing::debug;

use crate::probe;

/// Finds `query.count` free ports in `query.min..=query.max`.
///
/// `host` is informational: every loopback alias is probed for each port.
/// A `count` of zero returns an empty list without probing anything.
pub async fn find_free_ports(query: FreePortQuery, host: &str) -> Result<Vec<u16>, PortError> {
    debug!(
        "searching {}-{} for {} free port(s) (host {host:?}, consecutive: {})",
        query.min, query.max, query.count, query.consecutive
    );
    search_range(query, probe::probe_any_alias).await
}

/// Legacy completion-handler flavour of [`find_free_ports`].
///
/// `on_found` runs only when the search succeeds; the result is returned either way.
#[deprecated(note = "use `find_free_ports` and handle the result directly")]
pub async fn find_free_ports_with_callback<C>(
    query: FreePortQuery,
    host: &str,
    on_found: C,
) -> Result<Vec<u16>, PortError>
where
    C: FnOnce(&[u16]),
{
    let ports = find_free_ports(query, host).await?;
    on_found(&ports);
    Ok(ports)
}

/// The search itself, generic over the per-port probe.
pub async fn search_range<F, Fut>(query: FreePortQuery, mut prober: F) -> Result<Vec<u16>, PortError>
where
    F: FnMut(u16) -> Fut,
    Fut: Future<Output = Result<PortStatus, PortError>>,
{
    query.validate()?;
    if query.count == 0 {
        return Ok(Vec::new());
    }

    // `count` is caller input and may far exceed the range.
    let mut free: Vec<u16> = Vec::new();
    let mut busy: Vec<u16> = Vec::new();

    for port in query.min..=query.max {
        let started = Instant::now();
        let status = prober(port).await?;

        match status {
            PortStatus::Busy => busy.push(port),
            PortStatus::Free => {
                if query.consecutive && free.last().is_some_and(|&last| port != last + 1) {
                    debug!("port {port} breaks the run {free:?}, restarting");
                    free.clear();
                }
                free.push(port);
            }
        }

        debug!(
            "port {port} {status}, found {} of {} needed ({:?})",
            free.len(),
            query.count,
            started.elapsed()
        );
        if free.len() == query.count {
            return Ok(free);
        }
    }

    debug!("range exhausted, busy ports: {busy:?}");
    Err(PortError::InsufficientPorts {
        found: free.len(),
        needed: query.count,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
