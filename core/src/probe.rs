//! # Single-Port Probes
//!
//! Two ways to learn whether a port is in use:
//!
//! * **Bind**: open a listening socket on the port and close it straight away.
//!   Fast on every platform, but only meaningful for addresses of this machine.
//! * **Connect**: try to connect as a client. Works against any host, but it
//!   is slower and it talks to whatever server happens to be listening.
//!
//! Bind is used whenever the host is verifiably local, unless the process-wide
//! force-client switch says otherwise.

mod bind;
mod connect;

use std::net::{IpAddr, SocketAddr};

use futures_util::future::join_all;
use portprobe_common::config::{self, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST};
use portprobe_common::error::PortError;
use portprobe_common::network::port::{PortStatus, ProbeStrategy, validate_port};
use tokio::net::lookup_host;
use tracing::{trace, warn};

use crate::aliases;

/// Picks the strategy for `host` under the current force-client setting.
pub fn select_strategy(host: &str) -> ProbeStrategy {
    strategy_for(config::force_client(), host)
}

/// Connect for remote hosts, or for every host when `force_client` is set.
pub fn strategy_for(force_client: bool, host: &str) -> ProbeStrategy {
    if !force_client && aliases::is_local_host(host) {
        ProbeStrategy::Bind
    } else {
        ProbeStrategy::Connect
    }
}

/// Strategy for the alias fan-out; aliases are local by construction.
pub fn alias_strategy(force_client: bool) -> ProbeStrategy {
    if force_client {
        ProbeStrategy::Connect
    } else {
        ProbeStrategy::Bind
    }
}

/// Probes `host:port` once with the given strategy.
pub async fn probe(strategy: ProbeStrategy, port: u16, host: &str) -> Result<PortStatus, PortError> {
    validate_port(port)?;
    let addr = resolve_host(host, port).await?;

    let outcome = match strategy {
        ProbeStrategy::Bind => bind::probe_bind(addr).await,
        ProbeStrategy::Connect => connect::probe_connect(addr, DEFAULT_CONNECT_TIMEOUT).await,
    };

    match outcome {
        Ok(status) => {
            trace!("{strategy:?} probe {addr}: {status}");
            Ok(status)
        }
        Err(source) => {
            warn!("{strategy:?} probe {addr} failed unexpectedly: {source}");
            Err(PortError::Probe {
                host: addr.ip().to_string(),
                port,
                source,
            })
        }
    }
}

/// Bind-based check of a single address. `host` should be a local alias.
pub async fn is_port_in_use(port: u16, host: &str) -> Result<bool, PortError> {
    probe(ProbeStrategy::Bind, port, host)
        .await
        .map(PortStatus::is_busy)
}

/// Probes `host` with whatever strategy suits it.
pub async fn probe_port(port: u16, host: &str) -> Result<PortStatus, PortError> {
    probe(select_strategy(host), port, host).await
}

/// Checks every loopback alias. `_host` is accepted for call-site
/// compatibility; the alias list always supersedes it.
pub async fn is_port_in_use_ex(port: u16, _host: &str) -> Result<bool, PortError> {
    probe_any_alias(port).await.map(PortStatus::is_busy)
}

/// Probes `port` on every loopback alias concurrently.
///
/// The port is busy if any alias reports it busy and free only when the
/// others all report it free. Failing aliases are ignored unless every alias
/// failed, in which case the first failure is returned.
pub async fn probe_any_alias(port: u16) -> Result<PortStatus, PortError> {
    let strategy = alias_strategy(config::force_client());

    let checks = aliases::local_host_aliases().iter().map(|addr| {
        let host = addr.to_string();
        async move { probe(strategy, port, &host).await }
    });
    let results = join_all(checks).await;
    trace!("alias probes for port {port}: {results:?}");

    merge_alias_results(results)
}

/// OR-reduction of per-alias outcomes.
pub fn merge_alias_results(
    results: impl IntoIterator<Item = Result<PortStatus, PortError>>,
) -> Result<PortStatus, PortError> {
    let mut saw_free = false;
    let mut first_error: Option<PortError> = None;

    for result in results {
        match result {
            Ok(PortStatus::Busy) => return Ok(PortStatus::Busy),
            Ok(PortStatus::Free) => saw_free = true,
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if !saw_free => Err(e),
        _ => Ok(PortStatus::Free),
    }
}

/// Empty means the default unspecified address; names go through the system resolver.
async fn resolve_host(host: &str, port: u16) -> Result<SocketAddr, PortError> {
    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| PortError::Probe {
            host: host.to_string(),
            port,
            source,
        })?;
    addrs.next().ok_or_else(|| PortError::Resolve {
        host: host.to_string(),
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
