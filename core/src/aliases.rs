//! # Local Host Aliases
//!
//! A port can be held on `127.0.0.1` and still be free on `0.0.0.0`, or the
//! other way round, depending on the platform. The engine therefore keeps a
//! list of every address that refers to this machine's loopback and probes
//! all of them when it has to be sure.
//!
//! The list is computed from the interface table on first use and cached for
//! the lifetime of the process.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;

use pnet::datalink::{self, NetworkInterface};
use portprobe_common::utils::interface::NetworkInterfaceExtension;
use tracing::debug;

static LOCAL_HOST_ALIASES: OnceLock<AliasSet> = OnceLock::new();

/// Ordered, duplicate-free list of loopback aliases.
///
/// Always starts with `127.0.0.1` and `0.0.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet {
    addrs: Vec<IpAddr>,
}

impl AliasSet {
    fn with_loopback_literals() -> Self {
        Self {
            addrs: vec![
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ],
        }
    }

    fn insert(&mut self, addr: IpAddr) {
        if !self.addrs.contains(&addr) {
            self.addrs.push(addr);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> {
        self.addrs.iter()
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.addrs.contains(addr)
    }

    /// Host names are never aliases; only literal addresses can match.
    pub fn contains_host(&self, host: &str) -> bool {
        host.parse::<IpAddr>()
            .is_ok_and(|addr| self.contains(&addr))
    }
}

/// Builds the alias list from an interface snapshot.
pub fn resolve_aliases(interfaces: &[NetworkInterface]) -> AliasSet {
    let mut aliases = AliasSet::with_loopback_literals();
    for interface in interfaces.iter().filter(|i| i.is_internal()) {
        for addr in interface.ipv4_addrs() {
            aliases.insert(IpAddr::V4(addr));
        }
    }
    aliases
}

/// Process-wide alias list, computed on first call.
pub fn local_host_aliases() -> &'static AliasSet {
    LOCAL_HOST_ALIASES.get_or_init(|| {
        let aliases = resolve_aliases(&datalink::interfaces());
        debug!(?aliases, "resolved local host aliases");
        aliases
    })
}

/// Whether `host` can be probed by binding: empty, `localhost`, or a cached alias.
pub fn is_local_host(host: &str) -> bool {
    host.is_empty()
        || host.eq_ignore_ascii_case("localhost")
        || local_host_aliases().contains_host(host)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

/// Addresses of a single external interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddresses {
    pub name: String,
    pub family: AddressFamily,
    pub addresses: Vec<Ipv4Addr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalAddresses {
    pub interfaces: BTreeMap<String, InterfaceAddresses>,
    /// First external address encountered, if any.
    pub default_addr: Option<Ipv4Addr>,
}

/// Collects the IPv4 addresses of every non-internal interface that has a real MAC.
///
/// Tunnels and other synthetic adapters usually report no MAC or a sentinel
/// one and are skipped. Adapters faking a plausible MAC still get through.
pub fn collect_external_ipv4(interfaces: &[NetworkInterface]) -> ExternalAddresses {
    let mut result = ExternalAddresses::default();

    for interface in interfaces {
        if interface.is_internal() || !interface.has_valid_mac() {
            continue;
        }
        let addrs = interface.ipv4_addrs();
        if addrs.is_empty() {
            continue;
        }

        result.default_addr = result.default_addr.or(addrs.first().copied());
        result
            .interfaces
            .entry(interface.name.clone())
            .or_insert_with(|| InterfaceAddresses {
                name: interface.name.clone(),
                family: AddressFamily::Ipv4,
                addresses: Vec::new(),
            })
            .addresses
            .extend(addrs);
    }

    result
}

/// Live snapshot of the external IPv4 addresses. Informational only.
pub fn external_ipv4_addresses() -> ExternalAddresses {
    collect_external_ipv4(&datalink::interfaces())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
