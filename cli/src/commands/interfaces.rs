use colored::*;
use portprobe_core::external_ipv4_addresses;
use tracing::{info, warn};

pub fn interfaces() {
    let external = external_ipv4_addresses();
    if external.interfaces.is_empty() {
        warn!("No external IPv4 interfaces found");
        return;
    }

    for iface in external.interfaces.values() {
        let addrs: String = iface
            .addresses
            .iter()
            .map(|addr| addr.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        info!("{} ({:?}): {}", iface.name.bold(), iface.family, addrs);
    }

    if let Some(default_addr) = external.default_addr {
        info!("Default address: {}", default_addr.to_string().green().bold());
    }
}
