use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use pnet::util::MacAddr;

/// Helpers for reading the bits of a `pnet` interface record the engine cares about.
pub trait NetworkInterfaceExtension {
    fn ipv4_addrs(&self) -> Vec<Ipv4Addr>;
    /// Loopback interfaces are the only "internal" ones.
    fn is_internal(&self) -> bool;
    /// False for a missing MAC and for the all-zero / all-ones sentinels
    /// that tunnels and other synthetic adapters report.
    fn has_valid_mac(&self) -> bool;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn ipv4_addrs(&self) -> Vec<Ipv4Addr> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(ipv4.ip())
                } else {
                    None
                }
            })
            .collect()
    }

    fn is_internal(&self) -> bool {
        self.is_loopback()
    }

    fn has_valid_mac(&self) -> bool {
        match self.mac {
            Some(mac) => mac != MacAddr::zero() && mac != MacAddr::broadcast(),
            None => false,
        }
    }
}
