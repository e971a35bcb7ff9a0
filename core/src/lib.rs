//! # portprobe engine
//!
//! Answers three questions about TCP ports on this machine (or a remote host):
//! is it in use, when will it change state, and where is a free block of them.
//!
//! * [`aliases`]: addresses that mean "this machine's loopback".
//! * [`probe`]: single-shot bind and connect probes, plus the alias fan-out.
//! * [`command`]: probing through the OS port-listing tools.
//! * [`polling`]: retry a check until it reports the wanted state or times out.
//! * [`wait`]: the waiting operations built on the pieces above.
//! * [`search`]: sequential free-port search over a range.

pub mod aliases;
pub mod command;
pub mod polling;
pub mod probe;
pub mod search;
pub mod wait;

pub use aliases::{external_ipv4_addresses, local_host_aliases};
pub use probe::{is_port_in_use, is_port_in_use_ex};
pub use search::find_free_ports;
pub use wait::{
    wait_for_port_closed, wait_for_port_open, wait_for_port_open_via_os, wait_for_port_status,
};
