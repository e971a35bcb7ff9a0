use portprobe_core::probe::{self, merge_alias_results};
use portprobe_core::{is_port_in_use, is_port_in_use_ex, local_host_aliases};
use portprobe_common::network::port::{PortStatus, ProbeStrategy};

use crate::util::{ephemeral_port, hold};

#[tokio::test]
async fn held_port_is_in_use_until_released() {
    let port = ephemeral_port().await;
    let listener = hold(port).await;

    assert!(is_port_in_use(port, "127.0.0.1").await.unwrap());

    drop(listener);
    assert!(!is_port_in_use(port, "127.0.0.1").await.unwrap());
}

#[tokio::test]
async fn alias_fan_out_sees_port_held_on_one_alias() {
    let port = ephemeral_port().await;
    let listener = hold(port).await;

    // The host argument is superseded by the alias list.
    assert!(is_port_in_use_ex(port, "ignored").await.unwrap());

    drop(listener);
    assert!(!is_port_in_use_ex(port, "ignored").await.unwrap());
}

#[tokio::test]
async fn every_alias_is_reported_individually() {
    let port = ephemeral_port().await;
    let _listener = hold(port).await;

    let mut results = Vec::new();
    for alias in local_host_aliases().iter() {
        let host = alias.to_string();
        results.push(probe::probe(ProbeStrategy::Bind, port, &host).await);
    }
    assert!(results.iter().any(|r| matches!(r, Ok(PortStatus::Busy))));
    assert_eq!(merge_alias_results(results).unwrap(), PortStatus::Busy);
}
