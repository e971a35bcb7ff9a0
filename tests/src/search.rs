use portprobe_common::PortError;
use portprobe_common::network::port::FreePortQuery;
use portprobe_core::find_free_ports;

use crate::util::{hold, random_base};

#[tokio::test]
async fn finds_distinct_free_ports_in_range() {
    let base = random_base(50);
    let _held = hold(base + 1).await;

    let query = FreePortQuery::new(base, base + 50).count(3);
    let ports = find_free_ports(query, "0.0.0.0").await.unwrap();

    assert_eq!(ports.len(), 3);
    assert!(ports.windows(2).all(|w| w[0] < w[1]));
    assert!(ports.iter().all(|p| (base..=base + 50).contains(p)));
    assert!(!ports.contains(&(base + 1)));
}

#[tokio::test]
async fn consecutive_search_skips_over_held_port() {
    let base = random_base(50);
    let _held = hold(base + 2).await;

    let query = FreePortQuery::new(base, base + 50).count(3).consecutive(true);
    let ports = find_free_ports(query, "0.0.0.0").await.unwrap();

    assert_eq!(ports.len(), 3);
    assert!(ports.windows(2).all(|w| w[1] == w[0] + 1));
    assert!(!ports.contains(&(base + 2)));
    assert!(ports[0] > base + 2);
}

#[tokio::test]
async fn exhausted_range_is_insufficient() {
    let base = random_base(1);
    let query = FreePortQuery::new(base, base + 1).count(5);
    let result = find_free_ports(query, "0.0.0.0").await;

    match result {
        Err(PortError::InsufficientPorts { found, needed }) => {
            assert!(found < 5);
            assert_eq!(needed, 5);
        }
        other => panic!("expected InsufficientPorts, got {other:?}"),
    }
}

#[tokio::test]
#[allow(deprecated)]
async fn legacy_callback_receives_the_ports() {
    use portprobe_core::search::find_free_ports_with_callback;

    let base = random_base(20);
    let mut seen: Vec<u16> = Vec::new();
    let query = FreePortQuery::new(base, base + 20).count(2);
    let ports = find_free_ports_with_callback(query, "0.0.0.0", |found| seen.extend_from_slice(found))
        .await
        .unwrap();

    assert_eq!(seen, ports);
}
