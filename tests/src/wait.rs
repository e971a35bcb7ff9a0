use std::time::Duration;

use portprobe_common::config::PollingConfig;
use portprobe_core::{wait_for_port_closed, wait_for_port_open, wait_for_port_status};
use tokio::time::{Instant, sleep};

use crate::util::{ephemeral_port, hold};

#[tokio::test]
async fn zero_budget_resolves_when_already_busy() {
    let port = ephemeral_port().await;
    let _listener = hold(port).await;

    let result = wait_for_port_status(port, "127.0.0.1", true, false, PollingConfig::from_millis(100, 0)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn zero_budget_times_out_when_free() {
    let port = ephemeral_port().await;
    let started = Instant::now();

    let result = wait_for_port_status(port, "127.0.0.1", true, false, PollingConfig::from_millis(100, 0)).await;
    assert!(result.unwrap_err().is_timeout());
    // One probe, no retry delay.
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn waits_for_port_that_opens_later() {
    let port = ephemeral_port().await;
    let server = tokio::spawn(async move {
        sleep(Duration::from_millis(150)).await;
        let listener = hold(port).await;
        sleep(Duration::from_millis(2_000)).await;
        drop(listener);
    });

    let result = wait_for_port_open(port, "127.0.0.1", false, PollingConfig::from_millis(50, 1_000)).await;
    assert!(result.is_ok(), "expected port to open, got {result:?}");
    server.abort();
}

#[tokio::test]
async fn alias_wait_sees_port_opened_on_loopback() {
    let port = ephemeral_port().await;
    let server = tokio::spawn(async move {
        sleep(Duration::from_millis(100)).await;
        let listener = hold(port).await;
        sleep(Duration::from_millis(2_000)).await;
        drop(listener);
    });

    let result = wait_for_port_open(port, "0.0.0.0", true, PollingConfig::from_millis(25, 1_000)).await;
    assert!(result.is_ok(), "expected port to open, got {result:?}");
    server.abort();
}

#[tokio::test]
async fn waits_for_port_to_close() {
    let port = ephemeral_port().await;
    let listener = hold(port).await;
    let release = tokio::spawn(async move {
        sleep(Duration::from_millis(100)).await;
        drop(listener);
    });

    let result = wait_for_port_closed(port, "127.0.0.1", true, PollingConfig::from_millis(20, 1_000)).await;
    assert!(result.is_ok(), "expected port to close, got {result:?}");
    release.await.unwrap();
}

#[tokio::test]
async fn close_wait_times_out_while_held() {
    let port = ephemeral_port().await;
    let _listener = hold(port).await;

    let result = wait_for_port_closed(port, "127.0.0.1", false, PollingConfig::from_millis(20, 100)).await;
    assert!(result.unwrap_err().is_timeout());
}
