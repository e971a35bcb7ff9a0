//! # Polling Engine
//!
//! Repeats a single-shot check until it reports the wanted state.
//!
//! The first attempt always happens, whatever the budget: a zero timeout
//! means "check exactly once". Hard errors end the loop immediately; only a
//! wrong-state observation is retried. The timeout is checked between
//! attempts, never preemptively, so a slow check can overrun it.

use std::future::Future;

use portprobe_common::config::PollingConfig;
use portprobe_common::error::PortError;
use portprobe_common::network::port::PortStatus;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

/// Runs `check` until it returns `desired` or `polling.timeout` has elapsed.
///
/// `port` is only used to label the timeout error.
pub async fn poll_until<F, Fut>(
    port: u16,
    desired: PortStatus,
    polling: PollingConfig,
    mut check: F,
) -> Result<(), PortError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PortStatus, PortError>>,
{
    let retry_interval = polling.effective_retry_interval();
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let status = check().await?;
        if status == desired {
            debug!("port {port} is {status} after {attempts} attempt(s)");
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= polling.timeout {
            debug!("port {port} still {status} after {elapsed:?}, giving up");
            return Err(PortError::Timeout {
                port,
                desired,
                elapsed,
            });
        }

        trace!("port {port} is {status}, retrying in {retry_interval:?} (elapsed {elapsed:?})");
        sleep(retry_interval).await;
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
