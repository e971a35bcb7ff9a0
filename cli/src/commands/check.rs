use colored::*;
use portprobe_core::probe;
use tracing::{info, warn};

pub async fn check(port: u16, host: &str, aliases: bool) -> anyhow::Result<()> {
    let busy = if aliases {
        probe::is_port_in_use_ex(port, host).await?
    } else {
        probe::probe_port(port, host).await?.is_busy()
    };

    let target = if aliases {
        format!("port {port} (all loopback aliases)")
    } else {
        format!("{host}:{port}")
    };

    if busy {
        warn!("{target} is {}", "busy".yellow().bold());
    } else {
        info!("{target} is {}", "free".green().bold());
    }
    Ok(())
}
