use colored::*;
use portprobe_common::network::port::FreePortQuery;
use portprobe_core::find_free_ports;
use tracing::info;

pub async fn find(query: FreePortQuery, host: &str) -> anyhow::Result<()> {
    let ports = find_free_ports(query, host).await?;

    let joined: String = ports
        .iter()
        .map(|port| port.to_string())
        .collect::<Vec<String>>()
        .join(", ");
    info!("Free: {}", joined.bold().green());
    Ok(())
}
