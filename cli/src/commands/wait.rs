use std::time::Instant;

use colored::*;
use portprobe_common::config::Config;
use portprobe_core::{wait_for_port_open_via_os, wait_for_port_status};
use tracing::info;

use super::WaitArgs;

pub async fn wait(args: &WaitArgs, cfg: &Config) -> anyhow::Result<()> {
    let start_time = Instant::now();

    if args.os {
        wait_for_port_open_via_os(args.port, cfg.polling, !args.no_fallback).await?;
    } else {
        wait_for_port_status(
            args.port,
            &args.host,
            !args.closed,
            !args.no_aliases,
            cfg.polling,
        )
        .await?;
    }

    let state = if args.closed { "closed" } else { "open" };
    let total_time: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64())
        .bold()
        .yellow();
    info!("Port {} is {state} after {total_time}", args.port.to_string().bold());
    Ok(())
}
