//! # Waiting On Ports
//!
//! Every wait is the polling engine driving one kind of [`StatusCheck`].

use portprobe_common::config::{DEFAULT_HOST, PollingConfig};
use portprobe_common::error::PortError;
use portprobe_common::network::port::{PortStatus, validate_port};
use tracing::debug;

use crate::command::{self, CommandRunner, OsProbeCommand, PreparedCommand, SystemRunner};
use crate::polling::poll_until;
use crate::probe;

/// The single-shot check a wait repeats.
pub enum StatusCheck<'a> {
    /// One host, probed with the strategy selected for it.
    Host(&'a str),
    /// Every loopback alias; busy if any of them is.
    AnyAlias,
    /// The output of an OS listing command.
    Command {
        prepared: &'a PreparedCommand,
        runner: &'a dyn CommandRunner,
    },
}

impl StatusCheck<'_> {
    pub async fn run(&self, port: u16) -> Result<PortStatus, PortError> {
        match self {
            StatusCheck::Host(host) => probe::probe_port(port, host).await,
            StatusCheck::AnyAlias => probe::probe_any_alias(port).await,
            StatusCheck::Command { prepared, runner } => {
                command::probe_via_command(prepared, *runner).await
            }
        }
    }
}

/// Waits until `port` is busy (`desired_busy`) or free.
///
/// With `check_aliases` every loopback alias is probed and `host` is ignored.
/// At least one probe always runs, even with a zero timeout.
pub async fn wait_for_port_status(
    port: u16,
    host: &str,
    desired_busy: bool,
    check_aliases: bool,
    polling: PollingConfig,
) -> Result<(), PortError> {
    validate_port(port)?;
    let desired = PortStatus::from_busy(desired_busy);
    let check = if check_aliases {
        StatusCheck::AnyAlias
    } else {
        StatusCheck::Host(host)
    };

    debug!(
        "waiting for port {port} to become {desired} (aliases: {check_aliases}, {:?} budget)",
        polling.timeout
    );
    poll_until(port, desired, polling, || check.run(port)).await
}

pub async fn wait_for_port_open(
    port: u16,
    host: &str,
    check_aliases: bool,
    polling: PollingConfig,
) -> Result<(), PortError> {
    wait_for_port_status(port, host, true, check_aliases, polling).await
}

pub async fn wait_for_port_closed(
    port: u16,
    host: &str,
    check_aliases: bool,
    polling: PollingConfig,
) -> Result<(), PortError> {
    wait_for_port_status(port, host, false, check_aliases, polling).await
}

/// Waits for something to listen on `port`, asking the OS instead of touching the port.
///
/// When no listing tool is available and `fallback` is set, this degrades to
/// [`wait_for_port_open`] over every alias of the default host.
pub async fn wait_for_port_open_via_os(
    port: u16,
    polling: PollingConfig,
    fallback: bool,
) -> Result<(), PortError> {
    wait_via_command(
        command::os_probe_command(),
        &SystemRunner,
        port,
        polling,
        fallback,
    )
    .await
}

async fn wait_via_command(
    command: Option<&OsProbeCommand>,
    runner: &dyn CommandRunner,
    port: u16,
    polling: PollingConfig,
    fallback: bool,
) -> Result<(), PortError> {
    validate_port(port)?;

    let Some(command) = command else {
        if fallback {
            debug!("no OS probe command, falling back to socket probes");
            return wait_for_port_open(port, DEFAULT_HOST, true, polling).await;
        }
        return Err(PortError::CommandUnavailable);
    };

    let prepared = command.prepare(port)?;
    debug!(
        "waiting for port {port} via `{}` /{}/",
        prepared.command_line(),
        prepared.pattern
    );

    let check = StatusCheck::Command {
        prepared: &prepared,
        runner,
    };
    poll_until(port, PortStatus::Busy, polling, || check.run(port)).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::ScriptedRunner;
    use crate::command::{Platform, select_probe_command};
    use tokio::net::TcpListener;

    fn lsof() -> OsProbeCommand {
        select_probe_command(Platform::MacOs, |p| p == "lsof").unwrap()
    }

    fn ss() -> OsProbeCommand {
        select_probe_command(Platform::Other, |p| p == "ss").unwrap()
    }

    #[tokio::test]
    async fn command_wait_succeeds_on_listen_line() {
        let runner = ScriptedRunner::new(
            true,
            "node 1 dev 23u IPv4 0x1 0t0 TCP 127.0.0.1:3000 (LISTEN)\n",
        );
        let result = wait_via_command(
            Some(&lsof()),
            &runner,
            3000,
            PollingConfig::from_millis(1, 0),
            false,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn command_wait_times_out_when_nothing_listens() {
        let runner = ScriptedRunner::new(false, "");
        let result = wait_via_command(
            Some(&lsof()),
            &runner,
            3000,
            PollingConfig::from_millis(1, 5),
            false,
        )
        .await;
        assert!(result.unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn command_failure_ends_the_wait() {
        let runner = ScriptedRunner::new(false, "");
        let result = wait_via_command(
            Some(&ss()),
            &runner,
            3000,
            PollingConfig::from_millis(1, 1000),
            false,
        )
        .await;
        assert!(matches!(result, Err(PortError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn missing_command_without_fallback_fails() {
        let runner = ScriptedRunner::new(true, "");
        let result = wait_via_command(None, &runner, 3000, PollingConfig::default(), false).await;
        assert!(matches!(result, Err(PortError::CommandUnavailable)));
    }

    #[tokio::test]
    async fn missing_command_falls_back_to_socket_probes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let runner = ScriptedRunner::new(true, "");

        let result =
            wait_via_command(None, &runner, port, PollingConfig::from_millis(10, 0), true).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wait_rejects_port_zero() {
        let result = wait_for_port_open(0, "127.0.0.1", false, PollingConfig::default()).await;
        assert!(matches!(result, Err(PortError::InvalidPort(0))));
    }
}
