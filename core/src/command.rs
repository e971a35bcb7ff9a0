//! # OS Introspection Probe
//!
//! The least intrusive way to see whether something listens on a port: ask
//! the operating system. No sockets are opened; a platform listing tool is
//! run and its output is matched against a pattern built for the port.
//!
//! Tool choice, in order of preference:
//!
//! 1. `ss` (not on Windows or macOS),
//! 2. `netstat`,
//! 3. `lsof` (macOS only; the slowest but the most consistent there).
//!
//! The choice is made once per process. Only IPv4 listeners are recognised.

use std::env;
use std::io;
use std::sync::OnceLock;

use async_trait::async_trait;
use portprobe_common::error::PortError;
use portprobe_common::network::port::PortStatus;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, trace};

const PORT_PLACEHOLDER: &str = "{port}";

const SS_PATTERN: &str = r"LISTEN\s+[^\n]*:{port}\s+[^\s]+[^\n]*\n";
const NETSTAT_PATTERN: &str = r"[tT][cC][pP][^\n]*[:\.]{port}\s+[^\s]+\s+LISTEN[^\n]*\n";
const LSOF_PATTERN: &str = r"IPv4[^\n]+:{port}\s[^\n]*\(LISTEN\)[^\n]*\n";

static OS_PROBE_COMMAND: OnceLock<Option<OsProbeCommand>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTool {
    Ss,
    Netstat,
    Lsof,
}

impl ProbeTool {
    pub fn program(self) -> &'static str {
        match self {
            ProbeTool::Ss => "ss",
            ProbeTool::Netstat => "netstat",
            ProbeTool::Lsof => "lsof",
        }
    }

    /// `lsof` exits non-zero when nothing matches, which only means "not yet".
    fn tolerates_failure(self) -> bool {
        self == ProbeTool::Lsof
    }
}

/// A listing command and its output pattern, both still carrying `{port}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsProbeCommand {
    pub tool: ProbeTool,
    args: Vec<&'static str>,
    pattern: &'static str,
}

impl OsProbeCommand {
    fn new(tool: ProbeTool, platform: Platform) -> Self {
        let (args, pattern) = match (tool, platform) {
            (ProbeTool::Ss, _) => (vec!["-nlt"], SS_PATTERN),
            // tcp only lists IPv4 on Windows; elsewhere it has to be asked for.
            (ProbeTool::Netstat, Platform::Windows) => (vec!["-nap", "tcp"], NETSTAT_PATTERN),
            (ProbeTool::Netstat, _) => (vec!["-nap", "tcp", "-f", "inet"], NETSTAT_PATTERN),
            (ProbeTool::Lsof, _) => (
                vec!["-n", "-iTCP:{port}", "-sTCP:LISTEN"],
                LSOF_PATTERN,
            ),
        };
        Self {
            tool,
            args,
            pattern,
        }
    }

    pub fn args_for(&self, port: u16) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(PORT_PLACEHOLDER, &port.to_string()))
            .collect()
    }

    pub fn pattern_for(&self, port: u16) -> Result<Regex, PortError> {
        let pattern = self.pattern.replace(PORT_PLACEHOLDER, &port.to_string());
        Ok(Regex::new(&pattern)?)
    }

    /// Substitutes `port` everywhere and compiles the pattern.
    pub fn prepare(&self, port: u16) -> Result<PreparedCommand, PortError> {
        Ok(PreparedCommand {
            tool: self.tool,
            args: self.args_for(port),
            pattern: self.pattern_for(port)?,
        })
    }
}

/// A command ready to run for one port.
#[derive(Debug, Clone)]
pub struct PreparedCommand {
    pub tool: ProbeTool,
    pub args: Vec<String>,
    pub pattern: Regex,
}

impl PreparedCommand {
    pub fn command_line(&self) -> String {
        std::iter::once(self.tool.program().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Picks the listing tool for `platform` given what `exists` can find.
pub fn select_probe_command(
    platform: Platform,
    exists: impl Fn(&str) -> bool,
) -> Option<OsProbeCommand> {
    let is_unix_like = !matches!(platform, Platform::Windows | Platform::MacOs);

    if is_unix_like && exists(ProbeTool::Ss.program()) {
        Some(OsProbeCommand::new(ProbeTool::Ss, platform))
    } else if exists(ProbeTool::Netstat.program()) {
        Some(OsProbeCommand::new(ProbeTool::Netstat, platform))
    } else if platform == Platform::MacOs && exists(ProbeTool::Lsof.program()) {
        Some(OsProbeCommand::new(ProbeTool::Lsof, platform))
    } else {
        None
    }
}

/// Process-wide tool choice; `None` when no tool is available.
pub fn os_probe_command() -> Option<&'static OsProbeCommand> {
    OS_PROBE_COMMAND
        .get_or_init(|| {
            let selected = select_probe_command(Platform::current(), |program| {
                SystemRunner.exists(program)
            });
            debug!(?selected, "selected OS probe command");
            selected
        })
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
}

/// Runs external programs. Swappable so the parsing can be tested offline.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Whether `program` can be found on the search path.
    fn exists(&self, program: &str) -> bool;

    async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    fn exists(&self, program: &str) -> bool {
        let Some(paths) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(program);
            candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
        })
    }

    async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Runs `command` once and reads the port state from its output.
pub async fn probe_via_command(
    command: &PreparedCommand,
    runner: &dyn CommandRunner,
) -> Result<PortStatus, PortError> {
    let output = runner
        .run(command.tool.program(), &command.args)
        .await
        .map_err(|source| PortError::CommandSpawn {
            command: command.command_line(),
            source,
        })?;

    if !output.success && !command.tool.tolerates_failure() {
        return Err(PortError::CommandFailed {
            command: command.command_line(),
            code: output.code,
        });
    }

    match command.pattern.find(&output.stdout) {
        Some(hit) => {
            trace!("{} matched: {}", command.tool.program(), hit.as_str().trim_end());
            Ok(PortStatus::Busy)
        }
        None => Ok(PortStatus::Free),
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
