pub mod check;
pub mod find;
pub mod interfaces;
pub mod wait;

use clap::{ArgAction, Args, Parser, Subcommand};
use portprobe_common::config::DEFAULT_HOST;

#[derive(Parser)]
#[command(name = "portprobe")]
#[command(about = "Check, wait on and allocate TCP ports.")]
pub struct CommandLine {
    /// Always probe by connecting, even for local addresses
    #[arg(long, global = true)]
    pub force_client: bool,

    /// More output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report whether a port is in use
    #[command(alias = "c")]
    Check {
        port: u16,
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Check every loopback alias instead of just the host
        #[arg(long)]
        aliases: bool,
    },
    /// Find free ports in a range
    #[command(alias = "f")]
    Find {
        #[arg(long)]
        min: u16,
        #[arg(long)]
        max: u16,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Only accept a contiguous block
        #[arg(long)]
        consecutive: bool,
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
    },
    /// Wait for a port to open or close
    #[command(alias = "w")]
    Wait(WaitArgs),
    /// Show the external IPv4 addresses of this machine
    #[command(alias = "i")]
    Interfaces,
}

#[derive(Args)]
pub struct WaitArgs {
    pub port: u16,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Wait for the port to be released instead
    #[arg(long)]
    pub closed: bool,

    /// Probe only the given host, not every loopback alias
    #[arg(long)]
    pub no_aliases: bool,

    /// Ask the OS listing tools instead of touching the port
    #[arg(long, conflicts_with_all = ["closed", "no_aliases"])]
    pub os: bool,

    /// With --os, fail if no listing tool is installed
    #[arg(long, requires = "os")]
    pub no_fallback: bool,

    /// Milliseconds between attempts
    #[arg(long, default_value_t = 100)]
    pub retry: u64,

    /// Milliseconds before giving up (0 checks once)
    #[arg(long, default_value_t = 5000)]
    pub timeout: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
