mod commands;
mod terminal;

use commands::{CommandLine, Commands, check, find, interfaces, wait};
use portprobe_common::config::{Config, PollingConfig};
use portprobe_common::network::port::FreePortQuery;
use terminal::{logging, print};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let polling = match &commands.command {
        Commands::Wait(args) => PollingConfig::from_millis(args.retry, args.timeout),
        _ => PollingConfig::default(),
    };
    let cfg = Config {
        force_client: commands.force_client,
        polling,
    };
    cfg.apply();

    match commands.command {
        Commands::Check {
            port,
            host,
            aliases,
        } => check::check(port, &host, aliases).await,
        Commands::Find {
            min,
            max,
            count,
            consecutive,
            host,
        } => {
            print::header("searching for free ports");
            let query = FreePortQuery::new(min, max)
                .count(count)
                .consecutive(consecutive);
            find::find(query, &host).await
        }
        Commands::Wait(args) => {
            print::header("waiting on port");
            wait::wait(&args, &cfg).await
        }
        Commands::Interfaces => {
            print::header("external interfaces");
            interfaces::interfaces();
            Ok(())
        }
    }
}
