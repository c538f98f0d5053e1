mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use terminal::{banner, logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let no_args: bool = std::env::args_os().len() <= 1;
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner();

    if no_args {
        banner::usage();
        return ExitCode::SUCCESS;
    }

    let cfg = commands.to_config();
    if cfg.verbose {
        print::print_status("Gordo is in a talkative mood right now");
    }

    match scan::scan(&cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            banner::usage();
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
