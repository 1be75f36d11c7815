//! `authselect-state` binary: parse arguments, set up logging, and dispatch
//! to a subcommand.
use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use authselect_state::cli::{Cli, Command};
use authselect_state::{commands, logging};

fn main() -> Result<()> {
    let args = Cli::parse();

    match &args.command {
        Command::Apply(opts) => {
            logging::init_subscriber(args.verbose, args.command.log_name());
            let log = logging::Logger::new(args.command.log_name());
            commands::apply::run(&args.global, opts, &log)
        }
        Command::Current => {
            logging::init_subscriber(args.verbose, args.command.log_name());
            let log = logging::Logger::new(args.command.log_name());
            commands::current::run(&args.global, &log)
        }
        Command::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "authselect-state",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
