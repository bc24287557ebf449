//! gridframe CLI
//!
//! Queue game names, fetch their SteamGridDB icons and frame them with a
//! console overlay.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Process { names, file, run } => {
            commands::process::run_process(names, file, run, cli.quiet)
        }
        Commands::Consoles { overlays } => {
            commands::consoles::run_consoles(overlays);
            Ok(())
        }
        Commands::Queue { run } => commands::queue::run_queue_shell(run, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show();
                Ok(())
            }
            ConfigAction::Setup => commands::config::run_config_setup(),
            ConfigAction::Set { key, value } => commands::config::run_config_set(key, value),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}
