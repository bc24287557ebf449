//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gridframe")]
#[command(about = "Frame SteamGridDB icons with console overlays", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the values normally taken from settings and environment.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct RunArgs {
    /// Console folder to frame icons with (defaults to the saved selection)
    #[arg(short, long)]
    pub console: Option<String>,

    /// SteamGridDB API key (defaults to $STEAMGRIDDB_API_KEY or the settings file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Output folder; icons go to <output>/<console>/
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder containing <console>/overlay.png frames
    #[arg(long)]
    pub overlays: Option<PathBuf>,

    /// Disable the run log file
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Process game names into framed icons
    Process {
        /// Game names to queue, in order
        names: Vec<String>,

        /// Read additional names from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// List consoles that have an overlay frame
    Consoles {
        /// Folder containing <console>/overlay.png frames
        #[arg(long)]
        overlays: Option<PathBuf>,
    },

    /// Build and run a queue interactively
    Queue {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Manage saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Interactively edit settings
    Setup,

    /// Set a single setting
    Set {
        /// Setting to change
        key: SettingKey,

        /// New value (empty string clears it)
        value: String,
    },

    /// Print the settings file path
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SettingKey {
    #[value(name = "api-key", alias = "api_key")]
    ApiKey,
    Console,
    Output,
    Overlays,
}
