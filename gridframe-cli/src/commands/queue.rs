//! Interactive queue shell.
//!
//! Keeps a queue and a console selection for the whole session. Runs never
//! clear the queue, so the same list can be re-run after changing console.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::runtime::Runtime;

use gridframe_core::{Queue, is_console_selected};
use gridframe_overlay::{refresh_selection, validate_console_selection};
use gridframe_scraper::Settings;

use super::consoles::print_console_list;
use super::process::execute_run;
use super::prompt_line;
use crate::cli_types::RunArgs;
use crate::error::CliError;

/// A parsed shell line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Add(String),
    Remove(String),
    /// 1-based position as shown by `list`
    RemoveAt(usize),
    List,
    Clear,
    Console(Option<String>),
    Refresh,
    Run,
    Save,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub(crate) fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "add" | "a" => ShellCommand::Add(rest.to_string()),
        "remove" | "rm" => match rest.strip_prefix('#').and_then(|n| n.parse().ok()) {
            Some(n) => ShellCommand::RemoveAt(n),
            None => ShellCommand::Remove(rest.to_string()),
        },
        "list" | "ls" => ShellCommand::List,
        "clear" => ShellCommand::Clear,
        "console" => {
            if rest.is_empty() {
                ShellCommand::Console(None)
            } else {
                ShellCommand::Console(Some(rest.to_string()))
            }
        }
        "refresh" => ShellCommand::Refresh,
        "run" | "process" => ShellCommand::Run,
        "save" => ShellCommand::Save,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(word.to_string()),
    }
}

/// Run the interactive queue shell until `quit` or end of input.
pub(crate) fn run_queue_shell(run: RunArgs, quiet: bool) -> Result<(), CliError> {
    let rt = Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let settings = Settings::load_effective();
    let mut options = run.resolve(&settings);
    let mut queue = Queue::new();

    let (mut consoles, selected) = refresh_selection(&options.overlays_root, &options.console);
    options.console = selected;

    log::info!(
        "{}",
        "gridframe queue".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "Overlays: {}",
        options
            .overlays_root
            .display()
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log_found(&consoles);
    print_console_list(&consoles, &options.console);
    log::info!("Type 'help' for commands.");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        let prompt = format!("{}> ", options.console);
        let Some(line) = prompt_line(&mut input, &prompt)? else {
            break;
        };

        match parse_command(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Add(name) => {
                if queue.add(&name) {
                    log::info!("Added \"{}\" ({} queued)", name.trim(), queue.len());
                } else {
                    log::warn!("Usage: add <game name>");
                }
            }
            ShellCommand::Remove(name) => {
                if queue.remove(&name) {
                    log::info!("Removed \"{}\"", name);
                } else {
                    log::warn!("\"{}\" is not in the queue", name);
                }
            }
            ShellCommand::RemoveAt(n) => {
                match n.checked_sub(1).and_then(|i| queue.remove_at(i)) {
                    Some(name) => log::info!("Removed \"{}\"", name),
                    None => log::warn!("No entry #{} (queue has {})", n, queue.len()),
                }
            }
            ShellCommand::List => print_queue(&queue),
            ShellCommand::Clear => {
                queue.clear();
                log::info!("Queue cleared");
            }
            ShellCommand::Console(None) => print_console_list(&consoles, &options.console),
            ShellCommand::Console(Some(name)) => {
                match validate_console_selection(&options.overlays_root, &name) {
                    Ok(()) => {
                        log::info!("Console set to {}", name);
                        options.console = name;
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }
            ShellCommand::Refresh => {
                let (listed, selected) =
                    refresh_selection(&options.overlays_root, &options.console);
                consoles = listed;
                options.console = selected;
                log_found(&consoles);
                print_console_list(&consoles, &options.console);
            }
            ShellCommand::Run => {
                if let Err(e) = execute_run(&rt, &queue, &options, quiet) {
                    log::error!(
                        "{} {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        e,
                    );
                }
            }
            ShellCommand::Save => save_session(&run, &options.console),
            ShellCommand::Help => print_help(),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(word) => {
                log::warn!("Unknown command '{}'. Type 'help' for commands.", word);
            }
        }
    }

    Ok(())
}

fn log_found(consoles: &[String]) {
    let found = consoles.iter().filter(|c| is_console_selected(c)).count();
    log::info!("Found {} consoles", found);
}

fn print_queue(queue: &Queue) {
    if queue.is_empty() {
        log::info!("Queue is empty");
        return;
    }
    for (i, name) in queue.iter().enumerate() {
        log::info!(
            "  {} {}",
            format!("#{}", i + 1).if_supports_color(Stdout, |t| t.dimmed()),
            name,
        );
    }
}

/// Settings file contents for `save`: the session's console plus every value
/// given as a flag. Values that came from the environment are not written.
pub(crate) fn session_settings(mut file: Settings, run: &RunArgs, console: &str) -> Settings {
    file.selected_console = console.to_string();
    if let Some(key) = &run.api_key {
        file.api_key = key.trim().to_string();
    }
    if let Some(dir) = &run.output {
        file.output_folder = Some(dir.clone());
    }
    if let Some(dir) = &run.overlays {
        file.overlays_folder = Some(dir.clone());
    }
    file
}

fn save_session(run: &RunArgs, console: &str) {
    match session_settings(Settings::load(), run, console).save() {
        Ok(path) => log::info!(
            "{} Saved settings to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        ),
        Err(e) => log::warn!(
            "{} Failed to save settings: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        ),
    }
}

fn print_help() {
    log::info!("Commands:");
    log::info!("  add <name>        Queue a game name");
    log::info!("  remove <name>     Remove the first entry with this name");
    log::info!("  remove #<n>       Remove entry number n");
    log::info!("  list              Show the queue");
    log::info!("  clear             Empty the queue");
    log::info!("  console [name]    Show consoles, or select one");
    log::info!("  refresh           Re-scan the overlays folder");
    log::info!("  run               Process the queue");
    log::info!("  save              Remember the console and any flag values");
    log::info!("  quit              Leave the shell");
}
