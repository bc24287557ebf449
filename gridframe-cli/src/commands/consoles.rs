use std::path::PathBuf;

use gridframe_core::is_console_selected;
use gridframe_scraper::Settings;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// List consoles that have an overlay frame.
pub(crate) fn run_consoles(overlays: Option<PathBuf>) {
    let settings = Settings::load_effective();
    let root = overlays.unwrap_or_else(|| settings.overlays_root());
    let consoles = gridframe_overlay::list_consoles(&root);

    log::info!(
        "Consoles in {}:",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("");
    print_console_list(&consoles, settings.console());
}

/// Print a console list, marking `selected`. Sentinel entries are shown as a warning.
pub(crate) fn print_console_list(consoles: &[String], selected: &str) {
    for console in consoles {
        if !is_console_selected(console) {
            log::warn!(
                "  {} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                console,
            );
        } else if console == selected {
            log::info!(
                "  {} {}",
                "*".if_supports_color(Stdout, |t| t.green()),
                console.if_supports_color(Stdout, |t| t.bold()),
            );
        } else {
            log::info!("    {}", console);
        }
    }
}
