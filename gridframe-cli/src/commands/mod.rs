pub(crate) mod config;
pub(crate) mod consoles;
pub(crate) mod process;
pub(crate) mod queue;

use std::io::{BufRead, Write};

use gridframe_scraper::{ProcessOptions, Settings};

use crate::cli_types::RunArgs;
use crate::error::CliError;

impl RunArgs {
    /// Merge flags over the effective settings. Flags always win.
    pub(crate) fn resolve(&self, settings: &Settings) -> ProcessOptions {
        let mut options = ProcessOptions::new(
            self.api_key
                .clone()
                .unwrap_or_else(|| settings.api_key().to_string()),
            self.console
                .clone()
                .unwrap_or_else(|| settings.console().to_string()),
            self.output.clone().unwrap_or_else(|| settings.output_root()),
            self.overlays
                .clone()
                .unwrap_or_else(|| settings.overlays_root()),
        );
        options.write_log = !self.no_log;
        options
    }
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
pub(crate) fn prompt_line(
    input: &mut impl BufRead,
    prompt: &str,
) -> Result<Option<String>, CliError> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Hide all but the first two characters of a secret.
pub(crate) fn mask_value(s: &str) -> String {
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), Some(_)) => format!("{a}{b}****"),
        _ => "****".to_string(),
    }
}
