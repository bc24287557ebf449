//! Runs the queue: search, list icons, download, composite, save.
//!
//! Items are processed strictly one after another. A failure in one item is
//! recorded in its [`RunResult`] and never stops the rest of the queue.

use std::path::{Path, PathBuf};

use gridframe_core::{Queue, RunResult, ValidationError, is_console_selected};
use gridframe_overlay::{composite, decode_icon, save_png};
use tokio::sync::mpsc;

use crate::error::ScrapeError;
use crate::run_log::{LogEntry, RunLog, log_file_name};
use crate::source::IconSource;

/// Options for a processing run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Credential for the metadata service
    pub api_key: String,
    /// Selected console; names the overlay folder and the output subfolder
    pub console: String,
    /// Finished icons go to `<output_root>/<console>/`
    pub output_root: PathBuf,
    /// Frames are read from `<overlays_root>/<console>/overlay.png`
    pub overlays_root: PathBuf,
    /// Write a run log file into the output root
    pub write_log: bool,
}

impl ProcessOptions {
    pub fn new(
        api_key: impl Into<String>,
        console: impl Into<String>,
        output_root: impl Into<PathBuf>,
        overlays_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            console: console.into().trim().to_string(),
            output_root: output_root.into(),
            overlays_root: overlays_root.into(),
            write_log: true,
        }
    }

    /// The console name with surrounding whitespace removed; used for every path.
    pub fn console(&self) -> &str {
        self.console.trim()
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Validation passed; `total` items will be processed.
    Started { total: usize },
    /// An item has started.
    ItemStarted {
        index: usize,
        total: usize,
        query: String,
    },
    /// The search resolved the item to a game.
    ItemFound { index: usize, game_name: String },
    /// Downloading the selected icon.
    ItemDownloading { index: usize },
    /// Applying the console overlay.
    ItemCompositing { index: usize },
    /// The item is finished, successfully or not.
    ItemFinished {
        index: usize,
        query: String,
        result: RunResult,
    },
    /// The run log was written.
    LogWritten { path: PathBuf },
    /// All items processed.
    Done { processed: usize, total: usize },
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunReport {
    pub log: RunLog,
    pub processed: usize,
    pub total: usize,
    pub log_file: Option<PathBuf>,
}

impl RunReport {
    /// The completion message shown at the end of a run.
    pub fn completion_message(&self) -> String {
        format!("Processed {} of {} games", self.processed, self.total)
    }
}

/// What happened to one item, plus the name the search resolved it to.
struct ItemOutcome {
    game_name: Option<String>,
    result: RunResult,
}

impl ItemOutcome {
    fn new(game_name: Option<&str>, result: RunResult) -> Self {
        Self {
            game_name: game_name.map(str::to_string),
            result,
        }
    }
}

/// Reject a run that cannot start. No I/O happens here.
pub fn validate(queue: &Queue, api_key: &str, console: &str) -> Result<(), ValidationError> {
    if queue.is_empty() {
        return Err(ValidationError::EmptyQueue);
    }
    if api_key.trim().is_empty() {
        return Err(ValidationError::MissingApiKey);
    }
    if !is_console_selected(console) {
        return Err(ValidationError::NoConsoleSelected);
    }
    Ok(())
}

/// Output location for a resolved game: `<output_root>/<console>/<name>.png`.
pub fn output_path(output_root: &Path, console: &str, game_name: &str) -> PathBuf {
    output_root
        .join(console)
        .join(format!("{}.png", output_file_stem(game_name)))
}

/// File stem for a game name. Only characters that would move the file out
/// of its console folder are replaced.
pub fn output_file_stem(game_name: &str) -> String {
    game_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Process every queue entry in order.
///
/// Returns `Err` only when validation fails, before any request is made.
/// The queue is left untouched.
pub async fn process_queue<S: IconSource>(
    source: &S,
    queue: &Queue,
    options: &ProcessOptions,
    events: mpsc::UnboundedSender<ProcessEvent>,
) -> Result<RunReport, ValidationError> {
    validate(queue, &options.api_key, options.console())?;

    let total = queue.len();
    let _ = events.send(ProcessEvent::Started { total });
    log::debug!(
        "Processing {} games for {} into {}",
        total,
        options.console(),
        options.output_root.display()
    );

    let mut log = RunLog::new(options.console());
    let mut processed = 0usize;

    for (index, query) in queue.iter().enumerate() {
        let _ = events.send(ProcessEvent::ItemStarted {
            index,
            total,
            query: query.to_string(),
        });

        let outcome = process_single_game(source, options, index, query, &events).await;
        processed += 1;

        let _ = events.send(ProcessEvent::ItemFinished {
            index,
            query: query.to_string(),
            result: outcome.result.clone(),
        });
        log.add(LogEntry {
            index,
            query: query.to_string(),
            game_name: outcome.game_name,
            result: outcome.result,
        });
    }

    let log_file = if options.write_log {
        write_run_log(&log, &options.output_root, &events)
    } else {
        None
    };

    let _ = events.send(ProcessEvent::Done { processed, total });

    Ok(RunReport {
        log,
        processed,
        total,
        log_file,
    })
}

/// Run one item through every step. Errors that escape a step are caught
/// here and become [`RunResult::Error`].
async fn process_single_game<S: IconSource>(
    source: &S,
    options: &ProcessOptions,
    index: usize,
    query: &str,
    events: &mpsc::UnboundedSender<ProcessEvent>,
) -> ItemOutcome {
    let mut game_name = None;
    match try_process_game(source, options, index, query, events, &mut game_name).await {
        Ok(result) => ItemOutcome::new(game_name.as_deref(), result),
        Err(e) => {
            log::warn!("Error processing \"{}\": {}", query, e);
            ItemOutcome::new(game_name.as_deref(), RunResult::Error(e.to_string()))
        }
    }
}

async fn try_process_game<S: IconSource>(
    source: &S,
    options: &ProcessOptions,
    index: usize,
    query: &str,
    events: &mpsc::UnboundedSender<ProcessEvent>,
    game_name: &mut Option<String>,
) -> Result<RunResult, ScrapeError> {
    let games = source.search(query).await;
    let Some(game) = games.into_iter().next() else {
        log::debug!("No match for \"{}\"", query);
        return Ok(RunResult::NotFound);
    };
    *game_name = Some(game.name.clone());
    let _ = events.send(ProcessEvent::ItemFound {
        index,
        game_name: game.name.clone(),
    });

    let icons = source.list_icons(&game.id).await;
    let Some(icon) = icons.into_iter().next() else {
        log::debug!("No icons for \"{}\" (id {})", game.name, game.id);
        return Ok(RunResult::NoIconsAvailable);
    };

    let _ = events.send(ProcessEvent::ItemDownloading { index });
    let bytes = match source.download(&icon.url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Download of {} failed: {}", icon.url, e);
            return Ok(RunResult::DownloadFailed);
        }
    };
    let base = match decode_icon(&bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Could not decode {}: {}", icon.url, e);
            return Ok(RunResult::DownloadFailed);
        }
    };
    drop(bytes);

    let _ = events.send(ProcessEvent::ItemCompositing { index });
    let result = match composite(base, options.console(), &options.overlays_root) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Overlay error for \"{}\": {}", game.name, e);
            return Ok(RunResult::OverlayFailed);
        }
    };

    let path = output_path(&options.output_root, options.console(), &game.name);
    save_png(&result, &path).map_err(|source| ScrapeError::Write {
        path: path.clone(),
        source,
    })?;
    log::debug!("Saved {}", path.display());

    Ok(RunResult::Saved(path))
}

fn write_run_log(
    log: &RunLog,
    output_root: &Path,
    events: &mpsc::UnboundedSender<ProcessEvent>,
) -> Option<PathBuf> {
    let path = output_root.join(log_file_name(chrono::Local::now()));
    let written = std::fs::create_dir_all(output_root).and_then(|_| log.write_to_file(&path));
    match written {
        Ok(()) => {
            let _ = events.send(ProcessEvent::LogWritten { path: path.clone() });
            Some(path)
        }
        Err(e) => {
            log::warn!("Failed to write run log {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
