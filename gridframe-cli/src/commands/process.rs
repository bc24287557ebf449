use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::runtime::Runtime;

use gridframe_core::{Queue, RunResult};
use gridframe_scraper::async_util::run_with_events;
use gridframe_scraper::{
    ProcessEvent, ProcessOptions, RunReport, Settings, SteamGridDbClient, process_queue, validate,
};

use crate::cli_types::RunArgs;
use crate::error::CliError;

/// Run the process command: queue names from args and file, then run once.
pub(crate) fn run_process(
    names: Vec<String>,
    file: Option<PathBuf>,
    run: RunArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let mut queue: Queue = names.iter().collect();
    if let Some(path) = file {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            CliError::other(format!("Could not read {}: {}", path.display(), e))
        })?;
        for line in text.lines() {
            queue.add(line);
        }
    }

    let settings = Settings::load_effective();
    let options = run.resolve(&settings);

    let rt = Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    execute_run(&rt, &queue, &options, quiet)?;
    Ok(())
}

/// Validate and run the queue against SteamGridDB, reporting each item as it finishes.
///
/// Shared by `process` and the interactive `queue` shell. Only validation
/// and client construction can fail; item failures are reported and counted.
pub(crate) fn execute_run(
    rt: &Runtime,
    queue: &Queue,
    options: &ProcessOptions,
    quiet: bool,
) -> Result<RunReport, CliError> {
    validate(queue, &options.api_key, options.console())?;
    gridframe_overlay::validate_console_selection(&options.overlays_root, options.console())?;

    let client = SteamGridDbClient::new(options.api_key.as_str())?;

    log::info!(
        "Processing {} games for {}",
        queue.len(),
        options.console().if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "Output: {}",
        options
            .output_root
            .join(options.console())
            .display()
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let report = rt.block_on(async {
        let mut view = ProgressView::new(quiet);
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ProcessEvent>();

        let result = run_with_events(
            process_queue(&client, queue, options, event_tx),
            event_rx,
            |e| view.handle(e),
        )
        .await;

        view.finish();
        result
    })?;

    print_summary(&report);
    Ok(report)
}

/// Spinner state for a run.
struct ProgressView {
    pb: ProgressBar,
    total: usize,
    current: String,
}

impl ProgressView {
    fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                    .expect("static pattern")
                    .tick_chars("/-\\|"),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        };
        Self {
            pb,
            total: 0,
            current: String::new(),
        }
    }

    fn step(&self, index: usize, msg: String) {
        self.pb
            .set_message(format!("[{}/{}] {}", index + 1, self.total, msg));
    }

    fn handle(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Started { total } => {
                self.total = total;
            }
            ProcessEvent::ItemStarted { index, total, query } => {
                self.total = total;
                self.step(index, format!("Searching {}", query));
                self.current = query;
            }
            ProcessEvent::ItemFound { index, game_name } => {
                self.step(index, format!("{} -> \"{}\"", self.current, game_name));
                self.current = game_name;
            }
            ProcessEvent::ItemDownloading { index } => {
                self.step(index, format!("Downloading icon for {}", self.current));
            }
            ProcessEvent::ItemCompositing { index } => {
                self.step(index, format!("Applying overlay to {}", self.current));
            }
            ProcessEvent::ItemFinished {
                index,
                query,
                result,
            } => {
                let total = self.total;
                self.pb
                    .suspend(|| print_result_line(index, total, &query, &result));
            }
            ProcessEvent::LogWritten { path } => {
                self.pb.suspend(|| {
                    log::info!(
                        "  Run log: {}",
                        path.display().if_supports_color(Stdout, |t| t.dimmed()),
                    )
                });
            }
            ProcessEvent::Done { .. } => {}
        }
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

fn print_result_line(index: usize, total: usize, query: &str, result: &RunResult) {
    let position = format!("[{}/{}]", index + 1, total);
    match result {
        RunResult::Saved(path) => log::info!(
            "  {} {} {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            position.if_supports_color(Stdout, |t| t.dimmed()),
            query,
            format!("-> {}", path.display()).if_supports_color(Stdout, |t| t.dimmed()),
        ),
        RunResult::NotFound | RunResult::NoIconsAvailable => log::warn!(
            "  {} {} {}: {}",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            position,
            query,
            result,
        ),
        _ => log::warn!(
            "  {} {} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            position,
            query,
            result,
        ),
    }
}

fn print_summary(report: &RunReport) {
    let summary = report.log.summary();
    log::info!("");
    log::info!(
        "{}",
        report
            .completion_message()
            .if_supports_color(Stdout, |t| t.bold()),
    );
    if summary.saved > 0 {
        log::info!(
            "  {} {} saved",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.saved,
        );
    }
    if summary.failed() > 0 {
        log::warn!(
            "  {} {} failed (not found: {}, no icons: {}, download: {}, overlay: {}, other: {})",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed(),
            summary.not_found,
            summary.no_icons,
            summary.download_failed,
            summary.overlay_failed,
            summary.errors,
        );
    }
}
