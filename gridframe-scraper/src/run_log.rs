use std::path::Path;

use chrono::{DateTime, Local};
use gridframe_core::RunResult;

/// The outcome of one queue item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Position in the queue when the run started
    pub index: usize,
    /// Name as typed into the queue
    pub query: String,
    /// Canonical name, when the search found the game
    pub game_name: Option<String>,
    pub result: RunResult,
}

/// Collects per-item results of a run and writes a log file.
#[derive(Debug, Default)]
pub struct RunLog {
    console: String,
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new(console: impl Into<String>) -> Self {
        Self {
            console: console.into(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.result {
                RunResult::Saved(_) => summary.saved += 1,
                RunResult::NotFound => summary.not_found += 1,
                RunResult::NoIconsAvailable => summary.no_icons += 1,
                RunResult::DownloadFailed => summary.download_failed += 1,
                RunResult::OverlayFailed => summary.overlay_failed += 1,
                RunResult::Error(_) => summary.errors += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        self.write_to_file_at(path, Local::now())
    }

    pub(crate) fn write_to_file_at(
        &self,
        path: &Path,
        when: DateTime<Local>,
    ) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Icon Run Log ===")?;
        writeln!(file, "Date: {}", when.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "Console: {}", self.console)?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Processed: {}", summary.total)?;
        writeln!(file, "Saved: {}", summary.saved)?;
        writeln!(file, "Not found: {}", summary.not_found)?;
        writeln!(file, "No icons: {}", summary.no_icons)?;
        writeln!(file, "Download failed: {}", summary.download_failed)?;
        writeln!(file, "Overlay failed: {}", summary.overlay_failed)?;
        writeln!(file, "Errors: {}", summary.errors)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match &entry.game_name {
                Some(name) if name != &entry.query => writeln!(
                    file,
                    "[{}] {} -> \"{}\": {}",
                    entry.result.tag(),
                    entry.query,
                    name,
                    entry.result
                )?,
                _ => writeln!(
                    file,
                    "[{}] {}: {}",
                    entry.result.tag(),
                    entry.query,
                    entry.result
                )?,
            }
        }

        Ok(())
    }
}

/// File name for a run log started at `when`.
pub fn log_file_name(when: DateTime<Local>) -> String {
    format!("gridframe-{}.log", when.format("%Y%m%d-%H%M%S"))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub total: usize,
    pub saved: usize,
    pub not_found: usize,
    pub no_icons: usize,
    pub download_failed: usize,
    pub overlay_failed: usize,
    pub errors: usize,
}

impl LogSummary {
    pub fn failed(&self) -> usize {
        self.total - self.saved
    }
}
