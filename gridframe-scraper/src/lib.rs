pub mod async_util;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod run_log;
pub mod settings;
pub mod source;
pub mod types;

pub use client::SteamGridDbClient;
pub use error::ScrapeError;
pub use pipeline::{
    ProcessEvent, ProcessOptions, RunReport, output_path, process_queue, validate,
};
pub use run_log::{LogEntry, LogSummary, RunLog};
pub use settings::{SettingSource, SettingSources, Settings, setting_sources, settings_path};
pub use source::IconSource;
