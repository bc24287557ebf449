use std::fmt;
use std::path::PathBuf;

/// Outcome of pushing one queue item through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// Composited icon written to this path
    Saved(PathBuf),
    /// The search returned no game
    NotFound,
    /// The game has no 1024x1024 icon
    NoIconsAvailable,
    /// The icon could not be downloaded or decoded
    DownloadFailed,
    /// The overlay could not be applied
    OverlayFailed,
    /// Anything else, including failure to write the output file
    Error(String),
}

impl RunResult {
    /// Short tag used in the run log file.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Saved(_) => "OK",
            Self::NotFound => "NOT FOUND",
            Self::NoIconsAvailable => "NO ICONS",
            Self::DownloadFailed => "DOWNLOAD FAILED",
            Self::OverlayFailed => "OVERLAY FAILED",
            Self::Error(_) => "ERROR",
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "Saved to {}", path.display()),
            Self::NotFound => write!(f, "Not found"),
            Self::NoIconsAvailable => write!(f, "No icons available"),
            Self::DownloadFailed => write!(f, "Download failed"),
            Self::OverlayFailed => write!(f, "Overlay failed"),
            Self::Error(message) => write!(f, "Error: {}", message),
        }
    }
}
