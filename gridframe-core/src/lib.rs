//! Domain types shared by every gridframe crate.
//!
//! Nothing in here performs I/O: the queue, the records returned by the
//! metadata service, per-item run results and the validation errors that
//! stop a run before it starts.

pub mod error;
pub mod game;
pub mod queue;
pub mod result;

pub use error::ValidationError;
pub use game::{GameId, GameRecord, IconCandidate};
pub use queue::Queue;
pub use result::RunResult;

/// Required icon edge length in pixels. Candidates of any other size are discarded.
pub const ICON_SIZE: u32 = 1024;

/// File name of the frame asset inside each console folder.
pub const OVERLAY_FILE_NAME: &str = "overlay.png";

/// Sentinel shown when the overlays folder holds no usable console.
pub const NO_CONSOLES_FOUND: &str = "No consoles found";

/// Sentinel shown before the user has picked a console.
pub const SELECT_CONSOLE: &str = "Select Console";

/// Returns true if `name` is one of the "no selection" placeholder values.
pub fn is_sentinel_console(name: &str) -> bool {
    name == NO_CONSOLES_FOUND || name == SELECT_CONSOLE
}

/// Returns true if `name` is a usable console selection (non-blank and not a sentinel).
pub fn is_console_selected(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !is_sentinel_console(name)
}
