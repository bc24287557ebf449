use thiserror::Error;

/// Reasons a run is rejected before any item is attempted.
///
/// These are the only errors surfaced as blocking messages; everything that
/// goes wrong while processing an individual item becomes a [`crate::RunResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The queue has no entries
    #[error("Please add games first!")]
    EmptyQueue,

    /// The API credential is blank
    #[error("Please enter API key!")]
    MissingApiKey,

    /// No console picked, or a sentinel value is selected
    #[error("Please select a console!")]
    NoConsoleSelected,

    /// The console name is not in the registry
    #[error("Unknown console '{0}': no overlay found for it")]
    UnknownConsole(String),
}

impl ValidationError {
    /// Short heading for the message, as shown in a popup or error prefix.
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptyQueue => "Empty Queue",
            Self::MissingApiKey => "No API Key",
            Self::NoConsoleSelected => "No Console",
            Self::UnknownConsole(_) => "Unknown Console",
        }
    }
}
