//! Error types for muxplan.

use std::io;

use thiserror::Error;

/// Errors raised while building or loading a layout
#[derive(Debug, Error)]
pub enum Error {
    /// Pane lookup past the end of a window
    #[error("Pane {index} out of range for window {target} ({count} panes)")]
    PaneOutOfRange {
        /// Window target, e.g. `dev:1`
        target: String,
        index: usize,
        count: usize,
    },

    /// Window lookup past the end of a session
    #[error("Window {index} out of range for session {session} ({count} windows)")]
    WindowOutOfRange {
        session: String,
        index: usize,
        count: usize,
    },

    /// The sink rejected a command
    #[error("Failed to emit command: {0}")]
    Sink(#[source] io::Error),

    /// Invalid layout file contents
    #[error("Invalid layout: {0}")]
    Config(String),

    /// Layout file could not be parsed
    #[error("Failed to parse layout: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Layout file could not be read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
