//! Error types for the tdmaze crate

use thiserror::Error;

use crate::agent::Action;

/// Main error type for the tdmaze crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported exploration strategy '{name}'. Expected one of: {expected}")]
    UnsupportedStrategy { name: String, expected: String },

    #[error("unsupported update rule '{name}'. Expected one of: {expected}")]
    UnsupportedUpdateRule { name: String, expected: String },

    #[error("dead end at ({x}, {y}): no valid actions available")]
    DeadEnd { x: usize, y: usize },

    #[error("blocked move: action '{action}' is not valid at ({x}, {y})")]
    BlockedMove { action: Action, x: usize, y: usize },

    #[error("cell ({x}, {y}) is out of bounds for a {width}x{height} maze")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("invalid maze description at line {line}: {message}")]
    InvalidMaze { line: usize, message: String },

    #[error("maze has no cells")]
    EmptyMaze,

    #[error("no terminal cell is reachable from start ({x}, {y})")]
    UnreachableTerminal { x: usize, y: usize },

    #[error("value table covers {got} states but the maze has {expected}")]
    TableMismatch { expected: usize, got: usize },

    #[error("SARSA update requires the next action on a non-terminal transition")]
    MissingNextAction,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
