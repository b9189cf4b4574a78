use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot open input file {path:?}")]
    MissingInputFile { path: String },
    #[error("Malformed board data: {reason}")]
    MalformedBoardData { reason: String },
    #[error("Malformed command {line:?}: {reason}")]
    MalformedCommand { line: String, reason: String },
    #[error("No board loaded, LOAD must come first")]
    NoBoardLoaded,
    #[error("Failed to write transcript")]
    Output(#[from] core::fmt::Error),
}

pub type Result<T> = core::result::Result<T, GameError>;
