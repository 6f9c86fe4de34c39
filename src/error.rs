//! Error types for the console
//!
//! Editing operations never fail: edits aimed at history are rejected as
//! no-ops and the command-line grammar is total. What remains are handler
//! failures (caught by the dispatcher and turned into text) and the I/O and
//! configuration failures of the terminal front end.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a command handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// An argument could not be used
    #[error("{0}")]
    InvalidArgument(String),

    /// The handler gave up for any other reason
    #[error("{0}")]
    Failed(String),
}

/// Configuration loading failure
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for `ConsoleConfig`
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value the console cannot use
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Front-end error type
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for front-end operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
