//! Error types for the scport-core library.

use thiserror::Error;

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating the client process and its API port.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command or obtain its output.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// The process was found but none of its loopback ports answered the probe.
    #[error("no working port found")]
    NoWorkingPort,

    /// Failed to build or drive the HTTP probe client.
    #[error("Probe error: {0}")]
    Probe(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
