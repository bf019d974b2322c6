//! Error type returned by [`Group::dispatch`](crate::Group::dispatch).

use clap::error::ErrorKind;
use thiserror::Error;

/// Errors that can surface while dispatching an argument vector.
#[derive(Debug, Error)]
pub enum Error {
    /// Usage error or help screen produced by clap.
    ///
    /// Help requests travel this way too (kind [`ErrorKind::DisplayHelp`]) so the
    /// caller decides when to print and exit.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The group's init hook failed after the arguments parsed.
    #[error("initialization failed: {0:#}")]
    Init(anyhow::Error),

    /// A leaf handler returned an error; it is passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),

    /// A handler declares positional arguments clap cannot parse in that order.
    #[error("invalid arguments for command `{command}`: {reason}")]
    Layout { command: String, reason: String },

    /// The parser resolved a command missing from the registry.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Result type for dispatch operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// True when this is a help screen rather than a failure.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Usage(err) if err.kind() == ErrorKind::DisplayHelp)
    }

    /// Process exit code matching clap's conventions for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }
}
