//! Error type and parser status.
//!
//! Every failing operation returns an [`Error`] and also records it on the
//! parser, so callers that only hold the parser can inspect [`Status`] later.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Growing the registry or token list failed. Carries no message so the
    /// error path itself never allocates.
    #[error("allocation failure")]
    AllocationFailure,

    /// Malformed or duplicate registration, bad short name, or a value that
    /// does not fit the option it was given to.
    #[error("{0}")]
    InvalidValue(String),

    /// Unrecognized long or short option.
    #[error("{0}")]
    UnknownArgument(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidValue(msg.into())
    }

    pub(crate) fn unknown(msg: impl Into<String>) -> Self {
        Error::UnknownArgument(msg.into())
    }

    /// Status code corresponding to this error.
    pub fn status(&self) -> Status {
        match self {
            Error::AllocationFailure => Status::AllocationFailure,
            Error::InvalidValue(_) => Status::InvalidValue,
            Error::UnknownArgument(_) => Status::UnknownArgument,
        }
    }

    /// Human-readable message, if the error carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::AllocationFailure => None,
            Error::InvalidValue(msg) | Error::UnknownArgument(msg) => Some(msg),
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::AllocationFailure
    }
}

/// Outcome of the most recent mutating operation on a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ok,
    AllocationFailure,
    InvalidValue,
    UnknownArgument,
}
