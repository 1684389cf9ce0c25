//! Errors raised synchronously at call boundaries.
//!
//! Assertion-style failures are not errors; they are collected in a
//! [`Report`](crate::report::Report) so every check gets to run.

/// Everything that can go wrong when a helper is called with bad input.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed constructor or call argument (wrong shape or kind)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `trigger` was called with a name missing from the event table
    #[error("trigger called with an event name which isn't supported by the event table: '{0}'")]
    UnsupportedEvent(String),

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
