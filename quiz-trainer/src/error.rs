//! Error types shared by the store, the handlers and the session loop.
//!
//! [`QuizError`] is the domain taxonomy: every variant is recovered at the
//! handler boundary and reported to the user. [`SessionError`] adds the two
//! conditions that end a session: a broken stream and a closed input.

use std::io;

use thiserror::Error;

/// Recoverable errors produced while executing a command.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A command that needs an id was given none.
    #[error("missing id parameter")]
    MissingParameter,

    /// The id argument could not be read as a number.
    #[error("id is not a number: '{0}'")]
    NotANumber(String),

    /// No quiz exists under the given id.
    #[error("no quiz with that id: {0}")]
    NotFound(i64),

    /// One message per field that failed validation.
    #[error("invalid quiz: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// An input line exceeded the accepted length.
    #[error("line too long (limit is {0} bytes)")]
    LineTooLong(usize),

    /// The backing store could not complete the operation.
    #[error("store error: {0}")]
    Store(String),
}

impl From<rusqlite::Error> for QuizError {
    fn from(err: rusqlite::Error) -> Self {
        QuizError::Store(err.to_string())
    }
}

impl From<tokio::task::JoinError> for QuizError {
    fn from(err: tokio::task::JoinError) -> Self {
        QuizError::Store(format!("store task failed: {err}"))
    }
}

/// Outcome of a handler or an input read that did not succeed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reported to the user; the session carries on.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// The underlying stream failed; the session ends.
    #[error("connection lost: {0}")]
    Io(#[from] io::Error),

    /// The peer closed its input or stayed idle too long; the session ends.
    #[error("input closed")]
    Closed,
}
