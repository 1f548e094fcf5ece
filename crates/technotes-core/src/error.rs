//! Error types for technotes.
//!
//! Display strings of the request-facing variants are the exact messages
//! returned to API clients.

use thiserror::Error;

/// Result type alias using technotes' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for technotes operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing, empty, or has the wrong type.
    #[error("All fields are required.")]
    MissingFields,

    /// Delete was called without a note id.
    #[error("Note ID required.")]
    MissingNoteId,

    /// No user with the given username exists.
    #[error("User not found.")]
    UserNotFound(String),

    /// No note with the given id exists.
    #[error("Note not found.")]
    NoteNotFound(String),

    /// Another note already carries the requested title.
    #[error("Note already exists.")]
    DuplicateTitle(String),

    /// The store holds no notes at all.
    #[error("No notes found.")]
    NoNotesFound,

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Coarse classification of an [`Error`], used by transport adapters to pick
/// a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or mistyped input.
    Validation,
    /// A referenced user or note does not exist.
    NotFound,
    /// Title collision with a different note.
    Conflict,
    /// List found zero records.
    EmptyResult,
    /// Store or internal failure; not caused by the request.
    Store,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingFields | Error::MissingNoteId => ErrorKind::Validation,
            Error::UserNotFound(_) | Error::NoteNotFound(_) => ErrorKind::NotFound,
            Error::DuplicateTitle(_) => ErrorKind::Conflict,
            Error::NoNotesFound => ErrorKind::EmptyResult,
            Error::Database(_) => ErrorKind::Store,
        }
    }
}
