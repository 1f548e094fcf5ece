//! Core data models for technotes.
//!
//! These types are shared across all technotes crates and represent
//! the stored entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// USER TYPES
// =============================================================================

/// A user that can own notes. Users are managed outside the note operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A stored note.
///
/// `id` and `user` never change after creation; only `title`, `text` and
/// `completed` are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    /// Id of the owning user.
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Fields of a note about to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

impl Note {
    /// Overwrite the mutable fields, leaving `id` and `user` untouched.
    pub fn apply(&mut self, title: String, text: String, completed: bool) {
        self.title = title;
        self.text = text;
        self.completed = completed;
    }
}

/// Success descriptor returned by mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
