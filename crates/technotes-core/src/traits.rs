//! Store traits for technotes.
//!
//! These traits define the interfaces that concrete stores must satisfy,
//! enabling a PostgreSQL backend in production and an in-memory backend
//! for tests and local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewNote, Note, User};

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Read-only access to users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find the user with exactly this username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD operations.
///
/// Implementations must reject a write that would give two notes the same
/// title with [`crate::Error::DuplicateTitle`].
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Fetch every note, in store-default order.
    async fn find_all(&self) -> Result<Vec<Note>>;

    /// Fetch one note by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>>;

    /// Fetch the note carrying this exact title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Note>>;

    /// Insert a new note, returning it with its assigned id.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Persist the mutable fields of an existing note.
    async fn save(&self, note: &Note) -> Result<Note>;

    /// Permanently delete a note. Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Everything the note operations need from a store.
pub trait NoteStore: NoteRepository + UserRepository {}

impl<T: NoteRepository + UserRepository> NoteStore for T {}
