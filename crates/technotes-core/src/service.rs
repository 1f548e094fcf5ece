//! Note record operations.
//!
//! Each operation checks the payload shape, performs its existence and
//! uniqueness lookups against the injected store, then writes. Lookups and
//! writes are separate store calls with no transaction between them; the
//! store's unique-title constraint decides concurrent renames.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::input::NotePayload;
use crate::models::{Confirmation, NewNote, Note};
use crate::traits::NoteStore;

/// Note operations over an injected store handle.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

/// A malformed id cannot name any stored note.
fn parse_note_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::NoteNotFound(raw.to_string()))
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Return every note. An empty store is reported as [`Error::NoNotesFound`].
    pub async fn list(&self) -> Result<Vec<Note>> {
        let start = Instant::now();
        let notes = self.store.find_all().await?;

        debug!(
            subsystem = "notes",
            component = "service",
            op = "list",
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );

        if notes.is_empty() {
            return Err(Error::NoNotesFound);
        }
        Ok(notes)
    }

    /// Create a note owned by the user named in the payload.
    pub async fn create(&self, payload: &NotePayload) -> Result<Confirmation> {
        let input = payload.to_create()?;

        let owner = self
            .store
            .find_by_username(&input.username)
            .await?
            .ok_or_else(|| Error::UserNotFound(input.username.clone()))?;

        let note = self
            .store
            .insert(NewNote {
                user: owner.id,
                title: input.title,
                text: input.text,
                completed: input.completed,
            })
            .await?;

        info!(
            subsystem = "notes",
            component = "service",
            op = "create",
            note_id = %note.id,
            user_id = %owner.id,
            "Note created"
        );
        Ok(Confirmation::new("Note created successfully."))
    }

    /// Overwrite title, text and completion of an existing note.
    ///
    /// Renaming a note to its own current title is allowed; taking the title
    /// of a different note is a conflict.
    pub async fn update(&self, payload: &NotePayload) -> Result<Confirmation> {
        let input = payload.to_update()?;
        let id = parse_note_id(&input.id)?;

        let mut note = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NoteNotFound(input.id.clone()))?;

        if let Some(duplicate) = self.store.find_by_title(&input.title).await? {
            if duplicate.id != id {
                debug!(
                    subsystem = "notes",
                    component = "service",
                    op = "update",
                    note_id = %id,
                    conflicting_id = %duplicate.id,
                    "Title already taken"
                );
                return Err(Error::DuplicateTitle(input.title));
            }
        }

        note.apply(input.title, input.text, input.completed);
        let updated = self.store.save(&note).await?;

        info!(
            subsystem = "notes",
            component = "service",
            op = "update",
            note_id = %updated.id,
            "Note updated"
        );
        Ok(Confirmation::new(format!(
            "Note {} updated successfully.",
            updated.title
        )))
    }

    /// Permanently remove a note.
    pub async fn delete(&self, payload: &NotePayload) -> Result<Confirmation> {
        let input = payload.to_delete()?;
        let id = parse_note_id(&input.id)?;

        if self.store.find_by_id(id).await?.is_none() {
            return Err(Error::NoteNotFound(input.id));
        }
        // Removed concurrently between the lookup and the delete.
        if !self.store.delete(id).await? {
            return Err(Error::NoteNotFound(input.id));
        }

        info!(
            subsystem = "notes",
            component = "service",
            op = "delete",
            note_id = %id,
            "Note deleted"
        );
        Ok(Confirmation::new("Note deleted successfully."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::memory::MemoryStore;
    use crate::models::User;
    use crate::traits::{NoteRepository, UserRepository};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    fn payload(value: Value) -> NotePayload {
        serde_json::from_value(value).unwrap()
    }

    async fn setup() -> (Arc<MemoryStore>, NoteService, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store.add_user("dave").await;
        let service = NoteService::new(store.clone());
        (store, service, user)
    }

    async fn create(service: &NoteService, title: &str) {
        service
            .create(&payload(json!({
                "user": "dave",
                "title": title,
                "text": format!("{} text", title),
                "completed": false
            })))
            .await
            .unwrap();
    }

    async fn stored(store: &MemoryStore, title: &str) -> Note {
        store.find_by_title(title).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_list_empty_store_is_error() {
        let (_store, service, _user) = setup().await;
        assert!(matches!(service.list().await, Err(Error::NoNotesFound)));
    }

    #[tokio::test]
    async fn test_list_returns_every_note() {
        let (_store, service, _user) = setup().await;
        for title in ["a", "b", "c"] {
            create(&service, title).await;
        }
        assert_eq!(service.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_resolves_user_id() {
        let (store, service, user) = setup().await;
        let confirmation = service
            .create(&payload(json!({
                "user": "dave",
                "title": "Swap monitor",
                "text": "Desk 4",
                "completed": true
            })))
            .await
            .unwrap();

        assert_eq!(confirmation.message, "Note created successfully.");
        let note = stored(&store, "Swap monitor").await;
        assert_eq!(note.user, user.id);
        assert_eq!(note.text, "Desk 4");
        assert!(note.completed);
    }

    #[tokio::test]
    async fn test_create_with_string_completed_persists_nothing() {
        let (store, service, _user) = setup().await;
        let err = service
            .create(&payload(json!({
                "user": "dave",
                "title": "t",
                "text": "x",
                "completed": "true"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingFields));
        assert_eq!(store.note_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_unknown_user_persists_nothing() {
        let (store, service, _user) = setup().await;
        let err = service
            .create(&payload(json!({
                "user": "nobody",
                "title": "t",
                "text": "x",
                "completed": false
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UserNotFound(name) if name == "nobody"));
        assert_eq!(store.note_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_title_is_conflict() {
        let (store, service, _user) = setup().await;
        create(&service, "same").await;
        let err = service
            .create(&payload(json!({
                "user": "dave",
                "title": "same",
                "text": "again",
                "completed": false
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateTitle(_)));
        assert_eq!(store.note_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_to_own_title_succeeds() {
        let (store, service, user) = setup().await;
        create(&service, "X").await;
        let before = stored(&store, "X").await;

        let confirmation = service
            .update(&payload(json!({
                "id": before.id.to_string(),
                "user": "someone-else",
                "title": "X",
                "text": "rewritten",
                "completed": true
            })))
            .await
            .unwrap();

        assert_eq!(confirmation.message, "Note X updated successfully.");
        let after = store.find_by_id(before.id).await.unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.user, user.id);
        assert_eq!(after.text, "rewritten");
        assert!(after.completed);
    }

    #[tokio::test]
    async fn test_update_renames_note() {
        let (store, service, _user) = setup().await;
        create(&service, "old").await;
        let note = stored(&store, "old").await;

        let confirmation = service
            .update(&payload(json!({
                "id": note.id.to_string(),
                "user": "dave",
                "title": "new",
                "text": "x",
                "completed": false
            })))
            .await
            .unwrap();

        assert_eq!(confirmation.message, "Note new updated successfully.");
        assert!(store.find_by_title("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_into_other_title_conflicts() {
        let (store, service, _user) = setup().await;
        create(&service, "X").await;
        create(&service, "Y").await;
        let b = stored(&store, "Y").await;

        let err = service
            .update(&payload(json!({
                "id": b.id.to_string(),
                "user": "dave",
                "title": "X",
                "text": "x",
                "completed": false
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateTitle(_)));
        let b_after = store.find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(b_after.title, "Y");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_store, service, _user) = setup().await;
        create(&service, "X").await;

        for id in [Uuid::now_v7().to_string(), "not-a-uuid".to_string()] {
            let err = service
                .update(&payload(json!({
                    "id": id,
                    "user": "dave",
                    "title": "X",
                    "text": "x",
                    "completed": false
                })))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::NoteNotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_update_validation_precedes_lookup() {
        let (_store, service, _user) = setup().await;
        let err = service
            .update(&payload(json!({
                "id": Uuid::now_v7().to_string(),
                "title": "X",
                "text": "x",
                "completed": false
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFields));
    }

    #[tokio::test]
    async fn test_delete_removes_note() {
        let (store, service, _user) = setup().await;
        create(&service, "X").await;
        let note = stored(&store, "X").await;

        let confirmation = service
            .delete(&payload(json!({ "id": note.id.to_string() })))
            .await
            .unwrap();

        assert_eq!(confirmation.message, "Note deleted successfully.");
        assert!(store.find_by_id(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_note_leaves_store_unchanged() {
        let (store, service, _user) = setup().await;
        create(&service, "X").await;

        let err = service
            .delete(&payload(json!({ "id": Uuid::now_v7().to_string() })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoteNotFound(_)));
        assert_eq!(store.note_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_without_id() {
        let (_store, service, _user) = setup().await;
        let err = service.delete(&payload(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::MissingNoteId));
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let (_store, service, _user) = setup().await;
        service
            .create(&payload(json!({
                "user": "dave",
                "title": "Label cables",
                "text": "Server room",
                "completed": true
            })))
            .await
            .unwrap();

        let notes = service.list().await.unwrap();
        assert!(notes
            .iter()
            .any(|n| n.title == "Label cables" && n.text == "Server room" && n.completed));
    }

    struct BrokenStore;

    #[async_trait]
    impl UserRepository for BrokenStore {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[async_trait]
    impl NoteRepository for BrokenStore {
        async fn find_all(&self) -> Result<Vec<Note>> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Note>> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_title(&self, _title: &str) -> Result<Option<Note>> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
        async fn insert(&self, _note: NewNote) -> Result<Note> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
        async fn save(&self, _note: &Note) -> Result<Note> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool> {
            Err(Error::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let service = NoteService::new(Arc::new(BrokenStore));
        assert!(matches!(service.list().await, Err(Error::Database(_))));
        let err = service
            .create(&payload(json!({
                "user": "dave",
                "title": "t",
                "text": "x",
                "completed": false
            })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }
}
