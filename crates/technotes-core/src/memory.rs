//! In-memory store.
//!
//! Keeps notes in insertion order and enforces the same unique-title rule as
//! the PostgreSQL store. Used by tests and by `STORAGE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{NewNote, Note, User};
use crate::traits::{NoteRepository, UserRepository};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    notes: Vec<Note>,
}

/// Process-local store backed by a single lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return it. Usernames are unique; registering an
    /// existing name returns the existing user.
    pub async fn add_user(&self, username: &str) -> User {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.users.iter().find(|u| u.username == username) {
            return existing.clone();
        }
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
        };
        inner.users.push(user.clone());
        user
    }

    /// Number of stored notes.
    pub async fn note_count(&self) -> usize {
        self.inner.read().await.notes.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Note>> {
        Ok(self.inner.read().await.notes.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
        let inner = self.inner.read().await;
        Ok(inner.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        let inner = self.inner.read().await;
        Ok(inner.notes.iter().find(|n| n.title == title).cloned())
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let mut inner = self.inner.write().await;
        if inner.notes.iter().any(|n| n.title == note.title) {
            return Err(Error::DuplicateTitle(note.title));
        }

        let now = Utc::now();
        let stored = Note {
            id: Uuid::now_v7(),
            user: note.user,
            title: note.title,
            text: note.text,
            completed: note.completed,
            created_at_utc: now,
            updated_at_utc: now,
        };
        inner.notes.push(stored.clone());
        Ok(stored)
    }

    async fn save(&self, note: &Note) -> Result<Note> {
        let mut inner = self.inner.write().await;
        if inner
            .notes
            .iter()
            .any(|n| n.title == note.title && n.id != note.id)
        {
            return Err(Error::DuplicateTitle(note.title.clone()));
        }

        let slot = inner
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| Error::NoteNotFound(note.id.to_string()))?;
        slot.title = note.title.clone();
        slot.text = note.text.clone();
        slot.completed = note.completed;
        slot.updated_at_utc = Utc::now();
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.notes.len();
        inner.notes.retain(|n| n.id != id);
        Ok(inner.notes.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_note(user: Uuid, title: &str) -> NewNote {
        NewNote {
            user,
            title: title.to_string(),
            text: "body".to_string(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn test_add_user_is_idempotent() {
        let store = MemoryStore::new();
        let first = store.add_user("dave").await;
        let second = store.add_user("dave").await;
        assert_eq!(first, second);
        assert_eq!(
            store.find_by_username("dave").await.unwrap(),
            Some(first)
        );
        assert!(store.find_by_username("Dave").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let store = MemoryStore::new();
        let user = store.add_user("dave").await;
        store.insert(new_note(user.id, "one")).await.unwrap();
        store.insert(new_note(user.id, "two")).await.unwrap();

        let titles: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_title() {
        let store = MemoryStore::new();
        let user = store.add_user("dave").await;
        store.insert(new_note(user.id, "same")).await.unwrap();

        let err = store.insert(new_note(user.id, "same")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle(t) if t == "same"));
        assert_eq!(store.note_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_allows_own_title_and_blocks_others() {
        let store = MemoryStore::new();
        let user = store.add_user("dave").await;
        let a = store.insert(new_note(user.id, "A")).await.unwrap();
        let mut b = store.insert(new_note(user.id, "B")).await.unwrap();

        b.text = "edited".to_string();
        let saved = store.save(&b).await.unwrap();
        assert_eq!(saved.text, "edited");

        b.title = a.title.clone();
        assert!(matches!(
            store.save(&b).await,
            Err(Error::DuplicateTitle(_))
        ));
        let stored_b = store.find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(stored_b.title, "B");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let store = MemoryStore::new();
        let user = store.add_user("dave").await;
        let note = store.insert(new_note(user.id, "gone")).await.unwrap();

        assert!(store.delete(note.id).await.unwrap());
        assert!(!store.delete(note.id).await.unwrap());
        assert!(store.find_by_id(note.id).await.unwrap().is_none());
    }
}
