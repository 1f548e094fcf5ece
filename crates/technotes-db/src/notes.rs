//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use technotes_core::{Error, NewNote, Note, NoteRepository, Result};

const NOTE_COLUMNS: &str = "id, user_id, title, text, completed, created_at_utc, updated_at_utc";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a write error, turning a unique-title violation into a conflict.
fn map_write_error(err: sqlx::Error, title: &str) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::DuplicateTitle(title.to_string())
        }
        _ => Error::Database(err),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn find_all(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM note ORDER BY created_at_utc, id",
            NOTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM note WHERE id = $1",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM note WHERE title = $1",
            NOTE_COLUMNS
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let now = Utc::now();
        sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO note (id, user_id, title, text, completed, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(note.user)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.completed)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &note.title))
    }

    async fn save(&self, note: &Note) -> Result<Note> {
        sqlx::query_as::<_, Note>(&format!(
            "UPDATE note SET title = $2, text = $3, completed = $4, updated_at_utc = $5
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.completed)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &note.title))?
        .ok_or_else(|| Error::NoteNotFound(note.id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = map_write_error(sqlx::Error::RowNotFound, "title");
        assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_note_columns_match_model() {
        for column in ["id", "user_id", "title", "text", "completed"] {
            assert!(NOTE_COLUMNS.contains(column));
        }
    }
}
