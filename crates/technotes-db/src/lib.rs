//! # technotes-db
//!
//! PostgreSQL store for technotes.
//!
//! This crate provides:
//! - Connection pool management
//! - Note and user repositories
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use technotes_db::{Database, NoteService, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/technotes", &PoolConfig::default()).await?;
//!     db.migrate().await?;
//!
//!     let service = NoteService::new(Arc::new(db));
//!     for note in service.list().await? {
//!         println!("{}: {}", note.id, note.title);
//!     }
//!     Ok(())
//! }
//! ```
pub mod notes;
pub mod pool;
pub mod users;

// Test fixtures for integration tests
pub mod test_fixtures;

use async_trait::async_trait;
use uuid::Uuid;

// Re-export core types
pub use technotes_core::*;

pub use notes::PgNoteRepository;
pub use pool::{connect_pool, log_pool_metrics, PoolConfig};
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub notes: PgNoteRepository,
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the given URL with the given pool sizing.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = connect_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.find_by_username(username).await
    }
}

#[async_trait]
impl NoteRepository for Database {
    async fn find_all(&self) -> Result<Vec<Note>> {
        self.notes.find_all().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
        self.notes.find_by_id(id).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        self.notes.find_by_title(title).await
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        self.notes.insert(note).await
    }

    async fn save(&self, note: &Note) -> Result<Note> {
        self.notes.save(note).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.notes.delete(id).await
    }
}
