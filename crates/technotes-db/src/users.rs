//! User lookups.
//!
//! The note API only reads users; `insert` exists for provisioning and test
//! fixtures.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use technotes_core::{Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a user, returning the stored row.
    pub async fn insert(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO app_user (id, username) VALUES ($1, $2) RETURNING id, username",
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username FROM app_user WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }
}
