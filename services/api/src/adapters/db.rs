//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flashcard_core::domain::{FlashcardSet, User, UserCredentials};
use flashcard_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Offset for a 1-based page. Callers validate `page >= 1` and `limit >= 1`.
fn page_offset(page: u32, limit: u32) -> i64 {
    (page as i64 - 1) * limit as i64
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.id,
            username: self.username,
        }
    }
}

#[derive(FromRow)]
struct UserCredentialsRecord {
    id: Uuid,
    username: String,
    password_hash: String,
}
impl UserCredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            username: self.username,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct FlashcardSetRecord {
    id: Uuid,
    user_id: Uuid,
    topic: String,
    flashcards: String,
    created_at: DateTime<Utc>,
}
impl FlashcardSetRecord {
    fn to_domain(self) -> FlashcardSet {
        FlashcardSet {
            id: self.id,
            user_id: self.user_id,
            topic: self.topic,
            content: self.flashcards,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        // The unique constraint on `username` is what makes concurrent signups
        // safe; a duplicate surfaces as a database error on insert.
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) RETURNING id, username",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                PortError::Conflict(format!("Username '{}' already exists", username))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserCredentialsRecord>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("User '{}' not found", username))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let (user_id,): (Uuid,) = sqlx::query_as(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn save_flashcard_set(
        &self,
        user_id: Uuid,
        topic: &str,
        content: &str,
    ) -> PortResult<FlashcardSet> {
        let record = sqlx::query_as::<_, FlashcardSetRecord>(
            "INSERT INTO flashcard_sets (id, user_id, topic, flashcards) VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, topic, flashcards, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(topic)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn list_flashcard_sets(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> PortResult<Vec<FlashcardSet>> {
        let records = sqlx::query_as::<_, FlashcardSetRecord>(
            "SELECT id, user_id, topic, flashcards, created_at FROM flashcard_sets \
             WHERE user_id = $1 ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(page_offset(page, limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
