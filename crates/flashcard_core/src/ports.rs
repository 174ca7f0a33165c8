//! crates/flashcard_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{FlashcardSet, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---

    /// Inserts a new user row. A duplicate username must surface as
    /// `PortError::Conflict`, enforced by the storage layer's unique
    /// constraint rather than a check-then-insert.
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User>;

    /// Looks a user up for login. `NotFound` when the username is unknown;
    /// callers must collapse that with a failed password check into one
    /// generic invalid-credentials failure.
    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session token to its user id. Unknown or expired tokens
    /// fail with `PortError::Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Flashcard Sets ---
    async fn save_flashcard_set(
        &self,
        user_id: Uuid,
        topic: &str,
        content: &str,
    ) -> PortResult<FlashcardSet>;

    /// Lists a user's sets in insertion order. `page` starts at 1 and the
    /// offset is `(page - 1) * limit`; pages past the end return an empty vec.
    async fn list_flashcard_sets(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> PortResult<Vec<FlashcardSet>>;
}

#[async_trait]
pub trait FlashcardGenerationService: Send + Sync {
    /// Generates flashcard text for a topic via the external completion
    /// endpoint. A direct pass-through: no retries, streaming, or caching.
    async fn generate_flashcards(&self, topic: &str) -> PortResult<String>;
}
