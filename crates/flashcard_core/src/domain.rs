//! crates/flashcard_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub username: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// One saved generation result for a topic, owned by a user.
///
/// `content` is the model's raw formatted output. It is stored as an opaque
/// text blob and never parsed into structured question/answer pairs.
#[derive(Debug, Clone)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
