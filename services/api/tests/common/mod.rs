// Common test utilities for integration tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use api_lib::config::Config;
use api_lib::web::state::AppState;
use flashcard_core::domain::{AuthSession, FlashcardSet, User, UserCredentials};
use flashcard_core::ports::{
    DatabaseService, FlashcardGenerationService, PortError, PortResult,
};

//=========================================================================================
// In-Memory Database
//=========================================================================================

/// An in-memory `DatabaseService` so tests run hermetically, with the same
/// contract as the Postgres adapter (unique usernames, expiring sessions,
/// insertion-ordered pagination).
#[derive(Default)]
pub struct MemoryDb {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<StoredUser>,
    sessions: HashMap<String, AuthSession>,
    sets: Vec<FlashcardSet>,
}

struct StoredUser {
    user_id: Uuid,
    username: String,
    password_hash: String,
}

#[async_trait]
impl DatabaseService for MemoryDb {
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.username == username) {
            return Err(PortError::Conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }
        let user_id = Uuid::new_v4();
        inner.users.push(StoredUser {
            user_id,
            username: username.to_string(),
            password_hash: hashed_password.to_string(),
        });
        Ok(User {
            user_id,
            username: username.to_string(),
        })
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| UserCredentials {
                user_id: u.user_id,
                username: u.username.clone(),
                hashed_password: u.password_hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User '{}' not found", username)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let inner = self.inner.lock().unwrap();
        match inner.sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.remove(session_id);
        Ok(())
    }

    async fn save_flashcard_set(
        &self,
        user_id: Uuid,
        topic: &str,
        content: &str,
    ) -> PortResult<FlashcardSet> {
        let mut inner = self.inner.lock().unwrap();
        let set = FlashcardSet {
            id: Uuid::new_v4(),
            user_id,
            topic: topic.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        inner.sets.push(set.clone());
        Ok(set)
    }

    async fn list_flashcard_sets(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> PortResult<Vec<FlashcardSet>> {
        let inner = self.inner.lock().unwrap();
        let offset = (page as usize - 1) * limit as usize;
        Ok(inner
            .sets
            .iter()
            .filter(|s| s.user_id == user_id)
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

//=========================================================================================
// Completion Client Stubs
//=========================================================================================

/// A stub completion client that records how many times it was called.
pub struct StubFlashcardService {
    pub response: String,
    pub calls: AtomicUsize,
}

impl StubFlashcardService {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlashcardGenerationService for StubFlashcardService {
    async fn generate_flashcards(&self, _topic: &str) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// A stub completion client that always fails with upstream detail.
pub struct FailingFlashcardService {
    pub detail: String,
}

#[async_trait]
impl FlashcardGenerationService for FailingFlashcardService {
    async fn generate_flashcards(&self, _topic: &str) -> PortResult<String> {
        Err(PortError::Unexpected(self.detail.clone()))
    }
}

//=========================================================================================
// State Construction
//=========================================================================================

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        log_level: tracing::Level::INFO,
        completion_api_key: None,
        completion_api_base: "http://localhost".to_string(),
        flashcard_model: "test-model".to_string(),
        frontend_origin: "http://localhost:3000".to_string(),
    }
}

/// Builds an `AppState` over the given store and completion client.
pub fn test_state(
    db: Arc<dyn DatabaseService>,
    flashcard_adapter: Arc<dyn FlashcardGenerationService>,
) -> Arc<AppState> {
    Arc::new(AppState {
        db,
        config: Arc::new(test_config()),
        flashcard_adapter,
    })
}

/// Pulls the session token out of a `Set-Cookie` header value.
pub fn session_id_from_set_cookie(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|kv| kv.strip_prefix("session="))
        .expect("Set-Cookie should carry a session token")
        .to_string()
}
