pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use middleware::require_auth;
pub use rest::{generate_handler, index_handler, list_flashcards_handler, save_handler};
