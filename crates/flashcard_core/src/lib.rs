pub mod domain;
pub mod ports;

pub use domain::{AuthSession, FlashcardSet, User, UserCredentials};
pub use ports::{DatabaseService, FlashcardGenerationService, PortError, PortResult};
