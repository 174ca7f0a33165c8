pub mod db;
pub mod flashcard_llm;

pub use db::DbAdapter;
pub use flashcard_llm::OpenAiFlashcardAdapter;
