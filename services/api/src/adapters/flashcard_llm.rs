//! services/api/src/adapters/flashcard_llm.rs
//!
//! This module contains the adapter for the flashcard-generating LLM.
//! It implements the `FlashcardGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    error::OpenAIError,
    Client,
};
use async_trait::async_trait;
use flashcard_core::ports::{FlashcardGenerationService, PortError, PortResult};

const PROMPT_TEMPLATE: &str =
    "Generate flashcards for the topic: {topic}. Format as question-answer pairs.";

/// Fills the fixed prompt template with the user's topic.
fn build_prompt(topic: &str) -> String {
    PROMPT_TEMPLATE.replace("{topic}", topic)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `FlashcardGenerationService` using an
/// OpenAI-compatible chat-completion endpoint (OpenRouter by default).
#[derive(Clone)]
pub struct OpenAiFlashcardAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiFlashcardAdapter {
    /// Creates a new `OpenAiFlashcardAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `FlashcardGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FlashcardGenerationService for OpenAiFlashcardAdapter {
    /// Sends a single-message prompt with the fixed model identifier and
    /// extracts the first returned choice's message text.
    async fn generate_flashcards(&self, topic: &str) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(build_prompt(topic))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content.trim().to_string())
            } else {
                Err(PortError::Unexpected(
                    "Flashcard LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Flashcard LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
