//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the interviewer LLM.
//! It implements the `TextGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use interview_coach_core::{
    ports::{PortError, PortResult, TextGenerationService},
    prompts::Prompt,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Sorts client errors into retryable and non-retryable ones.
fn classify(e: OpenAIError) -> PortError {
    match e {
        OpenAIError::Reqwest(inner) => PortError::Transient(inner.to_string()),
        OpenAIError::InvalidArgument(message) => PortError::Permanent(message),
        OpenAIError::ApiError(api) => match api.r#type.as_deref() {
            Some("invalid_request_error") | Some("authentication_error") => {
                PortError::Permanent(api.message)
            }
            _ => PortError::Transient(api.message),
        },
        other => PortError::Unexpected(other.to_string()),
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiGenerationAdapter {
    /// Sends the prompt as a single user turn under the interviewer system instruction.
    async fn generate_content(&self, prompt: &Prompt) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system)
                .build()
                .map_err(|e| PortError::Permanent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.text.as_str())
                .build()
                .map_err(|e| PortError::Permanent(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(prompt.kind.temperature())
            .n(1)
            .build()
            .map_err(|e| PortError::Permanent(e.to_string()))?;

        debug!("Sending {} prompt to {}", prompt.kind.as_str(), self.model);

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self.client.chat().create(request).await.map_err(classify)?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Generation LLM response contained no text content.".to_string())
            })
    }
}
