//! crates/interview_coach_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete text-generation backend and document parser.

use async_trait::async_trait;
use std::time::Duration;

use crate::prompts::Prompt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, quota).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend may succeed if asked again (rate limit, 5xx, connection reset).
    #[error("Transient backend failure: {0}")]
    Transient(String),
    /// Asking again will not help (bad credentials, invalid request).
    #[error("Permanent backend failure: {0}")]
    Permanent(String),
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),
    /// The backend answered, but the answer was unusable (no choices, no text).
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// Whether a retry has a reasonable chance of succeeding. A malformed or
    /// empty reply is worth one more attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Permanent(_))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Generates text for a single prompt.
    async fn generate_content(&self, prompt: &Prompt) -> PortResult<String>;
}

/// Converts an uploaded document into plain text.
///
/// Extraction is best-effort: unreadable documents or pages yield an empty
/// string instead of an error. Implementations may block.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract_text(&self, document: &[u8]) -> String;
}
