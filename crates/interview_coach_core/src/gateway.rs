//! crates/interview_coach_core/src/gateway.rs
//!
//! The single entry point for all text-generation calls made by a session.
//!
//! No other module may call a [`TextGenerationService`] directly. The gateway
//! applies an explicit timeout, retries a transient failure once after a short
//! backoff, and never lets a backend error escape: callers always receive a
//! [`Generation`], which is either generated text or a failure carrying a
//! user-facing placeholder.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{PortError, TextGenerationService};
use crate::prompts::Prompt;

/// Shown to the user in place of generated content when the backend fails.
pub const GENERATION_PLACEHOLDER: &str =
    "The AI interviewer is unavailable right now, so this content could not be generated. Please try again later.";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Upper bound for a single backend call.
    pub request_timeout: Duration,
    /// Whether a transient failure gets one more attempt.
    pub retry_transient: bool,
    pub retry_backoff: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            retry_transient: true,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub reason: String,
    pub placeholder: &'static str,
}

/// The outcome of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Generated(String),
    Failed(GenerationFailure),
}

impl Generation {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    /// The generated text, or `None` on failure.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    pub fn into_text_or_placeholder(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Failed(failure) => failure.placeholder.to_string(),
        }
    }
}

/// Fault-tolerant wrapper around a [`TextGenerationService`].
#[derive(Clone)]
pub struct GenerationGateway {
    backend: Arc<dyn TextGenerationService>,
    settings: GatewaySettings,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn TextGenerationService>, settings: GatewaySettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Sends `prompt` to the backend. Never fails; see [`Generation`].
    pub async fn generate(&self, prompt: &Prompt) -> Generation {
        let attempts = if self.settings.retry_transient { 2 } else { 1 };
        let mut last_error: Option<PortError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                warn!(
                    "Generation call ({}) failed, retrying after {}ms...",
                    prompt.kind.as_str(),
                    self.settings.retry_backoff.as_millis()
                );
                tokio::time::sleep(self.settings.retry_backoff).await;
            }

            match self.call_once(prompt).await {
                Ok(text) => {
                    debug!(
                        "Generation call ({}) succeeded: {} chars",
                        prompt.kind.as_str(),
                        text.len()
                    );
                    return Generation::Generated(text);
                }
                Err(e) => {
                    let retryable = e.is_transient();
                    warn!("Generation call ({}) failed: {}", prompt.kind.as_str(), e);
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| PortError::Unexpected("no attempt was made".to_string()));
        let kind = if error.is_transient() {
            FailureKind::Transient
        } else {
            FailureKind::Permanent
        };
        warn!(
            "Falling back to placeholder content for {} call.",
            prompt.kind.as_str()
        );

        Generation::Failed(GenerationFailure {
            kind,
            reason: error.to_string(),
            placeholder: GENERATION_PLACEHOLDER,
        })
    }

    async fn call_once(&self, prompt: &Prompt) -> Result<String, PortError> {
        let timeout = self.settings.request_timeout;
        let text = tokio::time::timeout(timeout, self.backend.generate_content(prompt))
            .await
            .map_err(|_| PortError::Timeout(timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(PortError::Unexpected(
                "Backend returned empty content.".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prompts::PromptKind;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A backend that replays scripted replies and records every prompt it receives.
    /// Once the script runs out, every call fails transiently.
    pub(crate) struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, PortError>>>,
        pub(crate) prompts: Mutex<Vec<Prompt>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new(replies: Vec<Result<String, PortError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn replying(texts: &[&str]) -> Arc<Self> {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub(crate) fn failing() -> Arc<Self> {
            Self::new(Vec::new())
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub(crate) fn calls_of(&self, kind: PromptKind) -> usize {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.kind == kind)
                .count()
        }
    }

    #[async_trait]
    impl TextGenerationService for ScriptedBackend {
        async fn generate_content(&self, prompt: &Prompt) -> Result<String, PortError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PortError::Transient("backend down".to_string())))
        }
    }

    struct StalledBackend;

    #[async_trait]
    impl TextGenerationService for StalledBackend {
        async fn generate_content(&self, _prompt: &Prompt) -> Result<String, PortError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    /// Gateway settings for tests: short timeout, no real waiting.
    pub(crate) fn fast_settings() -> GatewaySettings {
        GatewaySettings {
            request_timeout: Duration::from_secs(5),
            retry_transient: true,
            retry_backoff: Duration::from_millis(10),
        }
    }

    fn prompt() -> Prompt {
        let briefing = crate::domain::Briefing::new("SRE", "On-call", "Linux").unwrap();
        crate::prompts::summary_prompt(&briefing)
    }

    #[tokio::test]
    async fn returns_generated_text_trimmed() {
        let backend = ScriptedBackend::replying(&["  hello \n"]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        assert_eq!(
            gateway.generate(&prompt()).await,
            Generation::Generated("hello".to_string())
        );
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_a_transient_failure_once() {
        let backend = ScriptedBackend::new(vec![
            Err(PortError::Transient("429".to_string())),
            Ok("recovered".to_string()),
        ]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        assert_eq!(gateway.generate(&prompt()).await.text(), Some("recovered"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_one_retry_with_placeholder() {
        let backend = ScriptedBackend::failing();
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        let generation = gateway.generate(&prompt()).await;
        assert_eq!(backend.calls(), 2);
        match &generation {
            Generation::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Transient);
                assert_eq!(failure.placeholder, GENERATION_PLACEHOLDER);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(generation.into_text_or_placeholder(), GENERATION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn does_not_retry_a_permanent_failure() {
        let backend = ScriptedBackend::new(vec![
            Err(PortError::Permanent("invalid api key".to_string())),
            Ok("never used".to_string()),
        ]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        let generation = gateway.generate(&prompt()).await;
        assert_eq!(backend.calls(), 1);
        assert!(matches!(
            generation,
            Generation::Failed(GenerationFailure { kind: FailureKind::Permanent, .. })
        ));
    }

    #[tokio::test]
    async fn blank_output_counts_as_failure() {
        let backend = ScriptedBackend::replying(&["   \n  "]);
        let settings = GatewaySettings {
            retry_transient: false,
            ..fast_settings()
        };
        let gateway = GenerationGateway::new(backend, settings);

        assert!(!gateway.generate(&prompt()).await.is_generated());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_backend_times_out() {
        let gateway = GenerationGateway::new(Arc::new(StalledBackend), fast_settings());

        match gateway.generate(&prompt()).await {
            Generation::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Transient);
                assert!(failure.reason.contains("timed out"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_a_malformed_reply_once() {
        let backend = ScriptedBackend::new(vec![
            Err(PortError::Unexpected("malformed JSON".to_string())),
            Ok("fine".to_string()),
        ]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        assert_eq!(gateway.generate(&prompt()).await.text(), Some("fine"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_blank_output_once() {
        let backend = ScriptedBackend::replying(&["  ", "second try"]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());

        assert_eq!(gateway.generate(&prompt()).await.text(), Some("second try"));
        assert_eq!(backend.calls(), 2);
    }
}
