//! crates/interview_coach_core/src/domain.rs
//!
//! Defines the pure, core data structures for a mock-interview session.
//! These structs are independent of any web framework or serialization format.

use chrono::{DateTime, Utc};

use crate::ports::DocumentTextExtractor;

/// Rejections of user-supplied input. These are raised before any backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A target role is required")]
    MissingRole,
    #[error("A job description is required")]
    MissingJobDescription,
    #[error("A resume is required (the uploaded document contained no readable text)")]
    MissingResume,
    #[error("An answer cannot be empty")]
    EmptyAnswer,
}

/// The input bundle that grounds question, feedback and rating generation.
///
/// Immutable once captured. Construct it through [`Briefing::new`], which trims
/// every field and rejects blank ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Briefing {
    role: String,
    job_description: String,
    resume_text: String,
}

impl Briefing {
    pub fn new(
        role: impl Into<String>,
        job_description: impl Into<String>,
        resume_text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let role = trimmed(role.into());
        let job_description = trimmed(job_description.into());
        let resume_text = trimmed(resume_text.into());

        if role.is_empty() {
            return Err(ValidationError::MissingRole);
        }
        if job_description.is_empty() {
            return Err(ValidationError::MissingJobDescription);
        }
        if resume_text.is_empty() {
            return Err(ValidationError::MissingResume);
        }

        Ok(Self {
            role,
            job_description,
            resume_text,
        })
    }

    /// Builds a briefing from an uploaded resume document.
    ///
    /// Extraction is best-effort, so a document without readable text is
    /// rejected here as a missing resume.
    pub fn from_resume_document(
        role: impl Into<String>,
        job_description: impl Into<String>,
        resume_document: &[u8],
        extractor: &dyn DocumentTextExtractor,
    ) -> Result<Self, ValidationError> {
        Self::new(role, job_description, extractor.extract_text(resume_document))
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }
}

/// A condensed briefing produced by the context summarizer.
///
/// An empty summary means the summarizer ran in degraded mode; the question
/// builder then falls back to the raw briefing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self(trimmed(text.into()))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single interview question. `index` is 0-based and stable for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub index: usize,
    pub text: String,
}

/// The candidate's answer to one question. At most one exists per index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question_index: usize,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

/// Structured feedback (strengths / weaknesses / improvement tips) for one answer.
///
/// `degraded` is set when the backend failed and `content` holds the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub question_index: usize,
    pub content: String,
    pub degraded: bool,
}

/// The overall rating, computed once every question has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    /// Always of the form "X/N".
    pub score: String,
    pub justification: String,
}

/// Where a session is in its lifecycle. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

fn trimmed(text: String) -> String {
    text.trim().to_string()
}

/// Trims an answer and rejects it when blank.
pub fn validate_answer(text: &str) -> Result<String, ValidationError> {
    let answer = text.trim();
    if answer.is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }
    Ok(answer.to_string())
}
