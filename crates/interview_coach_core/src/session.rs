//! crates/interview_coach_core/src/session.rs
//!
//! The interview session state machine.
//!
//! ```text
//! NotStarted --start (non-empty question set)--> InProgress --last answer--> Completed
//! ```
//!
//! A session owns all of its state; every operation takes the session by
//! `&mut` and returns what changed, so callers never have to re-read the whole
//! session to learn the effect of an event. Questions may be answered in any
//! order, each at most once. The overall rating is computed exactly once, at
//! the moment the last question receives its answer.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    validate_answer, Answer, Briefing, Feedback, Question, Rating, SessionStatus, Summary,
    ValidationError,
};
use crate::gateway::GenerationGateway;
use crate::prompts::feedback_prompt;
use crate::questions::build_questions;
use crate::rating::compute_rating;
use crate::summary::summarize;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// How many questions to ask the backend for.
    pub question_count: usize,
    /// Denominator N of the "X/N" overall score.
    pub rating_scale: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_count: 2,
            rating_scale: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backend produced no usable questions. The session stays
    /// `NotStarted` and `start` may be called again.
    #[error("No interview questions could be generated. Please try again.")]
    NoQuestionsGenerated,
    #[error("The interview has not started yet")]
    NotStarted,
    #[error("The interview has already started")]
    AlreadyStarted,
    #[error("The interview is already completed")]
    AlreadyCompleted,
    #[error("Question {0} does not exist")]
    UnknownQuestion(usize),
    #[error("Question {0} has already been answered")]
    AlreadyAnswered(usize),
}

impl SessionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoQuestionsGenerated)
    }
}

/// What a successful answer submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub feedback: Feedback,
    pub status: SessionStatus,
    /// Present only on the submission that completed the interview.
    pub rating: Option<Rating>,
}

/// The complete mutable state of one interview run.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    settings: SessionSettings,
    briefing: Briefing,
    summary: Option<Summary>,
    questions: Vec<Question>,
    answers: BTreeMap<usize, Answer>,
    feedback: BTreeMap<usize, Feedback>,
    rating: Option<Rating>,
    status: SessionStatus,
    last_activity: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(briefing: Briefing, settings: SessionSettings) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at,
            settings,
            briefing,
            summary: None,
            questions: Vec::new(),
            answers: BTreeMap::new(),
            feedback: BTreeMap::new(),
            rating: None,
            status: SessionStatus::NotStarted,
            last_activity: created_at,
        }
    }

    //=====================================================================================
    // Transitions
    //=====================================================================================

    /// Summarizes the briefing and generates the question set.
    ///
    /// On success the session moves to `InProgress` and the questions are
    /// returned. An empty question set leaves the session `NotStarted` and
    /// returns [`SessionError::NoQuestionsGenerated`]. A non-empty summary is
    /// kept across retries; a degraded (empty) one is regenerated.
    pub async fn start(&mut self, gateway: &GenerationGateway) -> Result<&[Question], SessionError> {
        match self.status {
            SessionStatus::NotStarted => {}
            SessionStatus::InProgress => return Err(SessionError::AlreadyStarted),
            SessionStatus::Completed => return Err(SessionError::AlreadyCompleted),
        }

        let summary = match self.summary.take() {
            Some(summary) if !summary.is_empty() => summary,
            _ => summarize(gateway, &self.briefing).await,
        };
        let questions = build_questions(
            gateway,
            &self.briefing,
            &summary,
            self.settings.question_count,
        )
        .await;
        self.summary = Some(summary);
        self.last_activity = Utc::now();

        if questions.is_empty() {
            info!("Session {} could not start: no questions generated.", self.id);
            return Err(SessionError::NoQuestionsGenerated);
        }

        self.questions = questions;
        self.status = SessionStatus::InProgress;
        info!(
            "Session {} started with {} questions.",
            self.id,
            self.questions.len()
        );
        Ok(&self.questions)
    }

    /// Records the first answer for `question_index` and generates its feedback.
    ///
    /// Feedback is always stored, holding a placeholder if the backend failed.
    /// When this answer is the last one missing, the session completes and the
    /// overall rating is computed and returned.
    ///
    /// Every backend call finishes before the session is touched. A submission
    /// dropped midway leaves no trace and the same answer can be sent again.
    pub async fn submit_answer(
        &mut self,
        gateway: &GenerationGateway,
        question_index: usize,
        text: &str,
    ) -> Result<SubmissionOutcome, SessionError> {
        match self.status {
            SessionStatus::InProgress => {}
            SessionStatus::NotStarted => return Err(SessionError::NotStarted),
            SessionStatus::Completed => return Err(SessionError::AlreadyCompleted),
        }
        let question = self
            .questions
            .get(question_index)
            .cloned()
            .ok_or(SessionError::UnknownQuestion(question_index))?;
        if self.answers.contains_key(&question_index) {
            return Err(SessionError::AlreadyAnswered(question_index));
        }
        let text = validate_answer(text)?;

        let answer = Answer {
            question_index,
            text,
            submitted_at: Utc::now(),
        };
        debug!("Session {} answer {}: {}", self.id, question_index, answer.text);

        let generation = gateway.generate(&feedback_prompt(&question, &answer)).await;
        let feedback = Feedback {
            question_index,
            degraded: !generation.is_generated(),
            content: generation.into_text_or_placeholder(),
        };

        let completes = self.answers.len() + 1 == self.questions.len();
        let rating = if completes {
            let mut answers = self.answers.clone();
            answers.insert(question_index, answer.clone());
            Some(self.rate(gateway, &answers).await)
        } else {
            None
        };

        self.answers.insert(question_index, answer);
        self.feedback.insert(question_index, feedback.clone());
        self.last_activity = Utc::now();
        info!(
            "Session {}: question {} answered ({}/{}).",
            self.id,
            question_index,
            self.answers.len(),
            self.questions.len()
        );
        if let Some(rating) = &rating {
            self.complete(rating.clone());
        }

        Ok(SubmissionOutcome {
            feedback,
            status: self.status,
            rating,
        })
    }

    async fn rate(&self, gateway: &GenerationGateway, answers: &BTreeMap<usize, Answer>) -> Rating {
        compute_rating(gateway, &self.questions, answers, self.settings.rating_scale).await
    }

    /// Moves to `Completed` with its one and only rating.
    fn complete(&mut self, rating: Rating) {
        self.rating = Some(rating);
        self.status = SessionStatus::Completed;
        info!("Session {} completed.", self.id);
    }

    //=====================================================================================
    // Inspection
    //=====================================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session last changed state, or attempted to start.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_started(&self) -> bool {
        self.status != SessionStatus::NotStarted
    }

    pub fn briefing(&self) -> &Briefing {
        &self.briefing
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Questions in presentation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer(&self, question_index: usize) -> Option<&Answer> {
        self.answers.get(&question_index)
    }

    pub fn feedback(&self, question_index: usize) -> Option<&Feedback> {
        self.feedback.get(&question_index)
    }

    pub fn answers(&self) -> &BTreeMap<usize, Answer> {
        &self.answers
    }

    pub fn feedback_entries(&self) -> &BTreeMap<usize, Feedback> {
        &self.feedback
    }

    pub fn rating(&self) -> Option<&Rating> {
        self.rating.as_ref()
    }

    /// The lowest-indexed question still waiting for an answer.
    pub fn next_unanswered(&self) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| !self.answers.contains_key(&q.index))
    }
}
