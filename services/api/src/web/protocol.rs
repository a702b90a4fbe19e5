//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! The server only renders state returned by the core; it holds no interview logic.

use chrono::{DateTime, Utc};
use interview_coach_core::{Feedback, InterviewSession, Rating, SubmissionOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// An answer to one question, addressed by its 0-based index.
#[derive(Deserialize, Debug, ToSchema)]
pub struct SubmitAnswerRequest {
    pub question_index: usize,
    pub answer: String,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct FeedbackView {
    pub content: String,
    /// True when the feedback is a placeholder because generation failed.
    pub degraded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct RatingView {
    pub score: String,
    pub justification: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub answer: Option<String>,
    pub feedback: Option<FeedbackView>,
}

/// Everything a client needs to render a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    /// One of `not_started`, `in_progress`, `completed`.
    pub status: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
    /// The first unanswered question, in presentation order.
    pub next_question_index: Option<usize>,
    pub rating: Option<RatingView>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SubmitAnswerResponse {
    pub question_index: usize,
    pub feedback: FeedbackView,
    pub status: String,
    /// Present only on the answer that completed the interview.
    pub rating: Option<RatingView>,
}

//=========================================================================================
// Conversions From Core Types
//=========================================================================================

impl From<&Feedback> for FeedbackView {
    fn from(feedback: &Feedback) -> Self {
        Self {
            content: feedback.content.clone(),
            degraded: feedback.degraded,
        }
    }
}

impl From<&Rating> for RatingView {
    fn from(rating: &Rating) -> Self {
        Self {
            score: rating.score.clone(),
            justification: rating.justification.clone(),
        }
    }
}

impl From<&InterviewSession> for SessionView {
    fn from(session: &InterviewSession) -> Self {
        let questions = session
            .questions()
            .iter()
            .map(|q| QuestionView {
                index: q.index,
                text: q.text.clone(),
                answer: session.answer(q.index).map(|a| a.text.clone()),
                feedback: session.feedback(q.index).map(FeedbackView::from),
            })
            .collect();

        Self {
            session_id: session.id(),
            status: session.status().as_str().to_string(),
            role: session.briefing().role().to_string(),
            created_at: session.created_at(),
            questions,
            next_question_index: session.next_unanswered().map(|q| q.index),
            rating: session.rating().map(RatingView::from),
        }
    }
}

impl SubmitAnswerResponse {
    pub fn from_outcome(outcome: &SubmissionOutcome) -> Self {
        Self {
            question_index: outcome.feedback.question_index,
            feedback: FeedbackView::from(&outcome.feedback),
            status: outcome.status.as_str().to_string(),
            rating: outcome.rating.as_ref().map(RatingView::from),
        }
    }
}
