//! crates/interview_coach_core/src/prompts.rs
//!
//! Prompt templates for every call the session makes to the generation backend.
//! Placeholders use `{name}` syntax and are filled with `str::replace`.

use crate::domain::{Answer, Briefing, Question, Summary};

/// System instruction sent with every prompt.
pub const INTERVIEWER_SYSTEM: &str = "You are an expert interviewer. You ask challenging, role-specific interview questions and give candid, constructive feedback.";

const SUMMARY_TEMPLATE: &str = r#"Condense the following candidate briefing into a short bullet summary that an interviewer can use to prepare questions.

Keep it under 120 words. Focus on the responsibilities of the role, the key skills the job description asks for, and the most relevant experience on the resume.

ROLE:
{role}

JOB DESCRIPTION:
---
{job_description}
---

RESUME:
---
{resume}
---"#;

const QUESTIONS_TEMPLATE: &str = r#"Using the briefing below, write exactly {count} challenging and role-specific interview questions for a {role}.

Output one question per line. Do not number the questions and do not add any other text.

BRIEFING:
---
{briefing}
---"#;

const FEEDBACK_TEMPLATE: &str = r#"Question:
{question}

Candidate Answer:
{answer}

As an interviewer, provide structured feedback with:
- Strengths
- Weaknesses
- Suggestions for improvement"#;

const RATING_TEMPLATE: &str = r#"Evaluate the candidate's overall performance across the following interview.

{transcript}

Respond strictly in this format:
RATING: X/{scale}
JUSTIFICATION: one-line justification"#;

/// The purpose of a prompt. Adapters use it to pick sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Summary,
    Questions,
    Feedback,
    Rating,
}

impl PromptKind {
    /// Sampling temperature for this kind of call.
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Summary => 0.3,
            Self::Questions => 0.6,
            Self::Feedback => 0.5,
            Self::Rating => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Questions => "questions",
            Self::Feedback => "feedback",
            Self::Rating => "rating",
        }
    }
}

/// A fully rendered prompt ready to be sent to a [`crate::ports::TextGenerationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub system: &'static str,
    pub text: String,
}

impl Prompt {
    fn new(kind: PromptKind, text: String) -> Self {
        Self {
            kind,
            system: INTERVIEWER_SYSTEM,
            text,
        }
    }
}

pub fn summary_prompt(briefing: &Briefing) -> Prompt {
    let text = SUMMARY_TEMPLATE
        .replace("{role}", briefing.role())
        .replace("{job_description}", briefing.job_description())
        .replace("{resume}", briefing.resume_text());
    Prompt::new(PromptKind::Summary, text)
}

/// Builds the question prompt from the summary, or from the raw briefing when
/// the summary is empty.
pub fn questions_prompt(briefing: &Briefing, summary: &Summary, count: usize) -> Prompt {
    let grounding = if summary.is_empty() {
        format!(
            "Job description:\n{}\n\nResume:\n{}",
            briefing.job_description(),
            briefing.resume_text()
        )
    } else {
        summary.as_str().to_string()
    };

    let text = QUESTIONS_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{role}", briefing.role())
        .replace("{briefing}", &grounding);
    Prompt::new(PromptKind::Questions, text)
}

pub fn feedback_prompt(question: &Question, answer: &Answer) -> Prompt {
    let text = FEEDBACK_TEMPLATE
        .replace("{question}", &question.text)
        .replace("{answer}", &answer.text);
    Prompt::new(PromptKind::Feedback, text)
}

/// Embeds every question/answer pair, in question order.
pub fn rating_prompt<'a>(
    pairs: impl IntoIterator<Item = (&'a Question, &'a Answer)>,
    scale: u32,
) -> Prompt {
    let transcript = pairs
        .into_iter()
        .map(|(question, answer)| {
            format!(
                "Question {}:\n{}\n\nAnswer:\n{}",
                question.index + 1,
                question.text,
                answer.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let text = RATING_TEMPLATE
        .replace("{transcript}", &transcript)
        .replace("{scale}", &scale.to_string());
    Prompt::new(PromptKind::Rating, text)
}
