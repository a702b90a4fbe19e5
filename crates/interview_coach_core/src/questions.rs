//! Question-set builder.
//!
//! One gateway call asks for an exact number of questions, one per line. The
//! reply is split on line breaks, blank lines are dropped and the remaining
//! lines become questions with sequential 0-based indices in emission order.
//! Question content is not otherwise validated.

use tracing::{info, warn};

use crate::domain::{Briefing, Question, Summary};
use crate::gateway::{Generation, GenerationGateway};
use crate::prompts::questions_prompt;

/// Returns an empty vector when the backend fails or produces nothing usable.
pub async fn build_questions(
    gateway: &GenerationGateway,
    briefing: &Briefing,
    summary: &Summary,
    count: usize,
) -> Vec<Question> {
    let prompt = questions_prompt(briefing, summary, count);

    match gateway.generate(&prompt).await {
        Generation::Generated(text) => {
            let questions = parse_questions(&text);
            if questions.len() != count {
                warn!(
                    "Asked for {} questions, backend produced {}.",
                    count,
                    questions.len()
                );
            }
            info!("Generated {} interview questions.", questions.len());
            questions
        }
        Generation::Failed(failure) => {
            warn!("Question generation failed: {}", failure.reason);
            Vec::new()
        }
    }
}

pub fn parse_questions(text: &str) -> Vec<Question> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| Question {
            index,
            text: line.to_string(),
        })
        .collect()
}
