//! Rating computer.
//!
//! The backend is asked to reply in two labeled lines:
//!
//! ```text
//! RATING: X/N
//! JUSTIFICATION: ...
//! ```
//!
//! Labels are matched case-insensitively and `REASON:` is accepted in place of
//! `JUSTIFICATION:`. A missing or unreadable label is replaced by its default
//! ([`default_score`], [`DEFAULT_JUSTIFICATION`]); parsing never fails.

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::domain::{Answer, Question, Rating};
use crate::gateway::{Generation, GenerationGateway};
use crate::prompts::rating_prompt;

pub const DEFAULT_JUSTIFICATION: &str =
    "The overall rating could not be determined from the evaluator's response.";

/// Score used when the reply carries no readable `RATING:` line.
pub fn default_score(scale: u32) -> String {
    format!("0/{scale}")
}

/// Makes exactly one gateway call with every question/answer pair, in order.
pub async fn compute_rating(
    gateway: &GenerationGateway,
    questions: &[Question],
    answers: &BTreeMap<usize, Answer>,
    scale: u32,
) -> Rating {
    let pairs = questions
        .iter()
        .filter_map(|q| answers.get(&q.index).map(|a| (q, a)));
    let prompt = rating_prompt(pairs, scale);

    let rating = match gateway.generate(&prompt).await {
        Generation::Generated(text) => parse_rating(&text, scale),
        Generation::Failed(failure) => {
            warn!("Rating generation failed: {}", failure.reason);
            Rating {
                score: default_score(scale),
                justification: DEFAULT_JUSTIFICATION.to_string(),
            }
        }
    };
    info!("Overall rating computed: {}", rating.score);
    rating
}

pub fn parse_rating(text: &str, scale: u32) -> Rating {
    let mut score = None;
    let mut justification = None;

    for line in text.lines() {
        let Some((label, value)) = split_label(line) else {
            continue;
        };
        if score.is_none() && label.eq_ignore_ascii_case("RATING") {
            score = normalize_score(value, scale);
        } else if justification.is_none()
            && (label.eq_ignore_ascii_case("JUSTIFICATION") || label.eq_ignore_ascii_case("REASON"))
            && !value.is_empty()
        {
            justification = Some(value.to_string());
        }
    }

    if score.is_none() || justification.is_none() {
        warn!("Rating reply is missing expected labels; using defaults where needed.");
    }

    Rating {
        score: score.unwrap_or_else(|| default_score(scale)),
        justification: justification.unwrap_or_else(|| DEFAULT_JUSTIFICATION.to_string()),
    }
}

/// Splits `"**Rating:** 8/10"` into `("Rating", "8/10")`.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let line = line.trim().trim_start_matches(['#', '-', '*', ' ']);
    let (label, value) = line.split_once(':')?;
    let label = label.trim().trim_end_matches('*').trim();
    let value = value.trim().trim_start_matches('*').trim();
    Some((label, value))
}

/// Accepts "8/10", "8 / 10" or a bare "8" (scored out of `scale`). The score
/// must be a finite number between 0 and its denominator.
fn normalize_score(value: &str, scale: u32) -> Option<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let number = |s: &str| s.parse::<f64>().ok().filter(|n| n.is_finite());

    let (x, n) = match compact.split_once('/') {
        Some((x, n)) => (x, n.to_string()),
        None => (compact.as_str(), scale.to_string()),
    };
    let (score, out_of) = (number(x)?, number(&n)?);
    if out_of <= 0.0 || !(0.0..=out_of).contains(&score) {
        return None;
    }
    Some(format!("{x}/{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{fast_settings, ScriptedBackend};
    use chrono::Utc;

    #[test]
    fn parses_the_two_labeled_lines() {
        let rating = parse_rating("RATING: 8/10\nJUSTIFICATION: Clear and specific.\n", 10);
        assert_eq!(rating.score, "8/10");
        assert_eq!(rating.justification, "Clear and specific.");
    }

    #[test]
    fn falls_back_to_defaults_without_labels() {
        let rating = parse_rating("Great job overall, maybe a seven.", 10);
        assert_eq!(rating.score, default_score(10));
        assert_eq!(rating.justification, DEFAULT_JUSTIFICATION);
    }

    #[test]
    fn accepts_mixed_case_reason_alias_and_markdown() {
        let rating = parse_rating("Here you go:\n**Rating:** 4 / 5\nReason: Solid examples.", 5);
        assert_eq!(rating.score, "4/5");
        assert_eq!(rating.justification, "Solid examples.");
    }

    #[test]
    fn bare_number_uses_configured_scale() {
        assert_eq!(parse_rating("RATING: 7\nJUSTIFICATION: ok", 10).score, "7/10");
    }

    #[test]
    fn unreadable_score_keeps_justification() {
        let rating = parse_rating("RATING: excellent\nJUSTIFICATION: Thorough.", 10);
        assert_eq!(rating.score, "0/10");
        assert_eq!(rating.justification, "Thorough.");
    }

    #[test]
    fn out_of_range_or_non_finite_scores_use_the_default() {
        for reply in ["RATING: NaN", "RATING: inf/10", "RATING: -3/10", "RATING: 12/10", "RATING: 11", "RATING: 5/0"] {
            assert_eq!(parse_rating(reply, 10).score, "0/10", "{reply}");
        }
        assert_eq!(parse_rating("RATING: 10/10", 10).score, "10/10");
        assert_eq!(parse_rating("RATING: 7.5", 10).score, "7.5/10");
    }

    fn sample() -> (Vec<Question>, BTreeMap<usize, Answer>) {
        let questions = vec![
            Question { index: 0, text: "Q0".into() },
            Question { index: 1, text: "Q1".into() },
        ];
        let answers = questions
            .iter()
            .map(|q| {
                (
                    q.index,
                    Answer {
                        question_index: q.index,
                        text: format!("A{}", q.index),
                        submitted_at: Utc::now(),
                    },
                )
            })
            .collect();
        (questions, answers)
    }

    #[tokio::test]
    async fn computes_from_backend_reply() {
        let backend = ScriptedBackend::replying(&["RATING: 8/10\nJUSTIFICATION: Clear and specific.\n"]);
        let gateway = GenerationGateway::new(backend.clone(), fast_settings());
        let (questions, answers) = sample();

        let rating = compute_rating(&gateway, &questions, &answers, 10).await;
        assert_eq!(rating.score, "8/10");
        assert_eq!(rating.justification, "Clear and specific.");

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].text.contains("Q0") && prompts[0].text.contains("A1"));
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_yields_default_rating() {
        let gateway = GenerationGateway::new(ScriptedBackend::failing(), fast_settings());
        let (questions, answers) = sample();

        let rating = compute_rating(&gateway, &questions, &answers, 5).await;
        assert_eq!(rating.score, "0/5");
        assert_eq!(rating.justification, DEFAULT_JUSTIFICATION);
    }
}
