pub mod domain;
pub mod gateway;
pub mod ports;
pub mod prompts;
pub mod questions;
pub mod rating;
pub mod session;
pub mod summary;

pub use domain::{
    Answer, Briefing, Feedback, Question, Rating, SessionStatus, Summary, ValidationError,
};
pub use gateway::{
    FailureKind, GatewaySettings, Generation, GenerationFailure, GenerationGateway,
    GENERATION_PLACEHOLDER,
};
pub use ports::{DocumentTextExtractor, PortError, PortResult, TextGenerationService};
pub use prompts::{Prompt, PromptKind};
pub use session::{InterviewSession, SessionError, SessionSettings, SubmissionOutcome};
