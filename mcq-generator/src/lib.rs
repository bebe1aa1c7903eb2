//! Multiple-choice question generation on top of a chat-completions model.
//!
//! Public API: [`QuestionGenerator`]. It renders a prompt for a
//! [`GenerationSpec`], makes one completion call, and recovers whatever
//! well-formed questions the model produced. Malformed blocks are dropped;
//! call-level failures surface as [`GenerationError`].

pub mod cfg;
pub mod parser;
pub mod prompt;

mod api_types;
mod error;
mod generator;
mod progress;

pub use api_types::{
    DEFAULT_BATCH_SIZE, Difficulty, DifficultyLevel, GenerationSpec, OptionLabel, ParsedQuestion,
    QUESTION_TYPE_MCQ,
};

pub use cfg::GeneratorConfig;

pub use error::{GenerationError, SpecContext};

pub use generator::QuestionGenerator;

pub use parser::ParseReport;

pub use progress::{IndicatifProgress, NoopProgress, Progress};
