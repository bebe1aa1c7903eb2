use std::num::NonZeroU32;

use clap::Parser;
use mcq_generator::{Difficulty, GenerationSpec};

/// Command line of the quiz generator.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate multiple-choice quiz questions with an LLM",
    long_about = "Asks a chat-completions model for multiple-choice questions on a topic \
                  and prints the recovered questions as JSON on stdout."
)]
pub struct Cli {
    /// Topic to generate questions about
    #[arg(value_name = "TOPIC", required = true, num_args = 1..)]
    pub topic: Vec<String>,

    /// Difficulty: easy, medium, hard, or any free-form label
    #[arg(short, long, default_value = "medium")]
    pub difficulty: String,

    /// Number of questions to request (defaults to QUIZ_BATCH_SIZE or 10)
    #[arg(short = 'n', long)]
    pub count: Option<NonZeroU32>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Suppress the spinner and summary on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug messages from the quiz crates
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Topic words joined back into one string.
    pub fn topic(&self) -> String {
        self.topic.join(" ")
    }

    /// Generation input, falling back to `default_count` when `--count` is absent.
    pub fn spec(&self, default_count: u32) -> GenerationSpec {
        let count = self
            .count
            .or_else(|| NonZeroU32::new(default_count))
            .unwrap_or(NonZeroU32::MIN);
        GenerationSpec::new(self.topic(), Difficulty::from(self.difficulty.as_str()), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_generator::DifficultyLevel;

    #[test]
    fn parses_multi_word_topic_and_defaults() {
        let cli = Cli::try_parse_from(["quiz-gen-backend", "SQL", "window", "functions"]).unwrap();
        let spec = cli.spec(10);
        assert_eq!(spec.topic, "SQL window functions");
        assert_eq!(spec.difficulty.as_str(), "medium");
        assert_eq!(spec.count.get(), 10);
        assert!(!cli.pretty);
    }

    #[test]
    fn explicit_flags() {
        let cli = Cli::try_parse_from([
            "quiz-gen-backend",
            "--difficulty",
            "Hard",
            "-n",
            "3",
            "--pretty",
            "Rust",
        ])
        .unwrap();
        let spec = cli.spec(10);
        assert_eq!(spec.difficulty.as_str(), "Hard");
        assert_eq!(spec.difficulty.level(), Some(DifficultyLevel::Hard));
        assert_eq!(spec.count.get(), 3);
        assert!(cli.pretty);
    }

    #[test]
    fn rejects_zero_count_and_missing_topic() {
        assert!(Cli::try_parse_from(["quiz-gen-backend", "-n", "0", "Rust"]).is_err());
        assert!(Cli::try_parse_from(["quiz-gen-backend"]).is_err());
    }
}
