//! Public API types re-used by external crates (persistence, HTTP layers).

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

/// Nominal number of questions per generation batch.
pub const DEFAULT_BATCH_SIZE: u32 = 10;

/// Type tag carried by every parsed question.
pub const QUESTION_TYPE_MCQ: &str = "MCQ";

/// Requested difficulty, kept exactly as the caller wrote it.
///
/// The label goes verbatim into the prompt and the output records;
/// [`Difficulty::level`] recognizes the three presets without altering it.
///
/// # Example
/// ```
/// use mcq_generator::{Difficulty, DifficultyLevel};
/// let d = Difficulty::from("Hard");
/// assert_eq!(d.as_str(), "Hard");
/// assert_eq!(d.level(), Some(DifficultyLevel::Hard));
/// assert_eq!(Difficulty::from("interview level").level(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Difficulty(String);

/// Preset difficulty levels offered to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Preset matched case-insensitively, surrounding whitespace ignored.
    pub fn level(&self) -> Option<DifficultyLevel> {
        match self.0.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(DifficultyLevel::Easy),
            "medium" => Some(DifficultyLevel::Medium),
            "hard" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }
}

impl From<DifficultyLevel> for Difficulty {
    fn from(level: DifficultyLevel) -> Self {
        Difficulty(level.as_str().to_string())
    }
}

impl From<&str> for Difficulty {
    fn from(s: &str) -> Self {
        Difficulty(s.to_string())
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Difficulty(s)
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Difficulty::from(s))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable input of one generation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSpec {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: NonZeroU32,
}

impl GenerationSpec {
    pub fn new(topic: impl Into<String>, difficulty: impl Into<Difficulty>, count: NonZeroU32) -> Self {
        Self {
            topic: topic.into(),
            difficulty: difficulty.into(),
            count,
        }
    }

    /// Spec with the nominal batch size of [`DEFAULT_BATCH_SIZE`].
    pub fn with_default_count(topic: impl Into<String>, difficulty: impl Into<Difficulty>) -> Self {
        let count = NonZeroU32::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroU32::MIN);
        Self::new(topic, difficulty, count)
    }
}

/// Position label of an option (`A`..`D`), not its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// Zero-based index into an option list (A=0, B=1, …).
    pub fn ordinal(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }
}

impl TryFrom<char> for OptionLabel {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'A' => Ok(OptionLabel::A),
            'B' => Ok(OptionLabel::B),
            'C' => Ok(OptionLabel::C),
            'D' => Ok(OptionLabel::D),
            other => Err(other),
        }
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    /// Accepts a single letter, case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                OptionLabel::try_from(c.to_ascii_uppercase()).map_err(|_| t.to_string())
            }
            _ => Err(t.to_string()),
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One multiple-choice question recovered from model output.
///
/// Only the parser builds these; the caller owns them afterwards. Serialized
/// with the field names persistence collaborators expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestion {
    question_text: String,
    options: Vec<String>,
    correct_option: Option<OptionLabel>,
    topic: String,
    difficulty: String,
    #[serde(rename = "type")]
    question_type: String,
}

impl ParsedQuestion {
    pub(crate) fn new(
        question_text: String,
        options: Vec<String>,
        correct_option: OptionLabel,
        topic: &str,
        difficulty: &str,
    ) -> Self {
        Self {
            question_text,
            options,
            correct_option: Some(correct_option),
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            question_type: QUESTION_TYPE_MCQ.to_string(),
        }
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    /// Option texts in the order the model emitted them; may hold fewer than 4.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> Option<OptionLabel> {
        self.correct_option
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn question_type(&self) -> &str {
        &self.question_type
    }

    /// Text of the correct option, resolved by label ordinal.
    ///
    /// `None` when the label is missing or points past a short option list.
    pub fn correct_option_text(&self) -> Option<&str> {
        let label = self.correct_option?;
        self.options.get(label.ordinal()).map(String::as_str)
    }

    /// Checks a submitted answer label against the correct one.
    pub fn is_correct(&self, selected: &str) -> bool {
        match (selected.parse::<OptionLabel>(), self.correct_option) {
            (Ok(sel), Some(correct)) => sel == correct,
            _ => false,
        }
    }
}
