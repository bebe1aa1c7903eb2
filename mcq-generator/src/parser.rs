//! MCQ parser: free-form model text → ordered list of [`ParsedQuestion`].
//!
//! Pipeline:
//! 1. Split the raw text on `Q<digits>.` block starts. Each fragment after the
//!    first is re-prefixed with `Q<i>.` where `i` is its 1-based position, so
//!    mislabeled ordinals from the model do not matter. The leading fragment
//!    (empty or preamble) is discarded.
//! 2. Parse every block independently. A block that misses its question text,
//!    its `A.` option marker or its `Answer:` label is dropped; the rest of the
//!    batch is unaffected.
//! 3. Keep the survivors in block order.
//!
//! Markers are literal (`Q\d+.`, `[A-D].`, `Answer:`); no line-based guessing.
//! Extraction runs on the `regex` crate (linear time) and blocks longer than
//! [`MAX_BLOCK_CHARS`] are rejected up front.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::api_types::{OptionLabel, ParsedQuestion};

/// Upper bound for a single block; anything longer is not a real question.
pub const MAX_BLOCK_CHARS: usize = 8_192;

static BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bQ\d+\.").expect("block start pattern"));

/// `A.`..`D.` at line start or after whitespace; the text may follow the dot
/// directly (`A.Berlin`).
static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\s)([A-D])\.").expect("option marker pattern"));

const ANSWER_TOKEN: &str = "Answer:";

static ANSWER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Answer:\s*([A-D])").expect("answer pattern"));

/// Why a block was dropped. Only surfaces in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockRejection {
    TooLong,
    NoOptionMarker,
    EmptyQuestion,
    NoAnswer,
}

/// Yield statistics of one parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Blocks found after segmentation.
    pub blocks: usize,
    /// Blocks turned into questions.
    pub parsed: usize,
    /// Blocks dropped as malformed.
    pub dropped: usize,
}

/// Parse raw model text into questions tagged with `topic`/`difficulty`.
///
/// Never fails: malformed blocks are skipped, text without any `Q<n>.` marker
/// yields an empty list.
///
/// # Example
/// ```
/// use mcq_generator::parser::parse;
/// let raw = "Q1. What is 2+2?\nA. 3\nB. 4\nC. 5\nD. 6\nAnswer: B";
/// let qs = parse(raw, "Math", "easy");
/// assert_eq!(qs.len(), 1);
/// assert_eq!(qs[0].correct_option_text(), Some("4"));
/// ```
pub fn parse(raw: &str, topic: &str, difficulty: &str) -> Vec<ParsedQuestion> {
    parse_with_report(raw, topic, difficulty).0
}

/// Same as [`parse`], also returning how many blocks were kept and dropped.
pub fn parse_with_report(
    raw: &str,
    topic: &str,
    difficulty: &str,
) -> (Vec<ParsedQuestion>, ParseReport) {
    let blocks = split_blocks(raw);
    let questions: Vec<ParsedQuestion> = blocks
        .iter()
        .filter_map(|b| parse_block(b, topic, difficulty))
        .collect();

    let report = ParseReport {
        blocks: blocks.len(),
        parsed: questions.len(),
        dropped: blocks.len() - questions.len(),
    };
    info!(
        blocks = report.blocks,
        parsed = report.parsed,
        dropped = report.dropped,
        "parsed questions from generated content"
    );
    (questions, report)
}

/// Split raw text into `Q<i>.`-prefixed blocks, preamble discarded.
pub fn split_blocks(raw: &str) -> Vec<String> {
    BLOCK_START
        .split(raw)
        .skip(1)
        .enumerate()
        .map(|(i, frag)| format!("Q{}.{}", i + 1, frag))
        .collect()
}

/// Parse one block; `None` if it cannot yield a complete question.
pub fn parse_block(block: &str, topic: &str, difficulty: &str) -> Option<ParsedQuestion> {
    match try_parse_block(block, topic, difficulty) {
        Ok(q) => Some(q),
        Err(reason) => {
            debug!(?reason, block_chars = block.chars().count(), "dropping question block");
            None
        }
    }
}

fn try_parse_block(
    block: &str,
    topic: &str,
    difficulty: &str,
) -> Result<ParsedQuestion, BlockRejection> {
    if block.chars().count() > MAX_BLOCK_CHARS {
        return Err(BlockRejection::TooLong);
    }

    let body_start = BLOCK_START.find(block).map_or(0, |m| m.end());
    let body = &block[body_start..];

    // Question text runs up to the first `A.` marker.
    let first_a = OPTION_MARKER
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .find(|m| m.as_str() == "A")
        .ok_or(BlockRejection::NoOptionMarker)?;
    let question_text = body[..first_a.start()].trim();
    if question_text.is_empty() {
        return Err(BlockRejection::EmptyQuestion);
    }

    let tail = &body[first_a.start()..];
    let correct = ANSWER_LABEL
        .captures(tail)
        .and_then(|c| c[1].chars().next())
        .and_then(|ch| OptionLabel::try_from(ch).ok())
        .ok_or(BlockRejection::NoAnswer)?;

    let options_region = tail.find(ANSWER_TOKEN).map_or(tail, |end| &tail[..end]);
    let options = extract_options(options_region);

    Ok(ParsedQuestion::new(
        question_text.to_string(),
        options,
        correct,
        topic,
        difficulty,
    ))
}

/// Option texts between consecutive markers, in order of appearance.
///
/// Duplicate letters are all kept; empty options stay as `""` so label
/// ordinals keep pointing at the right slot.
fn extract_options(region: &str) -> Vec<String> {
    // Letter spans; the option text starts right after the letter's dot.
    let letters: Vec<_> = OPTION_MARKER
        .captures_iter(region)
        .filter_map(|c| c.get(1))
        .collect();
    letters
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = letters.get(i + 1).map_or(region.len(), |next| next.start());
            region[m.end() + 1..end].trim().to_string()
        })
        .collect()
}
