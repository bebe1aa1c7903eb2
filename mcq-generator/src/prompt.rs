//! Prompt builder: fixed system persona + templated MCQ instruction.
//!
//! The user template promises the model a strict layout (`Q<n>.`, four
//! `<Letter>.` lines, `Answer: <Letter>`). The parser relies on those markers
//! but never trusts the promise.

use quiz_llm_service::ChatMessage;

/// Generator persona and quality bar.
pub const SYSTEM_PROMPT: &str = "You are a technical quiz generator specialized in creating \
multiple-choice questions on technical topics. Create clear and precise questions that test \
understanding, not just memorization.";

/// Sampling temperature for question generation.
pub const TEMPERATURE: f32 = 0.7;
/// Nucleus sampling cutoff.
pub const TOP_P: f32 = 0.9;
/// Token ceiling sized for a full batch of questions.
pub const MAX_TOKENS: u32 = 2048;

/// Fixed sampling parameters sent with every generation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Rendered prompt: `[system, user]` messages plus sampling parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptBundle {
    pub messages: Vec<ChatMessage>,
    pub sampling: SamplingParams,
}

/// Build the generation request for `count` questions on `topic` at `difficulty`.
///
/// Pure: same inputs, same bundle. `topic` and `difficulty` are echoed verbatim.
///
/// # Example
/// ```
/// use mcq_generator::prompt::build_request;
/// let bundle = build_request("SQL joins", "medium", 10);
/// assert_eq!(bundle.messages.len(), 2);
/// assert!(bundle.messages[1].content.contains("SQL joins"));
/// ```
pub fn build_request(topic: &str, difficulty: &str, count: u32) -> PromptBundle {
    PromptBundle {
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(topic, difficulty, count)),
        ],
        sampling: SamplingParams::default(),
    }
}

/// User instruction with the exact layout the parser expects.
pub fn build_user_prompt(topic: &str, difficulty: &str, count: u32) -> String {
    format!(
        "Generate {count} multiple choice questions on {topic} with {difficulty} difficulty level. Format:\n\
         Q1. Question?\n\
         A. Option1\n\
         B. Option2\n\
         C. Option3\n\
         D. Option4\n\
         Answer: [Correct Option]\n\n\
         Questions should be technical, precise, and test understanding, not just memorization. \
         Each question must have exactly one correct answer. \
         Do not provide explanations. Only output in the format specified above."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_llm_service::Role;

    #[test]
    fn two_messages_system_first() {
        let b = build_request("Operating Systems", "hard", 7);
        assert_eq!(b.messages.len(), 2);
        assert_eq!(b.messages[0].role, Role::System);
        assert_eq!(b.messages[1].role, Role::User);
        assert!(b.messages[0].content.contains("test understanding, not just memorization"));
    }

    #[test]
    fn user_message_echoes_inputs() {
        for (topic, difficulty, count) in [
            ("Java OOP", "easy", 1u32),
            ("SQL", "medium", 10),
            ("Kubernetes networking", "staff-level", 250),
        ] {
            let b = build_request(topic, difficulty, count);
            let user = &b.messages[1].content;
            assert!(user.contains(&count.to_string()));
            assert!(user.contains(topic));
            assert!(user.contains(difficulty));
        }
    }

    #[test]
    fn layout_and_constraints_are_spelled_out() {
        let user = build_user_prompt("Rust", "easy", 3);
        assert!(user.starts_with("Generate 3 multiple choice questions on Rust with easy"));
        for marker in ["Q1. ", "\nA. ", "\nB. ", "\nC. ", "\nD. ", "\nAnswer: "] {
            assert!(user.contains(marker), "missing {marker:?}");
        }
        assert!(user.contains("Do not provide explanations"));
    }

    #[test]
    fn fixed_sampling_and_deterministic() {
        let a = build_request("Networking", "easy", 5);
        let b = build_request("Networking", "easy", 5);
        assert_eq!(a, b);
        assert_eq!(a.sampling.temperature, 0.7);
        assert_eq!(a.sampling.top_p, 0.9);
        assert_eq!(a.sampling.max_tokens, 2048);
    }
}
