use std::fmt;
use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) serving chat completions.
///
/// Both speak the OpenAI-compatible `/v1/chat/completions` protocol; they only
/// differ in their default endpoint.
///
/// # Examples
///
/// ```
/// use quiz_llm_service::config::llm_provider::LlmProvider;
///
/// let p: LlmProvider = "huggingface".parse().unwrap();
/// assert_eq!(p, LlmProvider::HuggingFace);
/// assert!(p.default_endpoint().starts_with("https://"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// Hugging Face inference router.
    #[default]
    HuggingFace,
    /// OpenAI API or any OpenAI-compatible server.
    OpenAI,
}

impl LlmProvider {
    /// Chat completions URL used when no endpoint is configured.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::HuggingFace => "https://router.huggingface.co/v1/chat/completions",
            LlmProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::HuggingFace => f.write_str("HuggingFace"),
            LlmProvider::OpenAI => f.write_str("OpenAI"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(LlmProvider::HuggingFace),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
