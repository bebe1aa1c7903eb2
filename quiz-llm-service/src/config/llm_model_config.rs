use std::fmt;

use crate::config::llm_provider::LlmProvider;

/// Configuration for a chat-completions backend.
///
/// The model identifier lives here and only here; request builders read it
/// from the config instead of carrying their own default.
///
/// # Fields
///
/// - `provider`: Which backend to call.
/// - `model`: The model identifier (e.g., `"meta-llama/Llama-3.1-8B-Instruct"`).
/// - `endpoint`: Full chat completions URL.
/// - `api_key`: Bearer token. Never printed by `Debug`.
/// - `max_tokens`: Optional override of the generation token ceiling.
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// The backend serving completions.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Chat completions URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate (overrides the prompt default).
    pub max_tokens: Option<u32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
