//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_PROVIDER`         = `huggingface` (default) or `openai`
//! - `HUGGINGFACE_API_KEY`  = bearer token (mandatory)
//! - `HUGGINGFACE_MODEL_ID` = model identifier (mandatory)
//! - `HUGGINGFACE_API_URL`  = chat completions URL (optional, provider default)
//! - `LLM_MAX_TOKENS`       = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`     = optional request timeout (u64, default 60)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{QuizLlmError, env_opt_u32, env_opt_u64, must_env, validate_http_endpoint},
};

/// Request timeout applied when `LLM_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the generation config from environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if the key or model id is missing
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::InvalidFormat`] if the URL is not http/https
/// - [`ConfigError::InvalidNumber`] for malformed numeric knobs
pub fn config_from_env() -> Result<LlmModelConfig, QuizLlmError> {
    let provider = match std::env::var("LLM_PROVIDER") {
        Ok(v) if !v.trim().is_empty() => v.parse::<LlmProvider>()?,
        _ => LlmProvider::default(),
    };

    let api_key = must_env("HUGGINGFACE_API_KEY")?;
    let model = must_env("HUGGINGFACE_MODEL_ID")?;

    let endpoint = std::env::var("HUGGINGFACE_API_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("HUGGINGFACE_API_URL", &endpoint)?;

    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        timeout_secs: Some(timeout_secs),
    })
}
