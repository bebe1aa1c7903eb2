//! Runtime configuration loaded from environment variables.

use quiz_llm_service::{LlmModelConfig, QuizLlmError, config_from_env};

use crate::api_types::DEFAULT_BATCH_SIZE;

/// Config bag for the generator.
///
/// `llm` is strict (missing key or model is an error); `batch_size` falls back
/// to [`DEFAULT_BATCH_SIZE`] when `QUIZ_BATCH_SIZE` is unset, zero or garbage.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub llm: LlmModelConfig,
    pub batch_size: u32,
}

impl GeneratorConfig {
    /// Build from environment variables.
    ///
    /// # Errors
    /// Propagates [`QuizLlmError::Config`] from the LLM settings.
    pub fn from_env() -> Result<Self, QuizLlmError> {
        Ok(Self {
            llm: config_from_env()?,
            batch_size: batch_size_from_env(),
        })
    }
}

/// `QUIZ_BATCH_SIZE`, or [`DEFAULT_BATCH_SIZE`].
pub fn batch_size_from_env() -> u32 {
    match parse("QUIZ_BATCH_SIZE", DEFAULT_BATCH_SIZE) {
        0 => DEFAULT_BATCH_SIZE,
        n => n,
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_fallbacks() {
        // SAFETY: no other test in this crate reads QUIZ_BATCH_SIZE.
        unsafe { std::env::remove_var("QUIZ_BATCH_SIZE") };
        assert_eq!(batch_size_from_env(), DEFAULT_BATCH_SIZE);

        unsafe { std::env::set_var("QUIZ_BATCH_SIZE", "25") };
        assert_eq!(batch_size_from_env(), 25);

        unsafe { std::env::set_var("QUIZ_BATCH_SIZE", "0") };
        assert_eq!(batch_size_from_env(), DEFAULT_BATCH_SIZE);

        unsafe { std::env::set_var("QUIZ_BATCH_SIZE", "lots") };
        assert_eq!(batch_size_from_env(), DEFAULT_BATCH_SIZE);

        unsafe { std::env::remove_var("QUIZ_BATCH_SIZE") };
    }
}
