//! Chat-completions plumbing shared by the quiz generator.
//!
//! - [`config`]: env-driven [`LlmModelConfig`] (model id, endpoint, key, limits)
//! - [`envelope`]: request/response wire shapes and content extraction
//! - [`transport`]: the [`ChatTransport`] seam
//! - [`services`]: the reqwest-backed [`ChatCompletionsService`]
//! - [`error_handler`]: unified errors and env helpers
//! - [`telemetry`]: crate-scoped `tracing-subscriber` layer

pub mod config;
pub mod envelope;
pub mod error_handler;
pub mod services;
pub mod telemetry;
pub mod transport;

pub use config::{
    default_config::config_from_env, llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
};
pub use envelope::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, RawCompletion, Role,
    extract_content,
};
pub use error_handler::{
    ConfigError, EnvelopeError, HttpError, ProviderError, ProviderErrorKind, QuizLlmError,
    StatusCode,
};
pub use services::chat_completions_service::ChatCompletionsService;
pub use transport::ChatTransport;
