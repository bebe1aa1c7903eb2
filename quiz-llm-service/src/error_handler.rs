//! Unified error handling for `quiz-llm-service`.
//!
//! This module exposes a single top-level error type [`QuizLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`], [`EnvelopeError`]). Small helpers for reading/validating
//! environment variables are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[Quiz LLM Service]` to simplify attribution in logs.

pub use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, QuizLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `quiz-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum QuizLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream call failed (status, network, timeout, encoding).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Response arrived but its envelope is not what we expect.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Quiz LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, timeouts).
    #[error("[Quiz LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_PROVIDER`.
    #[error("[Quiz LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Quiz LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `HUGGINGFACE_API_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[Quiz LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[Quiz LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-successful HTTP exchange with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    /// HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// What went wrong while talking to a provider.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// API key is absent.
    #[error("missing API key")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Credentials were rejected (HTTP 401/403).
    #[error("API token has been exhausted or is invalid ({0})")]
    Unauthorized(HttpError),

    /// Upstream generation exceeded its deadline (HTTP 504/408 or client timeout).
    #[error("the model request timed out{}", .0.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
    Timeout(Option<HttpError>),

    /// Any other non-success status.
    #[error("{0}")]
    HttpStatus(HttpError),

    /// Network/protocol failure without a usable status (DNS, connect, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Request body could not be encoded.
    #[error("request encoding failed: {0}")]
    Encode(String),

    /// HTTP client could not be built or configured.
    #[error("client setup failed: {0}")]
    ClientSetup(String),
}

/// Provider-scoped error: which backend failed, and how.
#[derive(Debug, Error)]
#[error("[Quiz LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    /// Backend that produced the error.
    pub provider: LlmProvider,
    /// Failure class.
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }

    /// Maps a `reqwest` transport error into a provider error.
    ///
    /// Client-side deadlines become [`ProviderErrorKind::Timeout`], everything
    /// else is a [`ProviderErrorKind::Network`] failure.
    pub fn from_reqwest(provider: LlmProvider, e: &reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            ProviderErrorKind::Timeout(None)
        } else {
            ProviderErrorKind::Network(e.to_string())
        };
        Self::new(provider, kind)
    }
}

/// Classifies a non-success upstream status.
///
/// - 401/403 → [`ProviderErrorKind::Unauthorized`]
/// - 504/408 → [`ProviderErrorKind::Timeout`]
/// - anything else → [`ProviderErrorKind::HttpStatus`]
pub fn classify_status(status: StatusCode, url: &str, body: &str) -> ProviderErrorKind {
    let http = HttpError {
        status,
        url: url.to_string(),
        snippet: make_snippet(body),
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Unauthorized(http),
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => {
            ProviderErrorKind::Timeout(Some(http))
        }
        _ => ProviderErrorKind::HttpStatus(http),
    }
}

/* ------------------------------------------------------------------------- */
/* Envelope errors                                                           */
/* ------------------------------------------------------------------------- */

/// The response body was received but is structurally unexpected.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// `choices` is missing or empty.
    #[error("[Quiz LLM Service] no choices found in response")]
    NoChoices,

    /// First choice has no `message` object.
    #[error("[Quiz LLM Service] no message found in response")]
    NoMessage,

    /// `message.content` is absent, empty or whitespace only.
    #[error("[Quiz LLM Service] empty content in response")]
    EmptyContent,

    /// Body is not valid JSON for a chat completion.
    #[error("[Quiz LLM Service] error parsing the response: {0}")]
    Malformed(String),
}

/* ------------------------------------------------------------------------- */
/* Snippets                                                                  */
/* ------------------------------------------------------------------------- */

const SNIPPET_MAX_CHARS: usize = 240;

/// Compacts an upstream body into a single-line snippet for logs and errors.
pub fn make_snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_MAX_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{cut}…")
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`QuizLlmError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            QuizLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            QuizLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with a
/// valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// Used for sampling parameters like `temperature` (`0.0..=2.0`) and `top_p`
/// (`0.0..=1.0`).
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]` or not finite.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}
