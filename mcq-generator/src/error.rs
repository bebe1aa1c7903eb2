//! Typed error for the mcq-generator crate.
//!
//! Block-level parse failures never show up here; they only reduce yield.
//! Call-level failures are a closed set, each carrying the request context
//! (topic, difficulty, count) and the underlying cause.

use std::fmt;

use quiz_llm_service::{EnvelopeError, ProviderError, ProviderErrorKind};
use thiserror::Error;

use crate::api_types::GenerationSpec;

/// Request parameters attached to every failure. No credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecContext {
    pub topic: String,
    pub difficulty: String,
    pub count: u32,
}

impl From<&GenerationSpec> for SpecContext {
    fn from(spec: &GenerationSpec) -> Self {
        Self {
            topic: spec.topic.clone(),
            difficulty: spec.difficulty.to_string(),
            count: spec.count.get(),
        }
    }
}

impl fmt::Display for SpecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "topic={:?}, difficulty={:?}, count={}",
            self.topic, self.difficulty, self.count
        )
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credential rejected by the model provider. Needs operator action.
    #[error("API token has been exhausted or is invalid [{context}]: {source}")]
    Unauthorized {
        context: SpecContext,
        source: ProviderError,
    },

    /// Upstream generation exceeded its deadline. Safe to retry with backoff.
    #[error("the model request timed out [{context}]: {source}")]
    Timeout {
        context: SpecContext,
        source: ProviderError,
    },

    /// Network/protocol failure or unexpected upstream status.
    #[error("transport error [{context}]: {source}")]
    Transport {
        context: SpecContext,
        source: ProviderError,
    },

    /// Response received but structurally unexpected.
    #[error("error parsing the response [{context}]: {source}")]
    Envelope {
        context: SpecContext,
        source: EnvelopeError,
    },

    /// Request could not be encoded. Programming or config error.
    #[error("request serialization failed [{context}]: {source}")]
    Serialization {
        context: SpecContext,
        source: ProviderError,
    },
}

impl GenerationError {
    /// Sorts a provider failure into the taxonomy.
    pub(crate) fn from_provider(context: SpecContext, source: ProviderError) -> Self {
        let kind = &source.kind;
        if matches!(
            kind,
            ProviderErrorKind::Unauthorized(_) | ProviderErrorKind::MissingApiKey
        ) {
            GenerationError::Unauthorized { context, source }
        } else if matches!(kind, ProviderErrorKind::Timeout(_)) {
            GenerationError::Timeout { context, source }
        } else if matches!(kind, ProviderErrorKind::Encode(_)) {
            GenerationError::Serialization { context, source }
        } else {
            GenerationError::Transport { context, source }
        }
    }

    pub(crate) fn envelope(context: SpecContext, source: EnvelopeError) -> Self {
        GenerationError::Envelope { context, source }
    }

    pub fn context(&self) -> &SpecContext {
        match self {
            GenerationError::Unauthorized { context, .. }
            | GenerationError::Timeout { context, .. }
            | GenerationError::Transport { context, .. }
            | GenerationError::Envelope { context, .. }
            | GenerationError::Serialization { context, .. } => context,
        }
    }

    /// Whether a caller may retry the same request (with backoff).
    ///
    /// Timeouts always; transport failures unless the upstream answered with a
    /// 4xx status.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } => true,
            GenerationError::Transport { source, .. } => match &source.kind {
                ProviderErrorKind::HttpStatus(h) => !h.status.is_client_error(),
                _ => true,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_llm_service::{HttpError, LlmProvider, StatusCode};

    fn ctx() -> SpecContext {
        SpecContext {
            topic: "SQL".into(),
            difficulty: "hard".into(),
            count: 10,
        }
    }

    fn http(status: StatusCode) -> HttpError {
        HttpError {
            status,
            url: "https://router.huggingface.co/v1/chat/completions".into(),
            snippet: String::new(),
        }
    }

    fn provider(kind: ProviderErrorKind) -> ProviderError {
        ProviderError::new(LlmProvider::HuggingFace, kind)
    }

    #[test]
    fn maps_provider_kinds() {
        let e = GenerationError::from_provider(
            ctx(),
            provider(ProviderErrorKind::Unauthorized(http(StatusCode::UNAUTHORIZED))),
        );
        assert!(matches!(e, GenerationError::Unauthorized { .. }));
        assert!(!e.is_retryable());

        let e = GenerationError::from_provider(ctx(), provider(ProviderErrorKind::Timeout(None)));
        assert!(matches!(e, GenerationError::Timeout { .. }));
        assert!(e.is_retryable());

        let e = GenerationError::from_provider(
            ctx(),
            provider(ProviderErrorKind::Encode("NaN".into())),
        );
        assert!(matches!(e, GenerationError::Serialization { .. }));

        let e = GenerationError::from_provider(
            ctx(),
            provider(ProviderErrorKind::Network("connection reset".into())),
        );
        assert!(matches!(e, GenerationError::Transport { .. }));
        assert!(e.is_retryable());

        let e = GenerationError::from_provider(
            ctx(),
            provider(ProviderErrorKind::HttpStatus(http(StatusCode::BAD_REQUEST))),
        );
        assert!(!e.is_retryable());
    }

    #[test]
    fn message_carries_context() {
        let e = GenerationError::envelope(ctx(), EnvelopeError::NoChoices);
        let msg = e.to_string();
        assert!(msg.contains("topic=\"SQL\""));
        assert!(msg.contains("count=10"));
        assert_eq!(e.context().difficulty, "hard");
    }
}
