//! Chat-completions HTTP client (Hugging Face router / OpenAI-compatible).
//!
//! Minimal, non-streaming client: one `POST {endpoint}` per request, the body
//! is the caller-built [`ChatCompletionRequest`].
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.model` must not be empty
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Failures are classified into [`ProviderErrorKind`] (unauthorized, timeout,
//! status, network, encoding) so callers can surface a closed taxonomy.

use std::time::{Duration, Instant};

use reqwest::header;
use tracing::{debug, error, info, instrument};

use crate::{
    config::{default_config::DEFAULT_TIMEOUT_SECS, llm_model_config::LlmModelConfig},
    envelope::ChatCompletionRequest,
    error_handler::{
        ConfigError, ProviderError, ProviderErrorKind, QuizLlmError, classify_status,
        validate_range_f32,
    },
    transport::ChatTransport,
};

/// Thin client for a chat-completions endpoint.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (timeout and default headers, including
/// the bearer token).
#[derive(Debug)]
pub struct ChatCompletionsService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
}

impl ChatCompletionsService {
    /// Creates a new [`ChatCompletionsService`] from the given config.
    ///
    /// # Errors
    /// - [`QuizLlmError::Config`] with `EmptyModel` if `cfg.model` is blank
    /// - [`QuizLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`QuizLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`QuizLlmError::Provider`] with `ClientSetup` if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, QuizLlmError> {
        let provider = cfg.provider;

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(provider, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            ProviderError::new(
                provider,
                ProviderErrorKind::ClientSetup("API key is not a valid header value".into()),
            )
        })?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ProviderError::new(provider, ProviderErrorKind::ClientSetup(e.to_string()))
            })?;

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "ChatCompletionsService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    async fn post(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let provider = self.cfg.provider;
        let started = Instant::now();

        validate_range_f32("temperature", request.temperature, 0.0, 2.0)
            .and_then(|_| validate_range_f32("top_p", request.top_p, 0.0, 1.0))
            .map_err(|e| ProviderError::new(provider, ProviderErrorKind::Encode(e.to_string())))?;

        let payload = serde_json::to_vec(request).map_err(|e| {
            ProviderError::new(provider, ProviderErrorKind::Encode(e.to_string()))
        })?;

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            payload_bytes = payload.len(),
            "POST {}", self.cfg.endpoint
        );

        let resp = self
            .client
            .post(&self.cfg.endpoint)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    timeout = e.is_timeout(),
                    latency_ms = started.elapsed().as_millis(),
                    "chat completions request failed before a response"
                );
                ProviderError::from_reqwest(provider, &e)
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

        if !status.is_success() {
            let kind = classify_status(status, &self.cfg.endpoint, &text);
            error!(
                %status,
                endpoint = %self.cfg.endpoint,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completions returned non-success status: {kind}"
            );
            return Err(ProviderError::new(provider, kind));
        }

        info!(
            model = %self.cfg.model,
            body_bytes = text.len(),
            latency_ms = started.elapsed().as_millis(),
            "chat completion received"
        );

        Ok(text)
    }
}

impl ChatTransport for ChatCompletionsService {
    #[instrument(level = "debug", skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        self.post(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::HuggingFace,
            model: "mistralai/Mistral-7B-Instruct-v0.3".into(),
            endpoint: "https://router.huggingface.co/v1/chat/completions".into(),
            api_key: Some("hf_test".into()),
            max_tokens: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn builds_with_valid_config() {
        let svc = ChatCompletionsService::new(cfg()).unwrap();
        assert_eq!(svc.config().model, "mistralai/Mistral-7B-Instruct-v0.3");
    }

    #[test]
    fn rejects_missing_key() {
        let mut c = cfg();
        c.api_key = None;
        let err = ChatCompletionsService::new(c).unwrap_err();
        assert!(matches!(
            err,
            QuizLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_endpoint_and_model() {
        let mut c = cfg();
        c.endpoint = "router.huggingface.co".into();
        assert!(matches!(
            ChatCompletionsService::new(c).unwrap_err(),
            QuizLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            })
        ));

        let mut c = cfg();
        c.model = "  ".into();
        assert!(matches!(
            ChatCompletionsService::new(c).unwrap_err(),
            QuizLlmError::Config(ConfigError::EmptyModel)
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let mut c = cfg();
        // Port 9 (discard) on loopback is closed in test environments.
        c.endpoint = "http://127.0.0.1:9/v1/chat/completions".into();
        let svc = ChatCompletionsService::new(c).unwrap();
        let req = ChatCompletionRequest {
            model: "m".into(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: 16,
            top_p: 0.9,
        };
        let err = svc.complete(&req).await.unwrap_err();
        assert!(matches!(
            err.kind,
            ProviderErrorKind::Network(_) | ProviderErrorKind::Timeout(None)
        ));
    }

    #[tokio::test]
    async fn out_of_range_sampling_is_an_encode_error() {
        let svc = ChatCompletionsService::new(cfg()).unwrap();
        let req = ChatCompletionRequest {
            model: "m".into(),
            messages: vec![],
            temperature: 3.5,
            max_tokens: 16,
            top_p: 0.9,
        };
        let err = svc.complete(&req).await.unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::Encode(_)));
    }
}
