//! Generation orchestrator: prompt -> one chat completion -> parsed questions.
//!
//! Exactly one upstream call per [`QuestionGenerator::generate`]. No retries
//! and no top-up when the model returns fewer questions than requested.

use std::num::NonZeroU32;

use quiz_llm_service::{
    ChatCompletionRequest, ChatCompletionsService, ChatTransport, LlmModelConfig, QuizLlmError,
    extract_content,
};
use tracing::{info, instrument, warn};

use crate::{
    api_types::{DEFAULT_BATCH_SIZE, Difficulty, GenerationSpec, ParsedQuestion},
    error::{GenerationError, SpecContext},
    parser,
    progress::{NoopProgress, Progress},
    prompt,
};

/// Turns a [`GenerationSpec`] into questions using a chat transport.
///
/// The model identifier comes from configuration; the generator has no
/// default of its own.
///
/// # Example
/// ```no_run
/// # use mcq_generator::{GenerationSpec, QuestionGenerator};
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cfg = quiz_llm_service::config_from_env()?;
/// let generator = QuestionGenerator::from_config(cfg)?;
/// let questions = generator
///     .generate(&GenerationSpec::with_default_count("SQL joins", "medium"))
///     .await?;
/// println!("{} questions", questions.len());
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct QuestionGenerator<T> {
    transport: T,
    model: String,
    max_tokens: Option<u32>,
}

impl<T: ChatTransport> QuestionGenerator<T> {
    pub fn new(transport: T, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            max_tokens: None,
        }
    }

    /// Overrides the prompt's token ceiling.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request body for `spec`, exactly as it will be sent.
    pub fn build_request(&self, spec: &GenerationSpec) -> ChatCompletionRequest {
        let bundle = prompt::build_request(
            &spec.topic,
            spec.difficulty.as_str(),
            spec.count.get(),
        );
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: bundle.messages,
            temperature: bundle.sampling.temperature,
            max_tokens: self.max_tokens.unwrap_or(bundle.sampling.max_tokens),
            top_p: bundle.sampling.top_p,
        }
    }

    /// Generates up to `spec.count` questions.
    ///
    /// An empty list is a valid outcome (the model produced nothing
    /// parseable). The list may also be shorter or longer than requested.
    ///
    /// # Errors
    /// One of the [`GenerationError`] variants, always carrying the requested
    /// topic, difficulty and count.
    pub async fn generate(
        &self,
        spec: &GenerationSpec,
    ) -> Result<Vec<ParsedQuestion>, GenerationError> {
        self.generate_with_progress(spec, &NoopProgress).await
    }

    /// Same as [`generate`](Self::generate), reporting stages to `progress`.
    #[instrument(
        level = "info",
        skip_all,
        fields(topic = %spec.topic, difficulty = %spec.difficulty, count = spec.count.get())
    )]
    pub async fn generate_with_progress(
        &self,
        spec: &GenerationSpec,
        progress: &dyn Progress,
    ) -> Result<Vec<ParsedQuestion>, GenerationError> {
        progress.set_total(3);

        progress.step("building prompt");
        let request = self.build_request(spec);

        progress.step("waiting for model");
        let body = self.transport.complete(&request).await.map_err(|e| {
            let err = GenerationError::from_provider(SpecContext::from(spec), e);
            warn!(error = %err, retryable = err.is_retryable(), "generation call failed");
            err
        })?;

        let content = extract_content(&body).map_err(|e| {
            let err = GenerationError::envelope(SpecContext::from(spec), e);
            warn!(error = %err, "unexpected completion envelope");
            err
        })?;

        progress.step("parsing questions");
        let (questions, report) =
            parser::parse_with_report(content.as_str(), &spec.topic, spec.difficulty.as_str());

        if questions.len() != spec.count.get() as usize {
            info!(
                requested = spec.count.get(),
                returned = questions.len(),
                dropped = report.dropped,
                "question count differs from request"
            );
        }
        progress.finish(&format!("{} questions", questions.len()));

        Ok(questions)
    }

    /// Generates a batch of [`DEFAULT_BATCH_SIZE`] questions.
    pub async fn generate_default(
        &self,
        topic: &str,
        difficulty: impl Into<Difficulty>,
    ) -> Result<Vec<ParsedQuestion>, GenerationError> {
        let count = NonZeroU32::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroU32::MIN);
        self.generate(&GenerationSpec::new(topic, difficulty, count))
            .await
    }
}

impl QuestionGenerator<ChatCompletionsService> {
    /// Builds the HTTP-backed generator from a loaded config.
    ///
    /// # Errors
    /// Fails when the config has no API key, a blank model, or a bad endpoint.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, QuizLlmError> {
        let model = cfg.model.clone();
        let max_tokens = cfg.max_tokens;
        let service = ChatCompletionsService::new(cfg)?;
        Ok(Self::new(service, model).with_max_tokens(max_tokens))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use quiz_llm_service::{
        EnvelopeError, LlmProvider, ProviderError, ProviderErrorKind, Role, StatusCode,
    };

    const MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";

    /// Replays one scripted reply and records the request it received.
    struct ScriptedTransport {
        reply: Mutex<Option<Result<String, ProviderError>>>,
        seen: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedTransport {
        fn ok(body: &str) -> Self {
            Self::with(Ok(body.to_string()))
        }

        fn failing(kind: ProviderErrorKind) -> Self {
            Self::with(Err(ProviderError::new(LlmProvider::HuggingFace, kind)))
        }

        fn with(reply: Result<String, ProviderError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl ChatTransport for ScriptedTransport {
        async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn envelope(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    fn http(status: StatusCode) -> quiz_llm_service::HttpError {
        quiz_llm_service::HttpError {
            status,
            url: "https://router.huggingface.co/v1/chat/completions".into(),
            snippet: String::new(),
        }
    }

    fn spec(count: u32) -> GenerationSpec {
        GenerationSpec::new("SQL", "hard", NonZeroU32::new(count).unwrap())
    }

    const TWO_QUESTIONS: &str = "Here you go:\n\
        Q1. Which clause filters groups?\nA. WHERE\nB. HAVING\nC. ORDER BY\nD. LIMIT\nAnswer: B\n\n\
        Q2. Which join keeps unmatched left rows?\nA. INNER\nB. CROSS\nC. LEFT\nD. SELF\nAnswer: C\n";

    #[tokio::test]
    async fn generates_and_tags_questions() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(&envelope(TWO_QUESTIONS)), MODEL);
        let qs = generator.generate(&spec(2)).await.unwrap();

        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].correct_option_text(), Some("HAVING"));
        assert_eq!(qs[1].correct_option_text(), Some("LEFT"));
        assert!(qs.iter().all(|q| q.topic() == "SQL" && q.difficulty() == "hard"));
        assert_eq!(generator.transport().calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_model_prompt_and_sampling() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(&envelope(TWO_QUESTIONS)), MODEL);
        generator.generate(&spec(7)).await.unwrap();

        let seen = generator.transport().seen.lock().unwrap();
        let req = &seen[0];
        assert_eq!(req.model, MODEL);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert!(req.messages[1].content.starts_with("Generate 7 multiple choice questions on SQL"));
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.top_p, 0.9);
        assert_eq!(req.max_tokens, 2048);
    }

    #[test]
    fn max_tokens_override() {
        let generator =
            QuestionGenerator::new(ScriptedTransport::ok(""), MODEL).with_max_tokens(Some(512));
        assert_eq!(generator.build_request(&spec(3)).max_tokens, 512);
    }

    #[tokio::test]
    async fn fewer_questions_than_requested_is_success() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(&envelope(TWO_QUESTIONS)), MODEL);
        let qs = generator.generate(&spec(10)).await.unwrap();
        assert_eq!(qs.len(), 2);
    }

    #[tokio::test]
    async fn unparseable_content_yields_empty_list() {
        let generator = QuestionGenerator::new(
            ScriptedTransport::ok(&envelope("Sorry, I can't help with that.")),
            MODEL,
        );
        let qs = generator.generate(&spec(5)).await.unwrap();
        assert!(qs.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_is_reported_with_context() {
        let generator = QuestionGenerator::new(
            ScriptedTransport::failing(ProviderErrorKind::Unauthorized(http(
                StatusCode::UNAUTHORIZED,
            ))),
            MODEL,
        );
        let err = generator.generate(&spec(10)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unauthorized { .. }));
        assert_eq!(err.context().topic, "SQL");
        assert_eq!(err.context().difficulty, "hard");
        assert_eq!(err.context().count, 10);
        assert_eq!(generator.transport().calls(), 1);
    }

    #[tokio::test]
    async fn gateway_timeout_is_timeout() {
        let generator = QuestionGenerator::new(
            ScriptedTransport::failing(ProviderErrorKind::Timeout(Some(http(
                StatusCode::GATEWAY_TIMEOUT,
            )))),
            MODEL,
        );
        let err = generator.generate(&spec(3)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let generator = QuestionGenerator::new(
            ScriptedTransport::failing(ProviderErrorKind::HttpStatus(http(
                StatusCode::INTERNAL_SERVER_ERROR,
            ))),
            MODEL,
        );
        let err = generator.generate(&spec(3)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport { .. }));
    }

    #[tokio::test]
    async fn empty_choices_is_envelope_error() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(r#"{"choices":[]}"#), MODEL);
        let err = generator.generate(&spec(3)).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Envelope {
                source: EnvelopeError::NoChoices,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_envelope_error() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok("<html>502</html>"), MODEL);
        let err = generator.generate(&spec(3)).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Envelope {
                source: EnvelopeError::Malformed(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn default_batch_asks_for_ten() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(&envelope(TWO_QUESTIONS)), MODEL);
        generator.generate_default("Networking", "easy").await.unwrap();
        let seen = generator.transport().seen.lock().unwrap();
        assert!(seen[0].messages[1].content.starts_with("Generate 10 multiple choice"));
    }

    #[test]
    fn from_config_requires_api_key() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::HuggingFace,
            model: MODEL.into(),
            endpoint: LlmProvider::HuggingFace.default_endpoint().into(),
            api_key: None,
            max_tokens: Some(1024),
            timeout_secs: None,
        };
        assert!(QuestionGenerator::from_config(cfg.clone()).is_err());

        let generator = QuestionGenerator::from_config(LlmModelConfig {
            api_key: Some("hf_test".into()),
            ..cfg
        })
        .unwrap();
        assert_eq!(generator.model(), MODEL);
        assert_eq!(generator.build_request(&spec(1)).max_tokens, 1024);
    }

    #[tokio::test]
    async fn difficulty_is_echoed_verbatim() {
        let generator = QuestionGenerator::new(ScriptedTransport::ok(&envelope(TWO_QUESTIONS)), MODEL);
        let spec = GenerationSpec::new("SQL", "Hard", NonZeroU32::new(2).unwrap());
        let qs = generator.generate(&spec).await.unwrap();

        let seen = generator.transport().seen.lock().unwrap();
        assert!(seen[0].messages[1].content.contains("with Hard difficulty level"));
        assert!(qs.iter().all(|q| q.difficulty() == "Hard"));
    }

    #[test]
    fn generator_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QuestionGenerator<ChatCompletionsService>>();
        assert_send_sync::<QuestionGenerator<ScriptedTransport>>();
    }
}
