//! Wire shapes exchanged with a chat-completions endpoint.
//!
//! Request: `{model, messages: [{role, content}], temperature, max_tokens, top_p}`.
//! Response: `{choices: [{message: {role, content}}]}`; only
//! `choices[0].message.content` is read.
//!
//! Everything that knows about the envelope lives here so text parsers can work
//! on the extracted content string alone.

use serde::{Deserialize, Serialize};

use crate::error_handler::EnvelopeError;

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One prompt message. Order inside a request is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Minimal response for `/v1/chat/completions`.
///
/// Every level is optional on the wire so that a structurally odd body is
/// reported as an [`EnvelopeError`] instead of a serde failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    /// `None` when absent or `null`; treated like an empty list.
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Generated text of one completion, as returned by the model.
///
/// May hold any number of question blocks, a preamble, or a truncated tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(String);

impl RawCompletion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl ChatCompletionResponse {
    /// Pulls `choices[0].message.content` out of a decoded response.
    ///
    /// # Errors
    /// - [`EnvelopeError::NoChoices`] when `choices` is missing, `null` or empty
    /// - [`EnvelopeError::NoMessage`] when the first choice has no message
    /// - [`EnvelopeError::EmptyContent`] when content is absent or blank
    pub fn into_content(self) -> Result<RawCompletion, EnvelopeError> {
        let first = self
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(EnvelopeError::NoChoices)?;
        let message = first.message.ok_or(EnvelopeError::NoMessage)?;
        match message.content {
            Some(c) if !c.trim().is_empty() => Ok(RawCompletion(c)),
            _ => Err(EnvelopeError::EmptyContent),
        }
    }
}

/// Decodes a raw response body and extracts the completion text.
///
/// # Errors
/// [`EnvelopeError::Malformed`] if the body is not a JSON object of the
/// expected shape, otherwise the errors of [`ChatCompletionResponse::into_content`].
pub fn extract_content(body: &str) -> Result<RawCompletion, EnvelopeError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        EnvelopeError::Malformed(format!(
            "serde error: {e}; expected `choices[0].message.content`"
        ))
    })?;
    parsed.into_content()
}
