//! Transport seam between prompt/parse logic and the network.
//!
//! Callers hand a fully built [`ChatCompletionRequest`] to a [`ChatTransport`]
//! and get back the raw success body. Envelope decoding happens on the caller
//! side (see [`crate::envelope::extract_content`]) so that doubles can return
//! arbitrary bodies.

use std::future::Future;

use crate::{envelope::ChatCompletionRequest, error_handler::ProviderError};

/// One outbound chat-completions call.
///
/// Implementations own retries, pooling and timeouts; the contract is a single
/// request mapped to a single response body or a classified [`ProviderError`].
pub trait ChatTransport: Send + Sync {
    fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}
