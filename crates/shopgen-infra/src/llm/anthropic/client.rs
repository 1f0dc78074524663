//! AnthropicProvider -- [`ContentProvider`] for the Anthropic Messages API.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use shopgen_core::llm::provider::ContentProvider;
use shopgen_types::error::ConfigurationError;
use shopgen_types::llm::{
    AttachmentKind, ProviderError, ProviderKind, ProviderRequest, ProviderResponse, Usage,
};

use super::types::{
    ImageSource, MessagesMessage, MessagesRequest, MessagesResponse, RequestBlock, ResponseBlock,
};
use crate::llm::classify::{classify_status, classify_transport, error_detail, retry_after_ms};

/// Anthropic Claude adapter.
///
/// Does not derive Debug so the key can never end up in logs.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    /// Create an adapter whose every call is bounded by `timeout`.
    pub fn new(
        api_key: SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::InvalidValue {
                key: "providers.anthropic".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the Messages API body: images first, then the user text.
    fn to_messages_request(&self, request: &ProviderRequest) -> Result<MessagesRequest, ProviderError> {
        if request.has_attachment(AttachmentKind::Audio) {
            return Err(ProviderError::UnsupportedInput(
                "anthropic does not accept audio attachments".to_string(),
            ));
        }

        let mut content: Vec<RequestBlock> = request
            .attachments
            .iter()
            .map(|a| RequestBlock::Image {
                source: ImageSource::from_attachment_url(&a.url),
            })
            .collect();
        content.push(RequestBlock::Text {
            text: request.message.clone(),
        });

        let system = Some(request.system_prompt.clone()).filter(|s| !s.trim().is_empty());

        Ok(MessagesRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            system,
            messages: vec![MessagesMessage {
                role: "user".to_string(),
                content,
            }],
            temperature: request.temperature,
        })
    }
}

impl ContentProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn supports_vision(&self) -> bool {
        true
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let body = self.to_messages_request(request)?;

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_detail(&error_body), retry_after));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to parse response: {e}")))?;

        let content = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.as_str()),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");
        if content.trim().is_empty() {
            return Err(ProviderError::Transient("empty completion".to_string()));
        }

        Ok(ProviderResponse {
            content,
            model: parsed.model,
            usage: Usage {
                input_tokens: parsed.usage.input_tokens,
                output_tokens: parsed.usage.output_tokens,
            },
        })
    }
}
