//! OpenAI-compatible vendor adapter.
//!
//! A single [`OpenAiCompatibleProvider`] serves Tongyi (DashScope compatible
//! mode), SiliconFlow and the unified gateway via configurable base URLs.
//!
//! Request bodies are built from [`async_openai`]'s chat-completion types.
//! The call itself goes through a plain reqwest client so each `generate`
//! makes exactly one HTTP attempt and the raw status can be classified.

pub mod config;

use std::time::Duration;

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequest, ImageUrl,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use shopgen_core::llm::provider::ContentProvider;
use shopgen_types::error::ConfigurationError;
use shopgen_types::llm::{
    AttachmentKind, ProviderError, ProviderKind, ProviderRequest, ProviderResponse, Usage,
};

use self::config::OpenAiCompatConfig;
use crate::llm::classify::{classify_status, classify_transport, error_detail, retry_after_ms};

/// Minimal view of a chat-completion response.
///
/// Vendors differ in which optional fields they send, so only what is used
/// is required.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Adapter for any OpenAI-compatible chat-completions endpoint.
///
/// Does NOT derive Debug; the API key must never be printed.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    kind: ProviderKind,
    base_url: String,
    api_key: SecretString,
    vision: bool,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig, timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::InvalidValue {
                key: format!("providers.{}", config.kind),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            kind: config.kind,
            base_url: config.base_url,
            api_key: config.api_key,
            vision: config.vision,
        })
    }

    /// Build a [`CreateChatCompletionRequest`] from a [`ProviderRequest`].
    fn build_request(&self, request: &ProviderRequest) -> Result<CreateChatCompletionRequest, ProviderError> {
        if request.has_attachment(AttachmentKind::Audio) {
            return Err(ProviderError::UnsupportedInput(format!(
                "{} does not accept audio attachments",
                self.kind
            )));
        }
        if request.has_attachment(AttachmentKind::Image) && !self.vision {
            return Err(ProviderError::UnsupportedInput(format!(
                "{} does not accept image attachments",
                self.kind
            )));
        }

        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if !request.system_prompt.trim().is_empty() {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(
                        request.system_prompt.clone(),
                    ),
                    name: None,
                },
            ));
        }

        let content = if request.attachments.is_empty() {
            ChatCompletionRequestUserMessageContent::Text(request.message.clone())
        } else {
            let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> = request
                .attachments
                .iter()
                .map(|a| {
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: a.url.clone(),
                                detail: None,
                            },
                        },
                    )
                })
                .collect();
            parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: request.message.clone(),
                },
            ));
            ChatCompletionRequestUserMessageContent::Array(parts)
        };
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content,
                name: None,
            },
        ));

        Ok(CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature as f32),
            ..Default::default()
        })
    }
}

impl ContentProvider for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn supports_vision(&self) -> bool {
        self.vision
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let body = self.build_request(request)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
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

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::Transient("empty completion".to_string()));
        }

        let usage = parsed
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(ProviderResponse {
            content,
            model: parsed.model,
            usage,
        })
    }
}
