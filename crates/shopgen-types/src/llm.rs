//! Provider request/response types for shopgen.
//!
//! These types model the uniform shape every upstream vendor adapter speaks:
//! one request, one response, and a small error taxonomy the dispatcher can
//! branch on without looking at vendor-specific payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream model vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Anthropic,
    Tongyi,
    #[serde(rename = "siliconflow")]
    SiliconFlow,
    /// OpenAI-compatible aggregation gateway fronting several vendors.
    Unified,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Anthropic,
        ProviderKind::Tongyi,
        ProviderKind::SiliconFlow,
        ProviderKind::Unified,
    ];
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Tongyi => write!(f, "tongyi"),
            ProviderKind::SiliconFlow => write!(f, "siliconflow"),
            ProviderKind::Unified => write!(f, "unified"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "tongyi" => Ok(ProviderKind::Tongyi),
            "siliconflow" => Ok(ProviderKind::SiliconFlow),
            "unified" => Ok(ProviderKind::Unified),
            other => Err(format!("invalid provider: '{other}'")),
        }
    }
}

/// Kind of media referenced by an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentKind::Image => write!(f, "image"),
            AttachmentKind::Audio => write!(f, "audio"),
        }
    }
}

/// Reference to media sent alongside a user message (URL or data URI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Uniform request handed to a provider adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: String,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ProviderRequest {
    pub fn has_attachment(&self, kind: AttachmentKind) -> bool {
        self.attachments.iter().any(|a| a.kind == kind)
    }
}

/// Generated text returned by a provider adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub content: String,
    /// Model name as reported by the vendor (may differ from the requested alias).
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

/// Token usage for one generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Coarse failure class the dispatcher branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Credentials missing/invalid or input the model cannot take. Never retried.
    Configuration,
    /// Timeouts, 5xx, rate limiting. Retried once on the same model.
    Transient,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Configuration => write!(f, "configuration"),
            ErrorClass::Transient => write!(f, "transient"),
        }
    }
}

/// Errors raised by provider adapters.
///
/// Adapters classify vendor failures into exactly one of these variants at
/// the network boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms): {message}")]
    RateLimited {
        message: String,
        retry_after_ms: Option<u64>,
    },

    #[error("transient provider failure: {0}")]
    Transient(String),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

impl ProviderError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ProviderError::Auth(_) | ProviderError::UnsupportedInput(_) => {
                ErrorClass::Configuration
            }
            ProviderError::RateLimited { .. } | ProviderError::Transient(_) => {
                ErrorClass::Transient
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
        assert!("openrouter".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_serde() {
        let json = serde_json::to_string(&ProviderKind::SiliconFlow).unwrap();
        assert_eq!(json, "\"siliconflow\"");
        let parsed: ProviderKind = serde_json::from_str("\"tongyi\"").unwrap();
        assert_eq!(parsed, ProviderKind::Tongyi);
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(
            ProviderError::Auth("bad key".into()).class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            ProviderError::UnsupportedInput("image".into()).class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            ProviderError::Transient("timeout".into()).class(),
            ErrorClass::Transient
        );
        let limited = ProviderError::RateLimited {
            message: "slow down".into(),
            retry_after_ms: Some(1000),
        };
        assert!(limited.is_retryable());
        assert!(limited.to_string().contains("1000"));
    }

    #[test]
    fn test_attachment_deserialize_without_mime() {
        let json = r#"{"kind":"image","url":"https://cdn.example.com/a.png"}"#;
        let att: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(att.kind, AttachmentKind::Image);
        assert!(att.mime_type.is_none());
    }

    #[test]
    fn test_usage_total_saturates() {
        let usage = Usage {
            input_tokens: u32::MAX,
            output_tokens: 5,
        };
        assert_eq!(usage.total(), u32::MAX);
    }
}
