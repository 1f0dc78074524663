//! Anthropic Messages API types.
//!
//! Wire structures for `/v1/messages`. These are NOT the provider-agnostic
//! types from shopgen-types.

use serde::{Deserialize, Serialize};

/// Request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<MessagesMessage>,
    pub temperature: f64,
}

/// A single message in an Anthropic conversation.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesMessage {
    pub role: String,
    pub content: Vec<RequestBlock>,
}

/// A request content block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBlock {
    Text { text: String },
    Image { source: ImageSource },
}

/// Where an image block's bytes come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Url { url: String },
    Base64 { media_type: String, data: String },
}

impl ImageSource {
    /// `data:<mime>;base64,<payload>` URIs are sent inline; anything else by URL.
    pub fn from_attachment_url(url: &str) -> Self {
        let inline = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .and_then(|(header, data)| {
                header
                    .strip_suffix(";base64")
                    .map(|media_type| (media_type.to_string(), data.to_string()))
            });
        match inline {
            Some((media_type, data)) => ImageSource::Base64 { media_type, data },
            None => ImageSource::Url {
                url: url.to_string(),
            },
        }
    }
}

/// Non-streaming response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub model: String,
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub usage: MessagesUsage,
}

/// A content block in an Anthropic response. Only text is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Token usage from Anthropic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_becomes_base64_source() {
        let source = ImageSource::from_attachment_url("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(
            source,
            ImageSource::Base64 {
                media_type: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            }
        );
    }

    #[test]
    fn test_plain_url_source() {
        let source = ImageSource::from_attachment_url("https://cdn.example.com/a.jpg");
        assert!(matches!(source, ImageSource::Url { .. }));
        // Not base64-encoded: sent as-is.
        let source = ImageSource::from_attachment_url("data:text/plain,hello");
        assert!(matches!(source, ImageSource::Url { .. }));
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "claude-3-5-haiku-20241022".into(),
            max_tokens: 1024,
            system: Some("你是文案助手".into()),
            messages: vec![MessagesMessage {
                role: "user".into(),
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource::Url {
                            url: "https://cdn.example.com/a.jpg".into(),
                        },
                    },
                    RequestBlock::Text {
                        text: "写一条朋友圈".into(),
                    },
                ],
            }],
            temperature: 0.8,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["content"][0]["type"], "image");
        assert_eq!(json["messages"][0]["content"][0]["source"]["type"], "url");
        assert_eq!(json["messages"][0]["content"][1]["type"], "text");
        assert_eq!(json["system"], "你是文案助手");
    }

    #[test]
    fn test_response_ignores_unknown_blocks() {
        let json = r#"{
            "id": "msg_01",
            "model": "claude-3-5-haiku-20241022",
            "content": [{"type":"thinking","thinking":"..."},{"type":"text","text":"你好"}],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.len(), 2);
        assert!(matches!(response.content[0], ResponseBlock::Other));
        assert_eq!(response.usage.output_tokens, 3);
    }
}
