//! Per-vendor settings for OpenAI-compatible endpoints.

use secrecy::SecretString;

use shopgen_types::llm::ProviderKind;

/// Configuration for an OpenAI-compatible vendor.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    pub kind: ProviderKind,
    /// Base URL up to and including the API version (e.g. `.../v1`).
    pub base_url: String,
    pub api_key: SecretString,
    /// Whether the vendor's models accept `image_url` content parts.
    pub vision: bool,
}

/// Defaults for the vendors served over the OpenAI chat-completions protocol.
///
/// Returns `None` for vendors with their own protocol.
pub fn compat_defaults(kind: ProviderKind, base_url: &str, api_key: SecretString) -> Option<OpenAiCompatConfig> {
    let vision = match kind {
        ProviderKind::Tongyi | ProviderKind::SiliconFlow | ProviderKind::Unified => true,
        ProviderKind::Anthropic => return None,
    };
    Some(OpenAiCompatConfig {
        kind,
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
        vision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropic_is_not_compat() {
        assert!(compat_defaults(ProviderKind::Anthropic, "https://api.anthropic.com", SecretString::from("k")).is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = compat_defaults(
            ProviderKind::Tongyi,
            "https://dashscope.aliyuncs.com/compatible-mode/v1/",
            SecretString::from("k"),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://dashscope.aliyuncs.com/compatible-mode/v1");
        assert!(config.vision);
    }
}
