//! Application configuration types.
//!
//! `AppConfig` mirrors `shopgen.toml`. Every field has a default so a missing
//! or partial file still yields a usable configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Per-provider overrides keyed by provider id (`anthropic`, `tongyi`, ...).
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,
}

impl AppConfig {
    /// Settings for a provider, falling back to its built-in defaults.
    pub fn provider(&self, kind: ProviderKind) -> ProviderSettings {
        self.providers
            .get(&kind.to_string())
            .cloned()
            .unwrap_or_else(|| ProviderSettings::defaults_for(kind))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whole-request deadline; expiry cancels in-flight generation.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Fixed pause before the single retry of a transient failure.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Per-attempt network timeout applied by the adapters.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
    /// Upper bound on user message length, in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_message_chars() -> usize {
    20_000
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: default_retry_backoff_ms(),
            provider_timeout_secs: default_provider_timeout_secs(),
            default_max_tokens: default_max_tokens(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

/// Which embedding backend the retrieval engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic in-process feature hashing.
    #[default]
    Local,
    /// OpenAI-compatible embeddings endpoint on the Tongyi provider.
    Tongyi,
}

impl EmbeddingBackend {
    /// Similarity floor that still admits relevant chunks for this backend.
    ///
    /// Feature-hashed vectors of related CJK text land around 0.1-0.3,
    /// while model embeddings cluster much higher.
    pub fn default_min_similarity(self) -> f32 {
        match self {
            Self::Local => 0.1,
            Self::Tongyi => 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Target chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Unset means the embedding backend's own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f32>,
    /// Token budget for knowledge context injected into prompts.
    #[serde(default = "default_context_max_tokens")]
    pub context_max_tokens: usize,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
    #[serde(default)]
    pub embedding_backend: EmbeddingBackend,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    5
}

fn default_context_max_tokens() -> usize {
    4000
}

fn default_embedding_dimension() -> usize {
    1024
}

fn default_embedding_model() -> String {
    "text-embedding-v3".to_string()
}

impl RetrievalConfig {
    /// The configured threshold, or the backend default when unset.
    pub fn effective_min_similarity(&self) -> f32 {
        self.min_similarity
            .unwrap_or_else(|| self.embedding_backend.default_min_similarity())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            min_similarity: None,
            context_max_tokens: default_context_max_tokens(),
            embedding_dimension: default_embedding_dimension(),
            embedding_backend: EmbeddingBackend::default(),
            embedding_model: default_embedding_model(),
        }
    }
}

/// Connection settings for one upstream vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderSettings {
    pub fn defaults_for(kind: ProviderKind) -> Self {
        let (base_url, api_key_env) = match kind {
            ProviderKind::Anthropic => ("https://api.anthropic.com", "ANTHROPIC_API_KEY"),
            ProviderKind::Tongyi => (
                "https://dashscope.aliyuncs.com/compatible-mode/v1",
                "TONGYI_API_KEY",
            ),
            ProviderKind::SiliconFlow => ("https://api.siliconflow.cn/v1", "SILICONFLOW_API_KEY"),
            ProviderKind::Unified => ("https://api4.mygptlife.com/v1", "UNIFIED_API_KEY"),
        };
        Self {
            base_url: base_url.to_string(),
            api_key_env: api_key_env.to_string(),
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.dispatcher.retry_backoff_ms, 500);
        assert_eq!(config.dispatcher.default_max_tokens, 4096);
        assert_eq!(config.retrieval.chunk_size, 500);
        assert_eq!(config.retrieval.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 5);
        assert!(config.retrieval.min_similarity.is_none());
        assert!((config.retrieval.effective_min_similarity() - 0.1).abs() < f32::EPSILON);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.retrieval.embedding_backend, EmbeddingBackend::Local);
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 8080

[dispatcher]
retry_backoff_ms = 250

[retrieval]
top_k = 3
embedding_backend = "tongyi"

[providers.tongyi]
base_url = "http://localhost:9000/v1"
api_key_env = "MY_TONGYI_KEY"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.dispatcher.retry_backoff_ms, 250);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.embedding_backend, EmbeddingBackend::Tongyi);
        assert!((config.retrieval.effective_min_similarity() - 0.7).abs() < f32::EPSILON);

        let tongyi = config.provider(ProviderKind::Tongyi);
        assert_eq!(tongyi.base_url, "http://localhost:9000/v1");
        assert_eq!(tongyi.api_key_env, "MY_TONGYI_KEY");
        assert!(tongyi.enabled);
    }

    #[test]
    fn test_explicit_min_similarity_overrides_backend_default() {
        let config: AppConfig = toml::from_str("[retrieval]\nmin_similarity = 0.35\n").unwrap();
        assert_eq!(config.retrieval.min_similarity, Some(0.35));
        assert!((config.retrieval.effective_min_similarity() - 0.35).abs() < f32::EPSILON);
    }

    #[test]
    fn test_provider_defaults_when_not_configured() {
        let config = AppConfig::default();
        let anthropic = config.provider(ProviderKind::Anthropic);
        assert_eq!(anthropic.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(anthropic.base_url, "https://api.anthropic.com");
    }
}
