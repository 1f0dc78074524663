//! Configuration loader.
//!
//! Reads `shopgen.toml` and deserializes it into [`AppConfig`]. Falls back
//! to defaults when the file is missing or malformed, then checks the
//! values the pipeline cannot run without.

use std::path::Path;

use shopgen_types::config::AppConfig;
use shopgen_types::error::ConfigurationError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "shopgen.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded configuration");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

fn invalid(key: &str, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Reject values that would make chunking or ranking meaningless.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigurationError> {
    let retrieval = &config.retrieval;
    if retrieval.chunk_size == 0 {
        return Err(invalid("retrieval.chunk_size", "must be positive"));
    }
    if retrieval.chunk_overlap >= retrieval.chunk_size {
        return Err(invalid(
            "retrieval.chunk_overlap",
            "must be smaller than chunk_size",
        ));
    }
    if !(1..=50).contains(&retrieval.top_k) {
        return Err(invalid("retrieval.top_k", "must be between 1 and 50"));
    }
    if !(-1.0..=1.0).contains(&retrieval.effective_min_similarity()) {
        return Err(invalid(
            "retrieval.min_similarity",
            "must be between -1.0 and 1.0",
        ));
    }
    if retrieval.embedding_dimension == 0 {
        return Err(invalid("retrieval.embedding_dimension", "must be positive"));
    }
    if config.dispatcher.max_message_chars == 0 {
        return Err(invalid("dispatcher.max_message_chars", "must be positive"));
    }
    if config.dispatcher.provider_timeout_secs == 0 {
        return Err(invalid("dispatcher.provider_timeout_secs", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopgen_types::config::EmbeddingBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).await;
        assert_eq!(config.server.port, 3000);
        assert!(config.providers.is_empty());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &config_path,
            r#"
[server]
port = 8088

[dispatcher]
retry_backoff_ms = 250

[retrieval]
embedding_backend = "tongyi"
min_similarity = 0.5

[providers.siliconflow]
base_url = "http://localhost:9000/v1"
api_key_env = "SF_KEY"
enabled = false
"#,
        )
        .await
        .unwrap();

        let config = load_config(&config_path).await;
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.dispatcher.retry_backoff_ms, 250);
        assert_eq!(config.retrieval.embedding_backend, EmbeddingBackend::Tongyi);
        assert_eq!(config.retrieval.chunk_size, 500);
        assert!(!config.providers["siliconflow"].enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&config_path).await;
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn validate_config_accepts_defaults() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn validate_config_rejects_overlap_not_below_size() {
        let mut config = AppConfig::default();
        config.retrieval.chunk_overlap = config.retrieval.chunk_size;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("retrieval.chunk_overlap"));
    }

    #[test]
    fn validate_config_rejects_out_of_range_top_k() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(validate_config(&config).is_err());
        config.retrieval.top_k = 51;
        assert!(validate_config(&config).is_err());
    }
}
