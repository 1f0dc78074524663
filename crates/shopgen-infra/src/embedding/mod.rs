//! Embedder implementations for the knowledge base.
//!
//! - `local`: deterministic n-gram hashing, the default
//! - `http`: OpenAI-compatible `/embeddings` endpoint (Tongyi)

pub mod http;
pub mod local;

use std::time::Duration;

use shopgen_core::knowledge::box_embedder::BoxEmbedder;
use shopgen_types::config::{AppConfig, EmbeddingBackend};
use shopgen_types::error::ConfigurationError;
use shopgen_types::llm::ProviderKind;

pub use http::HttpEmbedder;
pub use local::LocalHashEmbedder;

use crate::secret::CredentialSource;

/// Build the embedder selected by `[retrieval] embedding_backend`.
///
/// The Tongyi backend reuses the Tongyi provider's base URL and key; a
/// missing key is a configuration error rather than a silent downgrade,
/// since vectors from different backends are not comparable.
pub fn build_embedder(
    config: &AppConfig,
    credentials: &dyn CredentialSource,
) -> Result<BoxEmbedder, ConfigurationError> {
    let retrieval = &config.retrieval;
    if retrieval.embedding_dimension == 0 {
        return Err(ConfigurationError::InvalidValue {
            key: "retrieval.embedding_dimension".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    match retrieval.embedding_backend {
        EmbeddingBackend::Local => {
            tracing::info!(dimension = retrieval.embedding_dimension, "Using local hashing embedder");
            Ok(BoxEmbedder::new(LocalHashEmbedder::new(retrieval.embedding_dimension)))
        }
        EmbeddingBackend::Tongyi => {
            let settings = config.provider(ProviderKind::Tongyi);
            let api_key = credentials
                .get(&settings.api_key_env)
                .ok_or_else(|| ConfigurationError::MissingCredential(ProviderKind::Tongyi.to_string()))?;
            tracing::info!(model = %retrieval.embedding_model, "Using Tongyi embeddings");
            let embedder = HttpEmbedder::new(
                &settings.base_url,
                api_key,
                retrieval.embedding_model.clone(),
                retrieval.embedding_dimension,
                Duration::from_secs(config.dispatcher.provider_timeout_secs),
            )?;
            Ok(BoxEmbedder::new(embedder))
        }
    }
}
