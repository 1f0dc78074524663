//! Embedder trait for text-to-vector conversion.
//!
//! The retrieval engine embeds chunk texts at ingestion and the query text at
//! lookup time. Implementations (local hashing, HTTP endpoints) live in
//! shopgen-infra.

use shopgen_types::error::RetrievalError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns exactly one vector per input text, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-v3").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
