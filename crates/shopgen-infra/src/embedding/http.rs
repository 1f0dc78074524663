//! HTTP embedder for OpenAI-compatible `/embeddings` endpoints.
//!
//! Used with Tongyi `text-embedding-v3`. Inputs are sent in batches the
//! endpoint accepts; vectors come back in input order.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use shopgen_core::knowledge::embedder::Embedder;
use shopgen_types::error::{ConfigurationError, RetrievalError};

use crate::llm::classify::error_detail;

/// Largest batch DashScope accepts for `text-embedding-v3`.
const MAX_BATCH: usize = 10;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Remote embedder. Does not derive Debug (holds an API key).
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        model: impl Into<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::InvalidValue {
                key: "retrieval.embedding_backend".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            dimension,
        })
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: batch,
            dimensions: self.dimension,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!(
                "HTTP {status}: {}",
                error_detail(&error_body)
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("failed to parse response: {e}")))?;
        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        tracing::debug!(model = %self.model, texts = texts.len(), "Embedded texts");
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    /// Echo server: the embedding of input `i` is `[len(text), i]`,
    /// returned in reverse order.
    async fn mock_embeddings(calls: Arc<AtomicUsize>) -> String {
        async fn handler(State(calls): State<Arc<AtomicUsize>>, Json(body): Json<Value>) -> Json<Value> {
            calls.fetch_add(1, Ordering::SeqCst);
            let inputs = body["input"].as_array().cloned().unwrap_or_default();
            let data: Vec<Value> = inputs
                .iter()
                .enumerate()
                .rev()
                .map(|(i, text)| {
                    let len = text.as_str().unwrap_or_default().chars().count();
                    json!({"index": i, "embedding": [len as f32, i as f32]})
                })
                .collect();
            Json(json!({"data": data}))
        }
        let app = Router::new()
            .route("/v1/embeddings", post(handler))
            .with_state(calls);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn embedder(base: &str) -> HttpEmbedder {
        HttpEmbedder::new(
            base,
            SecretString::from("sk-test"),
            "text-embedding-v3",
            2,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_batches_and_restores_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base = mock_embeddings(Arc::clone(&calls)).await;
        let texts: Vec<String> = (0..12).map(|i| "字".repeat(i + 1)).collect();

        let vectors = embedder(&base).embed(&texts).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(vectors.len(), 12);
        assert_eq!(vectors[0], vec![1.0, 0.0]);
        assert_eq!(vectors[9], vec![10.0, 9.0]);
        // Second batch restarts its indexes.
        assert_eq!(vectors[10], vec![11.0, 0.0]);
    }

    #[tokio::test]
    async fn test_error_status_is_embedding_error() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::UNAUTHORIZED, r#"{"error":{"message":"bad key"}}"#) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let err = embedder(&format!("http://{addr}/v1"))
            .embed(&["x".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(ref m) if m.contains("bad key")));
    }
}
