//! Retrieval engine: ingestion, ranking and knowledge catalogue operations.
//!
//! Ingest splits a document with the [`Chunker`], embeds every chunk and swaps
//! the chunk set into the shop's slot under the shop's writer lock. Queries
//! embed the query text with the same embedder and rank every chunk of the
//! shop by cosine similarity.
//!
//! Ranking is a total order: similarity descending, then chunk id ascending.

use std::cmp::Ordering;

use chrono::Utc;
use uuid::Uuid;

use shopgen_types::config::RetrievalConfig;
use shopgen_types::error::{ConfigurationError, KnowledgeError, RetrievalError, ValidationError};
use shopgen_types::knowledge::{
    DocumentMetadata, KnowledgeChunk, KnowledgeDocument, KnowledgeSource, RetrieveQuery,
    ScoredChunk, SearchResult, UploadResult,
};

use super::box_embedder::BoxEmbedder;
use super::chunker::Chunker;
use super::context::{optimize_context, render_context};
use super::store::{KnowledgeStore, StoredDocument};

/// Largest `top_k` a caller may request.
pub const MAX_TOP_K: usize = 50;

/// Input for `upload`. Supplying an existing `document_id` re-indexes it.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub document_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Cosine similarity; zero-length vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Total order used for ranked results.
pub fn rank_order(a: &ScoredChunk, b: &ScoredChunk) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.chunk_id.cmp(&b.chunk_id))
}

/// Best similarity per document, in first-appearance (rank) order.
pub fn sources_for(chunks: &[ScoredChunk]) -> Vec<KnowledgeSource> {
    let mut sources: Vec<KnowledgeSource> = Vec::new();
    for chunk in chunks {
        if sources.iter().any(|s| s.document_id == chunk.document_id) {
            continue;
        }
        sources.push(KnowledgeSource {
            document_id: chunk.document_id,
            title: chunk.title.clone(),
            similarity: chunk.similarity,
        });
    }
    sources
}

pub struct RetrievalEngine {
    store: KnowledgeStore,
    embedder: BoxEmbedder,
    chunker: Chunker,
    default_top_k: usize,
    default_min_similarity: f32,
    context_max_tokens: usize,
}

impl RetrievalEngine {
    pub fn new(embedder: BoxEmbedder, config: &RetrievalConfig) -> Result<Self, ConfigurationError> {
        if embedder.dimension() != config.embedding_dimension {
            return Err(ConfigurationError::InvalidValue {
                key: "retrieval.embedding_dimension".to_string(),
                reason: format!(
                    "embedder '{}' produces {} dimensions",
                    embedder.model_name(),
                    embedder.dimension()
                ),
            });
        }
        Ok(Self {
            store: KnowledgeStore::new(),
            chunker: Chunker::new(config.chunk_size, config.chunk_overlap)?,
            embedder,
            default_top_k: config.top_k,
            default_min_similarity: config.effective_min_similarity(),
            context_max_tokens: config.context_max_tokens,
        })
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn default_min_similarity(&self) -> f32 {
        self.default_min_similarity
    }

    /// Build a query using configured defaults for anything not supplied.
    pub fn query(
        &self,
        query: impl Into<String>,
        top_k: Option<usize>,
        min_similarity: Option<f32>,
        category: Option<String>,
    ) -> RetrieveQuery {
        RetrieveQuery {
            query: query.into(),
            top_k: top_k.unwrap_or(self.default_top_k),
            min_similarity: min_similarity.unwrap_or(self.default_min_similarity),
            category,
        }
    }

    /// Chunk, embed and store a document for a shop.
    pub async fn upload(
        &self,
        shop_id: &str,
        request: UploadRequest,
    ) -> Result<UploadResult, KnowledgeError> {
        require_non_empty("shop_id", shop_id)?;
        require_non_empty("title", &request.title)?;
        if request.content.trim().is_empty() {
            return Err(RetrievalError::EmptyDocument.into());
        }

        let writer = self.store.writer(shop_id).await;

        let (id, created_at) = match request.document_id {
            Some(id) => match writer.get(&id).await {
                Some(existing) => (id, existing.document.created_at),
                None => (id, Utc::now()),
            },
            None => (Uuid::now_v7(), Utc::now()),
        };

        let document = KnowledgeDocument {
            id,
            shop_id: shop_id.to_string(),
            title: request.title,
            content: request.content,
            category: request.metadata.category,
            tags: request.metadata.tags,
            source: request.metadata.source,
            created_at,
        };

        let pieces = self.chunker.split(&document.content);
        let texts: Vec<String> = pieces.iter().map(|p| p.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;

        let chunks: Vec<KnowledgeChunk> = pieces
            .into_iter()
            .zip(embeddings)
            .map(|(piece, embedding)| KnowledgeChunk {
                id: KnowledgeChunk::make_id(&document.id, piece.position),
                document_id: document.id,
                text: piece.text,
                position: piece.position,
                start: piece.start,
                overlap: piece.overlap,
                embedding,
            })
            .collect();

        let chunk_count = chunks.len();
        writer
            .put(StoredDocument {
                document: document.clone(),
                chunks,
            })
            .await;

        tracing::info!(
            shop_id,
            document_id = %document.id,
            chunk_count,
            "Knowledge document indexed"
        );

        Ok(UploadResult {
            document,
            chunk_count,
        })
    }

    /// Rank a shop's chunks against `query`.
    ///
    /// An empty result is a valid outcome when nothing clears the threshold.
    pub async fn retrieve(
        &self,
        shop_id: &str,
        query: &RetrieveQuery,
    ) -> Result<Vec<ScoredChunk>, KnowledgeError> {
        validate_query(shop_id, query)?;

        let documents = self.store.snapshot(shop_id).await;
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_one(&query.query).await?;

        let mut ranked: Vec<ScoredChunk> = Vec::new();
        for stored in &documents {
            let document = &stored.document;
            if query
                .category
                .as_ref()
                .is_some_and(|wanted| document.category.as_ref() != Some(wanted))
            {
                continue;
            }
            for chunk in &stored.chunks {
                if chunk.embedding.len() != query_vector.len() {
                    return Err(RetrievalError::DimensionMismatch {
                        expected: chunk.embedding.len(),
                        actual: query_vector.len(),
                    }
                    .into());
                }
                let similarity = cosine_similarity(&query_vector, &chunk.embedding);
                if similarity < query.min_similarity {
                    continue;
                }
                ranked.push(ScoredChunk {
                    chunk_id: chunk.id.clone(),
                    document_id: document.id,
                    title: document.title.clone(),
                    category: document.category.clone(),
                    text: chunk.text.clone(),
                    position: chunk.position,
                    similarity,
                });
            }
        }

        ranked.sort_by(rank_order);
        ranked.truncate(query.top_k);

        tracing::debug!(shop_id, matches = ranked.len(), "Knowledge retrieval complete");
        Ok(ranked)
    }

    /// `retrieve` plus per-document sources and rendered prompt context.
    pub async fn search(
        &self,
        shop_id: &str,
        query: &RetrieveQuery,
    ) -> Result<SearchResult, KnowledgeError> {
        let chunks = self.retrieve(shop_id, query).await?;
        let sources = sources_for(&chunks);
        let context = self.build_context(&chunks);
        Ok(SearchResult {
            chunks,
            sources,
            context,
        })
    }

    /// Render ranked chunks and trim them to the configured token budget.
    pub fn build_context(&self, chunks: &[ScoredChunk]) -> String {
        if chunks.is_empty() {
            return String::new();
        }
        optimize_context(&render_context(chunks), self.context_max_tokens)
    }

    /// A shop's documents, newest first.
    pub async fn list_documents(&self, shop_id: &str) -> Vec<KnowledgeDocument> {
        let mut documents: Vec<KnowledgeDocument> = self
            .store
            .snapshot(shop_id)
            .await
            .iter()
            .map(|stored| stored.document.clone())
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        documents
    }

    /// Remove a document and all its chunks.
    pub async fn delete_document(
        &self,
        shop_id: &str,
        document_id: &Uuid,
    ) -> Result<(), KnowledgeError> {
        let writer = self.store.writer(shop_id).await;
        match writer.remove(document_id).await {
            Some(_) => {
                tracing::info!(shop_id, document_id = %document_id, "Knowledge document deleted");
                Ok(())
            }
            None => Err(RetrievalError::DocumentNotFound(document_id.to_string()).into()),
        }
    }

    /// Chunks currently stored for a document, in position order.
    pub async fn document_chunks(&self, shop_id: &str, document_id: &Uuid) -> Vec<KnowledgeChunk> {
        self.store
            .snapshot(shop_id)
            .await
            .into_iter()
            .find(|stored| stored.document.id == *document_id)
            .map(|stored| stored.chunks.clone())
            .unwrap_or_default()
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(())
}

fn validate_query(shop_id: &str, query: &RetrieveQuery) -> Result<(), ValidationError> {
    require_non_empty("shop_id", shop_id)?;
    require_non_empty("query", &query.query)?;
    if query.top_k == 0 || query.top_k > MAX_TOP_K {
        return Err(ValidationError::OutOfRange {
            field: "top_k".to_string(),
            reason: format!("must be between 1 and {MAX_TOP_K}"),
        });
    }
    if !(-1.0..=1.0).contains(&query.min_similarity) {
        return Err(ValidationError::OutOfRange {
            field: "min_similarity".to_string(),
            reason: "must be between -1 and 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::embedder::Embedder;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Embeds text by counting a few marker characters, so tests can steer
    /// similarity precisely.
    struct MarkerEmbedder {
        calls: Arc<AtomicUsize>,
    }

    const MARKERS: [char; 4] = ['花', '茶', '猫', '车'];

    impl Embedder for MarkerEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    MARKERS
                        .iter()
                        .map(|m| t.chars().filter(|c| c == m).count() as f32)
                        .collect()
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "marker"
        }

        fn dimension(&self) -> usize {
            MARKERS.len()
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Err(RetrievalError::Embedding("endpoint unreachable".into()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            MARKERS.len()
        }
    }

    fn config() -> RetrievalConfig {
        RetrievalConfig {
            chunk_size: 20,
            chunk_overlap: 2,
            embedding_dimension: MARKERS.len(),
            ..RetrievalConfig::default()
        }
    }

    fn engine() -> (RetrievalEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let embedder = BoxEmbedder::new(MarkerEmbedder {
            calls: Arc::clone(&calls),
        });
        (RetrievalEngine::new(embedder, &config()).unwrap(), calls)
    }

    fn upload_request(title: &str, content: &str, category: Option<&str>) -> UploadRequest {
        UploadRequest {
            document_id: None,
            title: title.to_string(),
            content: content.to_string(),
            metadata: DocumentMetadata {
                category: category.map(str::to_string),
                ..DocumentMetadata::default()
            },
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_new_rejects_dimension_mismatch() {
        let mut cfg = config();
        cfg.embedding_dimension = 1024;
        let embedder = BoxEmbedder::new(FailingEmbedder);
        assert!(matches!(
            RetrievalEngine::new(embedder, &cfg),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_chunks_and_reconstructs() {
        let (engine, _) = engine();
        let content = "鲜花每日到店。绿植可以预订！周末有插花课程。会员享受九折优惠？欢迎咨询。";
        let result = engine
            .upload("shop-1", upload_request("门店介绍", content, None))
            .await
            .unwrap();
        assert!(result.chunk_count > 1);

        let chunks = engine.document_chunks("shop-1", &result.document.id).await;
        assert_eq!(chunks.len(), result.chunk_count);
        let rebuilt: String = chunks.iter().map(|c| c.fresh_text()).collect();
        assert_eq!(rebuilt, content);
        assert!(chunks.iter().all(|c| c.embedding.len() == MARKERS.len()));
    }

    #[tokio::test]
    async fn test_upload_validates_input() {
        let (engine, calls) = engine();
        let err = engine
            .upload("", upload_request("t", "花", None))
            .await
            .unwrap_err();
        assert_eq!(err, KnowledgeError::Validation(ValidationError::EmptyField("shop_id".into())));

        let err = engine
            .upload("shop", upload_request("t", "   ", None))
            .await
            .unwrap_err();
        assert_eq!(err, KnowledgeError::Retrieval(RetrievalError::EmptyDocument));
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieve_ranks_with_threshold_and_top_k() {
        let (engine, _) = engine();
        engine.upload("s", upload_request("花", "花花花", None)).await.unwrap();
        engine.upload("s", upload_request("花茶", "花茶", None)).await.unwrap();
        engine.upload("s", upload_request("猫", "猫猫", None)).await.unwrap();

        let query = engine.query("花", Some(3), Some(0.7), None);
        let results = engine.retrieve("s", &query).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "花");
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(results[1].title, "花茶");
        assert!(results.iter().all(|r| r.similarity >= 0.7));

        let again = engine.retrieve("s", &query).await.unwrap();
        assert_eq!(results, again);
    }

    #[tokio::test]
    async fn test_ties_break_by_chunk_id() {
        let (engine, _) = engine();
        for title in ["甲", "乙", "丙"] {
            engine.upload("s", upload_request(title, "茶", None)).await.unwrap();
        }
        let results = engine
            .retrieve("s", &engine.query("茶", Some(3), Some(0.5), None))
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (engine, _) = engine();
        engine
            .upload("s", upload_request("产品", "花", Some("product")))
            .await
            .unwrap();
        engine
            .upload("s", upload_request("政策", "花", Some("policy")))
            .await
            .unwrap();

        let results = engine
            .retrieve("s", &engine.query("花", None, Some(0.1), Some("policy".into())))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "政策");
    }

    #[tokio::test]
    async fn test_empty_shop_returns_no_results_without_embedding() {
        let (engine, calls) = engine();
        let results = engine
            .retrieve("empty", &engine.query("花", None, None, None))
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieve_rejects_bad_top_k() {
        let (engine, _) = engine();
        let err = engine
            .retrieve("s", &engine.query("花", Some(0), None, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_returns_sources_and_context() {
        let (engine, _) = engine();
        let content = "花".repeat(45);
        engine.upload("s", upload_request("花艺", &content, None)).await.unwrap();

        let result = engine
            .search("s", &engine.query("花", Some(5), Some(0.5), None))
            .await
            .unwrap();
        assert!(result.chunks.len() > 1);
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].title, "花艺");
        assert!(result.context.starts_with("[来源 1: 花艺]\n"));
    }

    #[tokio::test]
    async fn test_reupload_replaces_chunks_and_keeps_created_at() {
        let (engine, _) = engine();
        let first = engine
            .upload("s", upload_request("说明", &"猫".repeat(60), None))
            .await
            .unwrap();
        let id = first.document.id;

        let mut again = upload_request("说明", "花", None);
        again.document_id = Some(id);
        let second = engine.upload("s", again).await.unwrap();

        assert_eq!(second.document.id, id);
        assert_eq!(second.document.created_at, first.document.created_at);
        assert_eq!(second.chunk_count, 1);
        assert_eq!(engine.list_documents("s").await.len(), 1);

        let cats = engine
            .retrieve("s", &engine.query("猫", None, Some(0.5), None))
            .await
            .unwrap();
        assert!(cats.is_empty());
    }

    #[tokio::test]
    async fn test_delete_document() {
        let (engine, _) = engine();
        let uploaded = engine
            .upload("s", upload_request("临时", "车", None))
            .await
            .unwrap();
        let id = uploaded.document.id;

        engine.delete_document("s", &id).await.unwrap();
        assert!(engine.list_documents("s").await.is_empty());
        assert!(engine.document_chunks("s", &id).await.is_empty());

        let err = engine.delete_document("s", &id).await.unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Retrieval(RetrievalError::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_embedding_failure_is_retrieval_error() {
        let engine = RetrievalEngine::new(BoxEmbedder::new(FailingEmbedder), &config()).unwrap();
        let err = engine
            .upload("s", upload_request("t", "花", None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Retrieval(RetrievalError::Embedding(_))
        ));
        assert!(engine.list_documents("s").await.is_empty());
    }
}
