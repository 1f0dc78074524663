//! Knowledge base types: documents, chunks and retrieval results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a knowledge document came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    #[default]
    Upload,
    Chat,
    AiGenerated,
}

/// Optional metadata supplied with an upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: DocumentSource,
}

/// A document owned by a shop's knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: Uuid,
    pub shop_id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: DocumentSource,
    pub created_at: DateTime<Utc>,
}

/// A bounded slice of a document with its embedding.
///
/// Chunks are derived wholesale from their document and never edited on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    /// `{document_id}#{position:05}`; sorts by document, then position.
    pub id: String,
    pub document_id: Uuid,
    pub text: String,
    pub position: usize,
    /// Character offset of the chunk start within the document.
    pub start: usize,
    /// Leading characters shared with the previous chunk.
    pub overlap: usize,
    pub embedding: Vec<f32>,
}

impl KnowledgeChunk {
    pub fn make_id(document_id: &Uuid, position: usize) -> String {
        format!("{document_id}#{position:05}")
    }

    /// The chunk text with the overlap shared with its predecessor removed.
    pub fn fresh_text(&self) -> &str {
        match self.text.char_indices().nth(self.overlap) {
            Some((byte, _)) => &self.text[byte..],
            None if self.overlap == 0 => &self.text,
            None => "",
        }
    }
}

/// A chunk ranked against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub document_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub text: String,
    pub position: usize,
    pub similarity: f32,
}

/// Per-document attribution for a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    pub document_id: Uuid,
    pub title: String,
    pub similarity: f32,
}

/// Parameters for a knowledge lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieveQuery {
    pub query: String,
    pub top_k: usize,
    pub min_similarity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Response of `searchKnowledge`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunks: Vec<ScoredChunk>,
    pub sources: Vec<KnowledgeSource>,
    /// Rendered prompt context for the ranked chunks.
    pub context: String,
}

/// Response of `uploadKnowledge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub document: KnowledgeDocument,
    pub chunk_count: usize,
}
