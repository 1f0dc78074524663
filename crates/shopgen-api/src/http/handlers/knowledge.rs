//! Shop knowledge base handlers: upload, list, delete and search.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopgen_core::knowledge::UploadRequest;
use shopgen_types::knowledge::{DocumentMetadata, KnowledgeDocument, SearchResult, UploadResult};

use crate::http::error::AppError;
use crate::http::extractors::query::KnowledgeListQuery;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Request body for uploading a document.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    /// Re-index an existing document instead of creating a new one.
    #[serde(default)]
    pub document_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Request body for a knowledge search.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_similarity: Option<f32>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub chars: usize,
    pub created_at: String,
}

impl From<&KnowledgeDocument> for DocumentSummary {
    fn from(doc: &KnowledgeDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            category: doc.category.clone(),
            tags: doc.tags.clone(),
            chars: doc.content.chars().count(),
            created_at: doc.created_at.to_rfc3339(),
        }
    }
}

/// POST /api/v1/shops/:shop_id/knowledge - Upload (or re-index) a document.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Json(body): Json<UploadBody>,
) -> Result<Json<ApiResponse<UploadResult>>, AppError> {
    let clock = RequestClock::start();
    let request = UploadRequest {
        document_id: body.document_id,
        title: body.title,
        content: body.content,
        metadata: body.metadata,
    };
    let result = state.retrieval.upload(&shop_id, request).await?;
    let self_link = format!("/api/v1/shops/{shop_id}/knowledge/{}", result.document.id);
    Ok(Json(clock.success(result).with_link("self", &self_link)))
}

/// GET /api/v1/shops/:shop_id/knowledge - List a shop's documents, newest first.
pub async fn list_documents(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Query(query): Query<KnowledgeListQuery>,
) -> Result<Json<ApiResponse<Vec<DocumentSummary>>>, AppError> {
    let clock = RequestClock::start();
    let documents: Vec<DocumentSummary> = state
        .retrieval
        .list_documents(&shop_id)
        .await
        .iter()
        .filter(|doc| {
            query
                .category
                .as_ref()
                .is_none_or(|wanted| doc.category.as_ref() == Some(wanted))
        })
        .map(DocumentSummary::from)
        .collect();
    let self_link = format!("/api/v1/shops/{shop_id}/knowledge");
    Ok(Json(clock.success(documents).with_link("self", &self_link)))
}

/// DELETE /api/v1/shops/:shop_id/knowledge/:document_id - Delete a document.
pub async fn delete_document(
    State(state): State<AppState>,
    Path((shop_id, id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let clock = RequestClock::start();
    state.retrieval.delete_document(&shop_id, &id).await?;
    Ok(Json(clock.success(serde_json::json!({
        "deleted": true,
        "document_id": id,
    }))))
}

/// POST /api/v1/shops/:shop_id/knowledge/search - Rank a shop's chunks.
pub async fn search(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Json(body): Json<SearchBody>,
) -> Result<Json<ApiResponse<SearchResult>>, AppError> {
    let clock = RequestClock::start();
    let query = state
        .retrieval
        .query(body.query, body.top_k, body.min_similarity, body.category);
    let result = state.retrieval.search(&shop_id, &query).await?;
    Ok(Json(clock.success(result)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::http::handlers::test_support::{router_with, send, state_with};
    use crate::http::router::build_router;

    #[tokio::test]
    async fn test_upload_search_list_delete() {
        let state = state_with(&[]);
        let router = build_router(state);

        let (status, body) = send(
            router.clone(),
            "POST",
            "/api/v1/shops/shop-1/knowledge",
            Some(json!({
                "title": "营业时间",
                "content": "本店营业时间为每天上午九点到晚上九点，节假日照常营业。",
                "metadata": {"category": "store"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chunk_count"], 1);
        let id = body["data"]["document"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            router.clone(),
            "POST",
            "/api/v1/shops/shop-1/knowledge/search",
            Some(json!({"query": "营业时间是几点"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sources"][0]["title"], "营业时间");
        assert!(body["data"]["context"].as_str().unwrap().contains("[来源 1: 营业时间]"));

        let (status, body) = send(
            router.clone(),
            "GET",
            "/api/v1/shops/shop-1/knowledge?category=store",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(
            router.clone(),
            "DELETE",
            &format!("/api/v1/shops/shop-1/knowledge/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            router,
            "DELETE",
            &format!("/api/v1/shops/shop-1/knowledge/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "DOCUMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_shops_are_isolated() {
        let router = router_with(&[]);
        send(
            router.clone(),
            "POST",
            "/api/v1/shops/shop-a/knowledge",
            Some(json!({"title": "花店介绍", "content": "我们是一家社区花店，主营鲜花和绿植。"})),
        )
        .await;

        let (status, body) = send(
            router,
            "POST",
            "/api/v1/shops/shop-b/knowledge/search",
            Some(json!({"query": "花店介绍"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["chunks"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_validation() {
        let router = router_with(&[]);
        let (status, body) = send(
            router.clone(),
            "POST",
            "/api/v1/shops/shop-1/knowledge",
            Some(json!({"title": "", "content": "内容"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            router.clone(),
            "POST",
            "/api/v1/shops/shop-1/knowledge/search",
            Some(json!({"query": "x", "top_k": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_document_id() {
        let router = router_with(&[]);
        let (status, _) = send(
            router.clone(),
            "DELETE",
            "/api/v1/shops/shop-1/knowledge/not-a-uuid",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = Uuid::now_v7();
        let (status, body) = send(
            router,
            "DELETE",
            &format!("/api/v1/shops/shop-1/knowledge/{missing}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "DOCUMENT_NOT_FOUND");
    }
}
