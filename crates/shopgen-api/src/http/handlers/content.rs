//! Content compliance and quality handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use shopgen_types::compliance::{Platform, TermCategory};
use shopgen_types::content::{ContentCheckRequest, ContentCheckResult};

use crate::http::error::AppError;
use crate::http::extractors::query::PlatformQuery;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// POST /api/v1/content/check - Forbidden-term check, replacement and scoring.
pub async fn check_content(
    State(state): State<AppState>,
    Json(body): Json<ContentCheckRequest>,
) -> Result<Json<ApiResponse<ContentCheckResult>>, AppError> {
    let clock = RequestClock::start();
    let result = state.content.check_content(&body)?;
    Ok(Json(clock.success(result)))
}

#[derive(Debug, Serialize)]
pub struct TermGroup {
    pub category: TermCategory,
    pub display_name: &'static str,
    pub terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ForbiddenTermsResponse {
    pub platform: Platform,
    pub categories: Vec<TermGroup>,
}

/// GET /api/v1/content/forbidden-terms - Terms in force on a platform.
pub async fn forbidden_terms(
    State(state): State<AppState>,
    Query(query): Query<PlatformQuery>,
) -> Result<Json<ApiResponse<ForbiddenTermsResponse>>, AppError> {
    let clock = RequestClock::start();
    let platform = query.platform()?;
    let grouped: BTreeMap<TermCategory, Vec<String>> = state.content.forbidden().all_terms(platform);
    let categories = grouped
        .into_iter()
        .map(|(category, terms)| TermGroup {
            category,
            display_name: category.display_name(),
            terms,
        })
        .collect();
    Ok(Json(clock.success(ForbiddenTermsResponse {
        platform,
        categories,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::http::handlers::test_support::{router_with, send};

    #[tokio::test]
    async fn test_check_with_auto_replace() {
        let (status, body) = send(
            router_with(&[]),
            "POST",
            "/api/v1/content/check",
            Some(json!({
                "content": "我们的服务第一，保证让您满意",
                "platform": "general",
                "options": {"auto_replace": true}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["forbidden"]["has_forbidden"], true);
        assert_eq!(data["replaced"]["result"], "我们的服务领先的，期待让您满意");
        assert!(data["quality"]["overall"].as_u64().unwrap() <= 100);
    }

    #[tokio::test]
    async fn test_check_platform_defaults_from_feature() {
        let (status, body) = send(
            router_with(&[]),
            "POST",
            "/api/v1/content/check",
            Some(json!({
                "content": "有问题私信我",
                "feature": "video_script",
                "options": {"check_quality": false}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["platform"], "douyin");
        assert_eq!(body["data"]["forbidden"]["matches"][0]["term"], "私信");
        assert!(body["data"].get("quality").is_none());
    }

    #[tokio::test]
    async fn test_check_empty_content_is_400() {
        let (status, body) = send(
            router_with(&[]),
            "POST",
            "/api/v1/content/check",
            Some(json!({"content": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_forbidden_terms_by_platform() {
        let (status, body) = send(
            router_with(&[]),
            "GET",
            "/api/v1/content/forbidden-terms?platform=douyin",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let categories = body["data"]["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 6);
        assert!(categories.iter().any(|c| c["category"] == "douyin"));

        let (status, _) = send(
            router_with(&[]),
            "GET",
            "/api/v1/content/forbidden-terms?platform=tiktok",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
