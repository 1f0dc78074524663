//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Generation
        .route("/generate", post(handlers::generate::generate))
        // Compliance and quality
        .route("/content/check", post(handlers::content::check_content))
        .route(
            "/content/forbidden-terms",
            get(handlers::content::forbidden_terms),
        )
        // Knowledge base
        .route(
            "/shops/{shop_id}/knowledge",
            post(handlers::knowledge::upload_document).get(handlers::knowledge::list_documents),
        )
        .route(
            "/shops/{shop_id}/knowledge/search",
            post(handlers::knowledge::search),
        )
        .route(
            "/shops/{shop_id}/knowledge/{document_id}",
            delete(handlers::knowledge::delete_document),
        )
        // Skills
        .route("/skills", get(handlers::skill::list_skills));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::handlers::test_support::{router_with, send};

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(router_with(&[]), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(router_with(&[]), "GET", "/api/v1/bots", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
