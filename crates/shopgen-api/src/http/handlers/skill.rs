//! Skill catalogue handler.

use axum::Json;
use axum::extract::State;

use shopgen_types::skill::SkillDescriptor;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// GET /api/v1/skills - Every resolvable skill and feature id with its models.
pub async fn list_skills(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SkillDescriptor>>>, AppError> {
    let clock = RequestClock::start();
    let resolver = state.dispatcher.resolver();
    let skills = resolver
        .skill_ids()
        .into_iter()
        .map(|id| resolver.resolve(id).cloned())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(clock.success(skills).with_link("self", "/api/v1/skills")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::handlers::test_support::{router_with, send};

    #[tokio::test]
    async fn test_lists_feature_and_skill_ids() {
        let (status, body) = send(router_with(&[]), "GET", "/api/v1/skills", None).await;
        assert_eq!(status, StatusCode::OK);
        let skills = body["data"].as_array().unwrap();
        let ids: Vec<&str> = skills.iter().map(|s| s["id"].as_str().unwrap()).collect();
        assert!(ids.contains(&"moments"));
        assert!(ids.contains(&"moments-copywriter"));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
