//! Content generation handler.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, field};

use shopgen_observe::genai_attrs::{self, GenerationOutcome};
use shopgen_types::content::ContentCheckResult;
use shopgen_types::error::DispatchError;
use shopgen_types::generation::{GenerationRequest, GenerationResult};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Post-processing switches for generated content.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub skip_forbidden_check: bool,
    #[serde(default)]
    pub skip_quality_score: bool,
}

/// Request body for `POST /api/v1/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(flatten)]
    pub request: GenerationRequest,
    #[serde(default)]
    pub options: GenerateOptions,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub result: GenerationResult,
    /// Short user-facing note when the content is simulated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<ContentCheckResult>,
}

/// POST /api/v1/generate - Generate content for a skill or feature.
///
/// The dispatcher's cancellation token is tied to this handler: a client
/// disconnect or the request deadline drops the future and cancels it.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ApiResponse<GenerateResponse>>, AppError> {
    let clock = RequestClock::start();
    let GenerateBody { request, options } = body;

    let span = tracing::info_span!(
        "generate",
        request_id = %clock.request_id,
        gen_ai.operation.name = genai_attrs::OP_GENERATE,
        shopgen.skill.id = %request.skill,
        gen_ai.provider.name = field::Empty,
        gen_ai.response.model = field::Empty,
        gen_ai.usage.input_tokens = field::Empty,
        gen_ai.usage.output_tokens = field::Empty,
        shopgen.simulated = field::Empty,
    );

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let deadline = Duration::from_secs(state.config.server.request_timeout_secs);

    let outcome = tokio::time::timeout(deadline, state.dispatcher.generate(&request, &cancel))
        .instrument(span.clone())
        .await;
    let result = match outcome {
        Ok(result) => result?,
        Err(_) => {
            cancel.cancel();
            tracing::warn!(
                parent: &span,
                timeout_secs = deadline.as_secs(),
                "Generation exceeded request deadline"
            );
            return Err(DispatchError::Cancelled.into());
        }
    };

    genai_attrs::record_generation(
        &span,
        GenerationOutcome {
            provider: &result.provider,
            model: &result.model,
            input_tokens: result.usage.input_tokens,
            output_tokens: result.usage.output_tokens,
            simulated: result.is_simulated,
        },
    );

    let check = if options.skip_forbidden_check && options.skip_quality_score {
        None
    } else {
        Some(state.content.post_process(
            &request.skill,
            &result.content,
            !options.skip_forbidden_check,
            !options.skip_quality_score,
        ))
    };

    let notice = result.degradation_reason.as_ref().map(|r| r.summary());
    let response = GenerateResponse {
        result,
        notice,
        check,
    };
    Ok(Json(
        clock
            .success(response)
            .with_link("skills", "/api/v1/skills"),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use shopgen_types::llm::ProviderKind;

    use crate::http::handlers::test_support::{router_with, send};

    #[tokio::test]
    async fn test_generate_with_configured_provider() {
        let router = router_with(&[ProviderKind::Tongyi]);
        let (status, body) = send(
            router,
            "POST",
            "/api/v1/generate",
            Some(json!({"skill": "doc_summary", "message": "总结一下本周的销售情况"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["is_simulated"], false);
        assert_eq!(data["provider"], "tongyi");
        assert!(data["content"].as_str().unwrap().contains("总结一下本周的销售情况"));
        assert!(data.get("notice").is_none());
        assert!(data["check"]["quality"]["overall"].is_u64());
        assert!(data["check"]["forbidden"].is_object());
    }

    #[tokio::test]
    async fn test_generate_without_providers_is_simulated() {
        let router = router_with(&[]);
        let (status, body) = send(
            router,
            "POST",
            "/api/v1/generate",
            Some(json!({
                "skill": "moments-copywriter",
                "message": "今天天气很好",
                "options": {"skip_forbidden_check": true, "skip_quality_score": true}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["is_simulated"], true);
        assert_eq!(data["notice"], "API 未配置");
        assert_eq!(data["degradation_reason"]["class"], "configuration");
        assert!(data["content"].as_str().unwrap().contains("今天天气很好"));
        assert!(data.get("check").is_none());
    }

    #[tokio::test]
    async fn test_generate_unknown_skill_is_404() {
        let (status, body) = send(
            router_with(&[]),
            "POST",
            "/api/v1/generate",
            Some(json!({"skill": "poem-writer", "message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "SKILL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_generate_empty_message_is_400() {
        let (status, body) = send(
            router_with(&[ProviderKind::Tongyi]),
            "POST",
            "/api/v1/generate",
            Some(json!({"skill": "moments", "message": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }
}
