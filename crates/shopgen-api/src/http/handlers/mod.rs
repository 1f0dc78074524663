//! REST API handlers grouped by resource.

pub mod content;
pub mod generate;
pub mod knowledge;
pub mod skill;

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process router fixtures shared by handler tests.

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use shopgen_core::llm::box_provider::BoxContentProvider;
    use shopgen_core::llm::provider::ContentProvider;
    use shopgen_core::llm::registry::ProviderRegistry;
    use shopgen_infra::secret::StaticCredentials;
    use shopgen_types::config::AppConfig;
    use shopgen_types::llm::{ProviderError, ProviderKind, ProviderRequest, ProviderResponse, Usage};

    use crate::http::router::build_router;
    use crate::state::AppState;

    /// Echoes the user message back, prefixed with the model name.
    pub struct EchoProvider(pub ProviderKind);

    impl ContentProvider for EchoProvider {
        fn kind(&self) -> ProviderKind {
            self.0
        }

        fn supports_vision(&self) -> bool {
            false
        }

        async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                content: format!("[{}] {}", request.model, request.message),
                model: request.model.clone(),
                usage: Usage {
                    input_tokens: 12,
                    output_tokens: 34,
                },
            })
        }
    }

    pub fn state_with(providers: &[ProviderKind]) -> AppState {
        let mut registry = ProviderRegistry::new();
        for kind in providers {
            registry.register(BoxContentProvider::new(EchoProvider(*kind)));
        }
        let mut config = AppConfig::default();
        config.dispatcher.retry_backoff_ms = 0;
        config.retrieval.embedding_dimension = 256;
        AppState::from_parts(config, registry, &StaticCredentials::new()).unwrap()
    }

    pub fn router_with(providers: &[ProviderKind]) -> Router {
        build_router(state_with(providers))
    }

    /// Send one request and decode the JSON body.
    pub async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }
}
