//! Application state wiring all services together.
//!
//! AppState holds the shared service instances used by both the CLI and the
//! REST API. Everything is built once from `AppConfig` at startup.

use std::sync::Arc;

use shopgen_core::compliance::ForbiddenTermEngine;
use shopgen_core::dispatch::Dispatcher;
use shopgen_core::knowledge::engine::RetrievalEngine;
use shopgen_core::llm::registry::ProviderRegistry;
use shopgen_core::service::content::ContentService;
use shopgen_core::skill::resolver::SkillResolver;
use shopgen_infra::config::validate_config;
use shopgen_infra::embedding::build_embedder;
use shopgen_infra::llm::build_registry;
use shopgen_infra::secret::CredentialSource;
use shopgen_infra::secret::env::EnvCredentials;
use shopgen_types::config::AppConfig;

/// Shared application state holding all services.
///
/// Cheap to clone; used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Arc<Dispatcher>,
    pub retrieval: Arc<RetrievalEngine>,
    pub content: Arc<ContentService>,
}

impl AppState {
    /// Build services from `config`, reading API keys from the environment.
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        Self::with_credentials(config, &EnvCredentials)
    }

    pub fn with_credentials(
        config: AppConfig,
        credentials: &dyn CredentialSource,
    ) -> anyhow::Result<Self> {
        validate_config(&config)?;
        let registry = build_registry(&config, credentials)?;
        if registry.is_empty() {
            tracing::warn!("No model provider configured, all generations will be simulated");
        }
        Self::from_parts(config, registry, credentials)
    }

    /// Wire services around an already-built provider registry.
    pub fn from_parts(
        config: AppConfig,
        registry: ProviderRegistry,
        credentials: &dyn CredentialSource,
    ) -> anyhow::Result<Self> {
        let embedder = build_embedder(&config, credentials)?;
        let retrieval = Arc::new(RetrievalEngine::new(embedder, &config.retrieval)?);

        let resolver = Arc::new(SkillResolver::builtin(config.dispatcher.default_max_tokens));
        let dispatcher = Dispatcher::new(resolver, Arc::new(registry), &config.dispatcher)
            .with_retrieval(Arc::clone(&retrieval));

        let content = ContentService::new(Arc::new(ForbiddenTermEngine::builtin()));

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            retrieval,
            content: Arc::new(content),
        })
    }
}
