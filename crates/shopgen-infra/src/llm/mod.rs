//! Vendor adapters.
//!
//! Concrete implementations of the
//! [`ContentProvider`](shopgen_core::llm::provider::ContentProvider) trait
//! and [`build_registry`], which wires the configured and credentialed
//! vendors into a [`ProviderRegistry`].

pub mod anthropic;
pub mod classify;
pub mod openai_compat;

use std::time::Duration;

use shopgen_core::llm::box_provider::BoxContentProvider;
use shopgen_core::llm::registry::ProviderRegistry;
use shopgen_types::config::AppConfig;
use shopgen_types::error::ConfigurationError;
use shopgen_types::llm::ProviderKind;

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::compat_defaults;
use crate::secret::CredentialSource;

/// Create the adapter for one vendor.
///
/// Returns `Ok(None)` when the vendor is disabled or has no credential;
/// the dispatcher then treats it as not configured.
pub fn create_provider(
    kind: ProviderKind,
    config: &AppConfig,
    credentials: &dyn CredentialSource,
) -> Result<Option<BoxContentProvider>, ConfigurationError> {
    let settings = config.provider(kind);
    if !settings.enabled {
        tracing::info!(provider = %kind, "Provider disabled in config");
        return Ok(None);
    }
    let Some(api_key) = credentials.get(&settings.api_key_env) else {
        tracing::info!(provider = %kind, env = %settings.api_key_env, "No credential, provider not registered");
        return Ok(None);
    };

    let timeout = Duration::from_secs(config.dispatcher.provider_timeout_secs);
    let provider = match kind {
        ProviderKind::Anthropic => {
            BoxContentProvider::new(AnthropicProvider::new(api_key, &settings.base_url, timeout)?)
        }
        _ => match compat_defaults(kind, &settings.base_url, api_key) {
            Some(compat) => BoxContentProvider::new(OpenAiCompatibleProvider::new(compat, timeout)?),
            None => return Ok(None),
        },
    };
    Ok(Some(provider))
}

/// Build the registry of every vendor that is enabled and has a credential.
pub fn build_registry(
    config: &AppConfig,
    credentials: &dyn CredentialSource,
) -> Result<ProviderRegistry, ConfigurationError> {
    let mut registry = ProviderRegistry::new();
    for kind in ProviderKind::ALL {
        if let Some(provider) = create_provider(kind, config, credentials)? {
            registry.register(provider);
        }
    }
    tracing::info!(providers = ?registry.kinds(), "Provider registry built");
    Ok(registry)
}
