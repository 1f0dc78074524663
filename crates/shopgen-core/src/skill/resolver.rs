//! Skill resolution: skill/feature id -> `SkillDescriptor`.
//!
//! The table is built once at startup from the compiled-in catalogue and is
//! never mutated afterwards. Unknown ids are an error; the resolver never
//! substitutes a default skill.

use std::collections::HashMap;

use shopgen_types::error::ConfigurationError;
use shopgen_types::skill::{ModelRef, SkillDescriptor};

use super::catalog::{self, FEATURES, PRESETS};

/// O(1) lookup from skill or feature id to its descriptor.
#[derive(Debug, Clone)]
pub struct SkillResolver {
    skills: HashMap<String, SkillDescriptor>,
}

impl SkillResolver {
    /// Build the resolver from the built-in feature and preset tables.
    ///
    /// `default_max_tokens` applies to every entry.
    pub fn builtin(default_max_tokens: u32) -> Self {
        let mut skills = HashMap::with_capacity(FEATURES.len() + PRESETS.len());

        for feature in FEATURES {
            let (primary, fallback) = catalog::tier_models(feature.tier);
            skills.insert(
                feature.id.to_string(),
                SkillDescriptor {
                    id: feature.id.to_string(),
                    primary,
                    fallback: Some(fallback),
                    vision: feature.vision.then(catalog::default_vision),
                    temperature: feature.temperature,
                    max_tokens: default_max_tokens,
                    prompt_key: feature.id.to_string(),
                },
            );
        }

        for preset in PRESETS {
            let Some(primary) = catalog::lookup_model(preset.model) else {
                tracing::error!(skill = preset.id, model = preset.model, "Preset references unknown model");
                continue;
            };
            skills.insert(
                preset.id.to_string(),
                SkillDescriptor {
                    id: preset.id.to_string(),
                    primary,
                    fallback: preset.fallback.and_then(catalog::lookup_model),
                    vision: preset.vision.and_then(catalog::lookup_model),
                    temperature: preset.temperature,
                    max_tokens: default_max_tokens,
                    prompt_key: preset.prompt_key.to_string(),
                },
            );
        }

        Self { skills }
    }

    /// Build a resolver from explicit descriptors.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = SkillDescriptor>) -> Self {
        Self {
            skills: descriptors
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }

    /// Look up a skill or feature id.
    pub fn resolve(&self, id: &str) -> Result<&SkillDescriptor, ConfigurationError> {
        self.skills
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownSkill(id.to_string()))
    }

    /// Look up a model catalogue id (used for `model_override`).
    pub fn resolve_model(&self, id: &str) -> Result<ModelRef, ConfigurationError> {
        catalog::lookup_model(id).ok_or_else(|| ConfigurationError::UnknownModel(id.to_string()))
    }

    /// All resolvable ids, sorted.
    pub fn skill_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopgen_types::llm::ProviderKind;

    #[test]
    fn test_resolve_feature_uses_tier_models() {
        let resolver = SkillResolver::builtin(4096);
        let d = resolver.resolve("campaign").unwrap();
        assert_eq!(d.primary.provider, ProviderKind::Anthropic);
        assert_eq!(d.primary.model, "claude-3-5-sonnet-20241022");
        assert_eq!(d.fallback.as_ref().unwrap().model, "qwen-max");
        assert_eq!(d.max_tokens, 4096);
    }

    #[test]
    fn test_resolve_low_tier_starts_on_tongyi() {
        let resolver = SkillResolver::builtin(4096);
        let d = resolver.resolve("rewrite").unwrap();
        assert_eq!(d.primary.provider, ProviderKind::Tongyi);
        assert_eq!(d.fallback.as_ref().unwrap().provider, ProviderKind::SiliconFlow);
    }

    #[test]
    fn test_resolve_preset_skill() {
        let resolver = SkillResolver::builtin(2048);
        let d = resolver.resolve("moments-copywriter").unwrap();
        assert_eq!(d.primary.model, "claude-opus-4-5-20251101");
        assert!((d.temperature - 0.8).abs() < f64::EPSILON);
        assert_eq!(d.vision.as_ref().unwrap().provider, ProviderKind::SiliconFlow);
        assert_eq!(d.prompt_key, "moments");
    }

    #[test]
    fn test_unknown_id_is_configuration_error() {
        let resolver = SkillResolver::builtin(4096);
        for id in ["", "poem-writer", "MOMENTS", "moments "] {
            let err = resolver.resolve(id).unwrap_err();
            assert_eq!(err, ConfigurationError::UnknownSkill(id.to_string()));
        }
    }

    #[test]
    fn test_every_preset_resolves_its_models() {
        let resolver = SkillResolver::builtin(4096);
        for preset in PRESETS {
            assert!(
                resolver.resolve(preset.id).is_ok(),
                "preset {} did not resolve",
                preset.id
            );
            if let Some(fallback) = preset.fallback {
                assert!(catalog::lookup_model(fallback).is_some(), "{fallback}");
            }
            if let Some(vision) = preset.vision {
                assert!(catalog::lookup_model(vision).is_some(), "{vision}");
            }
        }
        assert_eq!(resolver.skill_ids().len(), FEATURES.len() + PRESETS.len());
    }

    #[test]
    fn test_resolve_model_override() {
        let resolver = SkillResolver::builtin(4096);
        let model = resolver.resolve_model("glm-4-flash").unwrap();
        assert_eq!(model.provider, ProviderKind::SiliconFlow);
        assert!(matches!(
            resolver.resolve_model("gpt-9"),
            Err(ConfigurationError::UnknownModel(_))
        ));
    }
}
