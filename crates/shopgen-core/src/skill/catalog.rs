//! Static skill and model tables.
//!
//! Feature ids (v2 API) resolve through a complexity tier to a primary and
//! fallback model. Preset skill ids (chat surface) carry their own model and
//! temperature. Both tables are compiled in and read-only at runtime.

use shopgen_types::llm::ProviderKind;
use shopgen_types::skill::{ModelRef, ModelTier};

// ---------------------------------------------------------------------------
// Model catalogue (ids accepted by `model_override`)
// ---------------------------------------------------------------------------

pub(crate) const MODEL_CATALOG: &[(&str, ProviderKind, &str)] = &[
    ("claude-sonnet", ProviderKind::Anthropic, "claude-3-5-sonnet-20241022"),
    ("claude-haiku", ProviderKind::Anthropic, "claude-3-5-haiku-20241022"),
    ("claude-opus", ProviderKind::Anthropic, "claude-opus-4-5-20251101"),
    ("qwen-max", ProviderKind::Tongyi, "qwen-max"),
    ("qwen-turbo", ProviderKind::Tongyi, "qwen-turbo"),
    ("qwen-vl-max", ProviderKind::Tongyi, "qwen-vl-max"),
    ("glm-4-flash", ProviderKind::SiliconFlow, "glm-4-flash"),
    ("deepseek-chat", ProviderKind::SiliconFlow, "deepseek-ai/DeepSeek-V2.5"),
    ("qwen3-vl-a3b", ProviderKind::SiliconFlow, "Qwen/Qwen3-VL-30B-A3B-Instruct"),
    ("gpt-4o", ProviderKind::Unified, "gpt-4o"),
];

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Primary and fallback model for a tier.
pub(crate) fn tier_models(tier: ModelTier) -> (ModelRef, ModelRef) {
    match tier {
        ModelTier::High => (
            ModelRef::new(ProviderKind::Anthropic, "claude-3-5-sonnet-20241022"),
            ModelRef::new(ProviderKind::Tongyi, "qwen-max"),
        ),
        ModelTier::Medium => (
            ModelRef::new(ProviderKind::Anthropic, "claude-3-5-haiku-20241022"),
            ModelRef::new(ProviderKind::Tongyi, "qwen-turbo"),
        ),
        ModelTier::Low => (
            ModelRef::new(ProviderKind::Tongyi, "qwen-turbo"),
            ModelRef::new(ProviderKind::SiliconFlow, "glm-4-flash"),
        ),
    }
}

pub(crate) fn default_vision() -> ModelRef {
    ModelRef::new(ProviderKind::Tongyi, "qwen-vl-max")
}

// ---------------------------------------------------------------------------
// Feature ids
// ---------------------------------------------------------------------------

pub(crate) struct FeatureSpec {
    pub id: &'static str,
    pub tier: ModelTier,
    pub temperature: f64,
    pub vision: bool,
}

pub(crate) const FEATURES: &[FeatureSpec] = &[
    FeatureSpec { id: "video_script", tier: ModelTier::Medium, temperature: 0.7, vision: true },
    FeatureSpec { id: "xiaohongshu", tier: ModelTier::Medium, temperature: 0.8, vision: true },
    FeatureSpec { id: "viral_analyze", tier: ModelTier::High, temperature: 0.3, vision: false },
    FeatureSpec { id: "rewrite", tier: ModelTier::Low, temperature: 0.5, vision: false },
    FeatureSpec { id: "moments", tier: ModelTier::Medium, temperature: 0.8, vision: true },
    FeatureSpec { id: "campaign", tier: ModelTier::High, temperature: 0.7, vision: false },
    FeatureSpec { id: "poster_copy", tier: ModelTier::Low, temperature: 0.6, vision: false },
    FeatureSpec { id: "analytics", tier: ModelTier::High, temperature: 0.3, vision: false },
    FeatureSpec { id: "knowledge_qa", tier: ModelTier::High, temperature: 0.1, vision: false },
    FeatureSpec { id: "ai_practice", tier: ModelTier::High, temperature: 0.8, vision: false },
    FeatureSpec { id: "exam_generate", tier: ModelTier::Low, temperature: 0.5, vision: false },
    FeatureSpec { id: "exam_grade", tier: ModelTier::Medium, temperature: 0.2, vision: false },
    FeatureSpec { id: "doc_summary", tier: ModelTier::Low, temperature: 0.3, vision: false },
    FeatureSpec { id: "quality_score", tier: ModelTier::Low, temperature: 0.2, vision: false },
    FeatureSpec { id: "forbidden_check", tier: ModelTier::Low, temperature: 0.1, vision: false },
];

// ---------------------------------------------------------------------------
// Preset skills
// ---------------------------------------------------------------------------

pub(crate) struct PresetSpec {
    pub id: &'static str,
    /// Model catalogue id of the primary model.
    pub model: &'static str,
    pub fallback: Option<&'static str>,
    pub vision: Option<&'static str>,
    pub temperature: f64,
    pub prompt_key: &'static str,
}

pub(crate) const PRESETS: &[PresetSpec] = &[
    PresetSpec {
        id: "moments-copywriter",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: Some("qwen3-vl-a3b"),
        temperature: 0.8,
        prompt_key: "moments",
    },
    PresetSpec {
        id: "video-rewriter",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: None,
        temperature: 0.5,
        prompt_key: "rewrite",
    },
    PresetSpec {
        id: "viral-analyzer",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: None,
        temperature: 0.3,
        prompt_key: "viral_analyze",
    },
    PresetSpec {
        id: "meeting-transcriber",
        model: "claude-haiku",
        fallback: Some("qwen-turbo"),
        vision: None,
        temperature: 0.2,
        prompt_key: "meeting",
    },
    PresetSpec {
        id: "knowledge-query",
        model: "claude-haiku",
        fallback: Some("qwen-turbo"),
        vision: None,
        temperature: 0.1,
        prompt_key: "knowledge_qa",
    },
    PresetSpec {
        id: "official-notice",
        model: "claude-haiku",
        fallback: Some("qwen-turbo"),
        vision: None,
        temperature: 0.2,
        prompt_key: "notice",
    },
    PresetSpec {
        id: "xiaohongshu-writer",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: Some("qwen3-vl-a3b"),
        temperature: 0.8,
        prompt_key: "xiaohongshu",
    },
    PresetSpec {
        id: "campaign-planner",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: None,
        temperature: 0.7,
        prompt_key: "campaign",
    },
    PresetSpec {
        id: "poster-creator",
        model: "claude-opus",
        fallback: Some("qwen-max"),
        vision: None,
        temperature: 0.6,
        prompt_key: "poster_copy",
    },
    PresetSpec {
        id: "photo-selector",
        model: "claude-opus",
        fallback: None,
        vision: Some("qwen3-vl-a3b"),
        temperature: 0.3,
        prompt_key: "photo",
    },
];

pub(crate) fn lookup_model(id: &str) -> Option<ModelRef> {
    MODEL_CATALOG
        .iter()
        .find(|(model_id, _, _)| *model_id == id)
        .map(|(_, provider, model)| ModelRef::new(*provider, *model))
}
