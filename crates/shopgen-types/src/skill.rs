//! Skill descriptor types.
//!
//! A skill (or v2 "feature") is a logical content-generation capability that
//! resolves to a concrete provider, model, fallback model, sampling settings
//! and system prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::llm::ProviderKind;

/// A concrete model on a concrete provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub provider: ProviderKind,
    pub model: String,
}

impl ModelRef {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Complexity tier used by feature ids to pick a model pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::High => write!(f, "high"),
            ModelTier::Medium => write!(f, "medium"),
            ModelTier::Low => write!(f, "low"),
        }
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(ModelTier::High),
            "medium" => Ok(ModelTier::Medium),
            "low" => Ok(ModelTier::Low),
            other => Err(format!("invalid model tier: '{other}'")),
        }
    }
}

/// Resolved configuration for one skill or feature id.
///
/// Immutable; built once from the static skill table and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDescriptor {
    pub id: String,
    pub primary: ModelRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ModelRef>,
    /// Model used to describe image attachments before generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<ModelRef>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Key into the system prompt table.
    pub prompt_key: String,
}

impl SkillDescriptor {
    /// The ordered models the dispatcher may try: primary first, then fallback.
    pub fn chain(&self) -> impl Iterator<Item = &ModelRef> {
        std::iter::once(&self.primary).chain(self.fallback.iter())
    }
}
