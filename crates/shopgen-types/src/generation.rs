//! Generation request/result types.
//!
//! `GenerationRequest` is built per call and never persisted.
//! `GenerationResult` is what every `generate` call returns, real or simulated.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::knowledge::KnowledgeSource;
use crate::llm::{Attachment, ErrorClass, ProviderKind, Usage};

/// Provider label used on simulated results.
pub const SIMULATION_PROVIDER: &str = "simulation";

/// Caller-supplied generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Skill or feature id, e.g. `moments-copywriter` or `video_script`.
    pub skill: String,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Brand context for the shop, appended to the system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_context: Option<String>,
    /// Shop whose knowledge base backs `knowledge_query`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_query: Option<String>,
    /// Model catalogue id replacing the skill's primary model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_override: Option<String>,
}

impl GenerationRequest {
    pub fn new(skill: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Why a result was served from the simulation templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationReason {
    /// `Configuration` only when every attempt failed for configuration reasons.
    pub class: ErrorClass,
    pub detail: String,
}

impl DegradationReason {
    pub fn summary(&self) -> &'static str {
        match self.class {
            ErrorClass::Configuration => "API 未配置",
            ErrorClass::Transient => "API 调用失败",
        }
    }
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.summary(), self.class, self.detail)
    }
}

/// What happened to the optional knowledge lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetrievalStatus {
    NotRequested,
    Augmented { chunks: usize },
    /// Lookup succeeded but nothing cleared the similarity threshold.
    NoMatches,
    /// Lookup failed; generation proceeded without augmentation.
    Failed { reason: String },
}

/// One real provider call made while serving a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub provider: ProviderKind,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a `generate` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub usage: Usage,
    pub is_simulated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation_reason: Option<DegradationReason>,
    pub retrieval: RetrievalStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<KnowledgeSource>,
    /// Set when attachment pre-analysis was attempted and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_analysis_error: Option<String>,
    #[serde(default)]
    pub attempts: Vec<AttemptRecord>,
}

impl GenerationResult {
    pub fn tokens_used(&self) -> u32 {
        self.usage.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_json() {
        let json = r#"{"skill":"moments","message":"hello"}"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.skill, "moments");
        assert!(req.attachments.is_empty());
        assert!(req.knowledge_query.is_none());
        assert!(req.model_override.is_none());
    }

    #[test]
    fn test_degradation_reason_display() {
        let reason = DegradationReason {
            class: ErrorClass::Configuration,
            detail: "no provider credentials".into(),
        };
        assert_eq!(
            reason.to_string(),
            "API 未配置 (configuration): no provider credentials"
        );
    }

    #[test]
    fn test_retrieval_status_serde_tag() {
        let json = serde_json::to_value(RetrievalStatus::Augmented { chunks: 3 }).unwrap();
        assert_eq!(json["status"], "augmented");
        assert_eq!(json["chunks"], 3);
    }
}
