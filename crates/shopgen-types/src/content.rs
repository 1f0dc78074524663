//! Content-check request and result types.

use serde::{Deserialize, Serialize};

use crate::compliance::{ForbiddenCheckResult, Platform, ReplaceResult};
use crate::quality::{ContentType, QualityScoreResult};

/// Which checks `check_content` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCheckOptions {
    #[serde(default = "default_true")]
    pub check_forbidden: bool,
    #[serde(default = "default_true")]
    pub check_quality: bool,
    /// Also produce a replaced copy when forbidden terms are found.
    #[serde(default)]
    pub auto_replace: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ContentCheckOptions {
    fn default() -> Self {
        Self {
            check_forbidden: true,
            check_quality: true,
            auto_replace: false,
        }
    }
}

/// Input to `check_content`.
///
/// `platform` and `content_type` fall back to what `feature` implies, then
/// to `general`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentCheckRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(default)]
    pub options: ContentCheckOptions,
}

impl ContentCheckRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn effective_platform(&self) -> Platform {
        self.platform
            .or_else(|| self.feature.as_deref().map(Platform::for_feature))
            .unwrap_or_default()
    }

    pub fn effective_content_type(&self) -> ContentType {
        self.content_type
            .or_else(|| self.feature.as_deref().map(ContentType::for_feature))
            .unwrap_or_default()
    }
}

/// Output of `check_content`. Sections that were not requested are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentCheckResult {
    pub platform: Platform,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden: Option<ForbiddenCheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced: Option<ReplaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScoreResult>,
}
