//! Forbidden-term compliance types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution channel a piece of content is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Douyin,
    Xiaohongshu,
    Weixin,
    #[default]
    General,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Douyin => write!(f, "douyin"),
            Platform::Xiaohongshu => write!(f, "xiaohongshu"),
            Platform::Weixin => write!(f, "weixin"),
            Platform::General => write!(f, "general"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "douyin" => Ok(Platform::Douyin),
            "xiaohongshu" => Ok(Platform::Xiaohongshu),
            "weixin" => Ok(Platform::Weixin),
            "general" => Ok(Platform::General),
            other => Err(format!("invalid platform: '{other}'")),
        }
    }
}

/// Category of a forbidden term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    /// Absolute superlatives restricted by advertising law.
    Absolute,
    Medical,
    FalsePromise,
    Exaggeration,
    Sensitive,
    /// Douyin-only off-platform solicitation terms.
    Douyin,
    /// Xiaohongshu-only pricing and hard-sell terms.
    Xiaohongshu,
}

impl TermCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            TermCategory::Absolute => "绝对化用语",
            TermCategory::Medical => "医疗相关",
            TermCategory::FalsePromise => "虚假承诺",
            TermCategory::Exaggeration => "夸大宣传",
            TermCategory::Sensitive => "敏感词汇",
            TermCategory::Douyin => "抖音违规词",
            TermCategory::Xiaohongshu => "小红书违规词",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            TermCategory::Medical | TermCategory::Sensitive => Severity::High,
            TermCategory::Absolute | TermCategory::FalsePromise => Severity::Medium,
            TermCategory::Exaggeration | TermCategory::Douyin | TermCategory::Xiaohongshu => {
                Severity::Low
            }
        }
    }

    /// Platform the category is restricted to, if any.
    pub fn scope(&self) -> Option<Platform> {
        match self {
            TermCategory::Douyin => Some(Platform::Douyin),
            TermCategory::Xiaohongshu => Some(Platform::Xiaohongshu),
            _ => None,
        }
    }
}

impl fmt::Display for TermCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermCategory::Absolute => write!(f, "absolute"),
            TermCategory::Medical => write!(f, "medical"),
            TermCategory::FalsePromise => write!(f, "false_promise"),
            TermCategory::Exaggeration => write!(f, "exaggeration"),
            TermCategory::Sensitive => write!(f, "sensitive"),
            TermCategory::Douyin => write!(f, "douyin"),
            TermCategory::Xiaohongshu => write!(f, "xiaohongshu"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenTermEntry {
    pub term: String,
    pub category: TermCategory,
    /// `None` means the entry applies on every platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    pub severity: Severity,
    /// Slash-separated alternatives; the first one is used for replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ForbiddenTermEntry {
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platform.is_none_or(|p| p == platform)
    }

    pub fn replacement(&self) -> Option<&str> {
        self.suggestion
            .as_deref()
            .and_then(|s| s.split('/').next())
            .filter(|s| !s.is_empty())
    }
}

/// A term found in scanned content. Positions are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenMatch {
    pub term: String,
    pub category: TermCategory,
    pub severity: Severity,
    pub position: usize,
    pub length: usize,
    /// Up to ten characters either side of the match.
    pub context: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenCheckResult {
    pub has_forbidden: bool,
    pub matches: Vec<ForbiddenMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub original: String,
    pub replacement: String,
    pub position: usize,
    /// True when no suggestion was configured and the term was masked.
    pub masked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceResult {
    pub result: String,
    pub replacements: Vec<Replacement>,
}
