//! Quality scoring types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compliance::Platform;

/// Kind of content being scored; selects the dimension weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    VideoScript,
    Xiaohongshu,
    Moments,
    Article,
    Campaign,
    Reply,
    #[default]
    General,
}

impl ContentType {
    /// Content type implied by a feature id, `General` when unknown.
    pub fn for_feature(feature: &str) -> Self {
        match feature {
            "video_script" => ContentType::VideoScript,
            "xiaohongshu" => ContentType::Xiaohongshu,
            "moments" => ContentType::Moments,
            "campaign" => ContentType::Campaign,
            _ => ContentType::General,
        }
    }
}

impl Platform {
    /// Platform implied by a feature id, `General` when unknown.
    pub fn for_feature(feature: &str) -> Self {
        match feature {
            "video_script" => Platform::Douyin,
            "xiaohongshu" => Platform::Xiaohongshu,
            "moments" => Platform::Weixin,
            _ => Platform::General,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::VideoScript => write!(f, "video_script"),
            ContentType::Xiaohongshu => write!(f, "xiaohongshu"),
            ContentType::Moments => write!(f, "moments"),
            ContentType::Article => write!(f, "article"),
            ContentType::Campaign => write!(f, "campaign"),
            ContentType::Reply => write!(f, "reply"),
            ContentType::General => write!(f, "general"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video_script" => Ok(ContentType::VideoScript),
            "xiaohongshu" => Ok(ContentType::Xiaohongshu),
            "moments" => Ok(ContentType::Moments),
            "article" => Ok(ContentType::Article),
            "campaign" => Ok(ContentType::Campaign),
            "reply" => Ok(ContentType::Reply),
            "general" => Ok(ContentType::General),
            other => Err(format!("invalid content type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Originality,
    Readability,
    Completeness,
    Engagement,
    Compliance,
}

impl QualityDimension {
    pub const ALL: [QualityDimension; 5] = [
        QualityDimension::Originality,
        QualityDimension::Readability,
        QualityDimension::Completeness,
        QualityDimension::Engagement,
        QualityDimension::Compliance,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            QualityDimension::Originality => "原创性",
            QualityDimension::Readability => "可读性",
            QualityDimension::Completeness => "完整性",
            QualityDimension::Engagement => "吸引力",
            QualityDimension::Compliance => "合规性",
        }
    }
}

impl fmt::Display for QualityDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityDimension::Originality => write!(f, "originality"),
            QualityDimension::Readability => write!(f, "readability"),
            QualityDimension::Completeness => write!(f, "completeness"),
            QualityDimension::Engagement => write!(f, "engagement"),
            QualityDimension::Compliance => write!(f, "compliance"),
        }
    }
}

/// Letter grade banded from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "优秀 - 内容质量上乘，可直接发布",
            Grade::B => "良好 - 内容整体不错，小幅调整即可",
            Grade::C => "一般 - 内容及格，建议优化后发布",
            Grade::D => "较差 - 内容存在明显问题，需要较大改进",
            Grade::F => "不合格 - 内容需要重写或大幅修改",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSeverity {
    Info,
    Warning,
    Error,
}

/// One heuristic observation and its effect on a dimension score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFeedback {
    pub dimension: QualityDimension,
    pub delta: i32,
    pub message: String,
    pub severity: FeedbackSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreResult {
    /// Weighted combination of `dimensions`, rounded, in `[0, 100]`.
    pub overall: u32,
    pub grade: Grade,
    pub dimensions: BTreeMap<QualityDimension, u32>,
    pub feedback: Vec<QualityFeedback>,
    pub suggestions: Vec<String>,
}
