//! Heuristic content quality scorer.
//!
//! Five dimensions are scored independently from a base value and adjusted by
//! fixed heuristics, each clamped to `[0, 100]`. The overall score is the
//! content type's weighted sum of the dimension scores, rounded half up.
//!
//! Scoring performs no I/O and holds no mutable state; identical inputs give
//! identical results.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use shopgen_types::compliance::{Platform, TermCategory};
use shopgen_types::quality::{
    ContentType, FeedbackSeverity, Grade, QualityDimension, QualityFeedback, QualityScoreResult,
};

use crate::compliance::ForbiddenTermEngine;

/// Dimension scores below this produce a suggestion.
pub const SUGGESTION_THRESHOLD: u32 = 70;
const MAX_SUGGESTIONS: usize = 5;

/// Weights in percent, ordered as [`QualityDimension::ALL`]. Each row sums to 100.
pub fn weights(content_type: ContentType) -> [u32; 5] {
    match content_type {
        ContentType::VideoScript => [25, 20, 25, 20, 10],
        ContentType::Xiaohongshu => [20, 25, 15, 30, 10],
        ContentType::Moments => [15, 30, 10, 35, 10],
        ContentType::Article => [30, 25, 25, 10, 10],
        ContentType::Campaign => [20, 20, 35, 15, 10],
        ContentType::Reply => [10, 30, 20, 30, 10],
        ContentType::General => [20, 25, 20, 20, 15],
    }
}

fn base_score(dimension: QualityDimension) -> i32 {
    match dimension {
        QualityDimension::Originality => 80,
        QualityDimension::Readability => 85,
        QualityDimension::Completeness => 90,
        QualityDimension::Engagement => 75,
        QualityDimension::Compliance => 100,
    }
}

const GENERIC_OPENINGS: &[&str] = &[
    "大家好", "今天", "首先", "作为", "众所周知", "相信大家", "想必大家", "不知道大家",
];

const TEMPLATE_PHRASES: &[&str] = &[
    "值得一提的是", "需要注意的是", "总而言之", "综上所述", "不得不说", "必须承认", "一言难尽",
    "毋庸置疑", "不可否认",
];

const JARGON: &[&str] = &["roi", "gmv", "dau", "mau", "sku", "转化率", "复购率", "客单价", "坪效"];

const CAMPAIGN_ELEMENTS: &[&str] = &["背景", "目标", "时间", "内容", "预算", "效果"];

const EMOTIONAL_WORDS: &[&str] = &[
    "惊喜", "震撼", "感动", "开心", "难过", "激动", "太棒了", "绝了", "爱了", "哭了", "笑死",
    "超级", "非常", "特别", "真的", "太",
];

const INTERACTION_CUES: &[&str] = &[
    "你觉得", "你认为", "大家觉得", "有没有人", "评论区", "告诉我", "分享一下", "?", "？",
];

const STORY_CUES: &[&str] = &[
    "有一次", "那天", "记得", "当时", "后来", "突然", "没想到", "结果", "最后",
];

const SEEDING_WORDS: &[&str] = &["安利", "推荐", "入手", "回购", "必买", "宝藏", "神器"];

static HOOK_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[【\[「].+[】\]」]").expect("hook pattern is valid"));
static SENTENCE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。！？.!?]+").expect("sentence pattern is valid"));
static PARAGRAPH_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("paragraph pattern is valid"));
static REPEATED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[！？!?]{3,}").expect("punctuation pattern is valid"));
static CALL_TO_ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"关注|点赞|收藏|评论|转发|私信").expect("cta pattern is valid"));
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\S+").expect("hashtag pattern is valid"));
static PRIVATE_TRADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)私信|私聊|加我|联系方式|微信|wx|vx|薇信").expect("private trade pattern is valid")
});
static ATTENTION_GRABBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9一二三四五六七八九十]|[！!？?]|【|「|\[|^不|别|千万")
        .expect("grabber pattern is valid")
});

/// Accumulates one dimension's score and feedback.
struct DimensionScore {
    dimension: QualityDimension,
    score: i32,
    feedback: Vec<QualityFeedback>,
}

impl DimensionScore {
    fn new(dimension: QualityDimension) -> Self {
        Self {
            dimension,
            score: base_score(dimension),
            feedback: Vec::new(),
        }
    }

    fn adjust(&mut self, delta: i32, severity: FeedbackSeverity, message: impl Into<String>) {
        self.score += delta;
        self.feedback.push(QualityFeedback {
            dimension: self.dimension,
            delta,
            message: message.into(),
            severity,
        });
    }

    fn finish(self) -> (u32, Vec<QualityFeedback>) {
        (self.score.clamp(0, 100) as u32, self.feedback)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

fn is_emoji(c: char) -> bool {
    c > '\u{FFFF}' || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn compliance_deduction(category: TermCategory) -> i32 {
    match category {
        TermCategory::Medical | TermCategory::Sensitive => 15,
        TermCategory::FalsePromise | TermCategory::Absolute => 10,
        TermCategory::Exaggeration => 8,
        TermCategory::Douyin | TermCategory::Xiaohongshu => 5,
    }
}

/// Scores content against the built-in rubric.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    forbidden: Arc<ForbiddenTermEngine>,
}

impl QualityScorer {
    pub fn new(forbidden: Arc<ForbiddenTermEngine>) -> Self {
        Self { forbidden }
    }

    pub fn score(
        &self,
        content: &str,
        content_type: ContentType,
        platform: Platform,
    ) -> QualityScoreResult {
        let parts = [
            originality(content, content_type),
            readability(content, content_type),
            completeness(content, content_type),
            engagement(content, content_type),
            self.compliance(content, platform),
        ];

        let mut dimensions = BTreeMap::new();
        let mut feedback = Vec::new();
        for part in parts {
            let dimension = part.dimension;
            let (score, mut notes) = part.finish();
            dimensions.insert(dimension, score);
            feedback.append(&mut notes);
        }

        let overall = overall_score(&dimensions, content_type);
        let grade = Grade::from_score(overall);
        let suggestions = suggestions(&dimensions, &feedback, content_type);

        tracing::debug!(%content_type, %platform, overall, %grade, "Content scored");

        QualityScoreResult {
            overall,
            grade,
            dimensions,
            feedback,
            suggestions,
        }
    }

    /// Score several items, in input order.
    pub fn batch_score(&self, items: &[(String, ContentType, Platform)]) -> Vec<QualityScoreResult> {
        items
            .iter()
            .map(|(content, content_type, platform)| self.score(content, *content_type, *platform))
            .collect()
    }

    fn compliance(&self, content: &str, platform: Platform) -> DimensionScore {
        let mut dim = DimensionScore::new(QualityDimension::Compliance);

        for m in self.forbidden.check(content, platform).matches {
            let deduction = compliance_deduction(m.category);
            let severity = match m.category {
                TermCategory::Medical | TermCategory::Sensitive => FeedbackSeverity::Error,
                _ => FeedbackSeverity::Warning,
            };
            dim.adjust(
                -deduction,
                severity,
                format!(
                    "发现违规词\"{}\"（{}），建议替换为：{}",
                    m.term,
                    m.category.display_name(),
                    m.suggestion
                ),
            );
        }

        if platform != Platform::Weixin && PRIVATE_TRADE.is_match(content) {
            dim.adjust(
                -10,
                FeedbackSeverity::Warning,
                "检测到引导私下交易的内容，可能违反平台规则",
            );
        }

        dim
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(Arc::new(ForbiddenTermEngine::builtin()))
    }
}

/// Weighted sum of dimension scores, rounded half up.
pub fn overall_score(dimensions: &BTreeMap<QualityDimension, u32>, content_type: ContentType) -> u32 {
    let weighted: u32 = QualityDimension::ALL
        .iter()
        .zip(weights(content_type))
        .map(|(dimension, weight)| dimensions.get(dimension).copied().unwrap_or(0) * weight)
        .sum();
    ((weighted + 50) / 100).min(100)
}

fn originality(text: &str, content_type: ContentType) -> DimensionScore {
    let mut dim = DimensionScore::new(QualityDimension::Originality);

    if GENERIC_OPENINGS.iter().any(|s| text.starts_with(s)) {
        dim.adjust(
            -15,
            FeedbackSeverity::Warning,
            "开头过于平淡，建议使用更有创意的引入方式",
        );
    }

    let templates = TEMPLATE_PHRASES.iter().filter(|p| text.contains(*p)).count() as i32;
    if templates > 2 {
        dim.adjust(
            -templates * 5,
            FeedbackSeverity::Warning,
            format!("使用了 {templates} 处模板化表达，建议用更自然的语言替换"),
        );
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if !words.is_empty() {
        let unique: HashSet<&str> = words.iter().copied().collect();
        let richness = unique.len() as f64 / words.len() as f64;
        if richness < 0.3 {
            dim.adjust(-10, FeedbackSeverity::Info, "词汇重复度较高，建议丰富用词");
        } else if richness > 0.7 {
            dim.adjust(10, FeedbackSeverity::Info, "词汇丰富度高");
        }
    }

    if content_type == ContentType::VideoScript {
        let opening = prefix(text, 50);
        let has_hook =
            HOOK_BRACKETS.is_match(text) || opening.contains('?') || opening.contains('？');
        if !has_hook {
            dim.adjust(
                -5,
                FeedbackSeverity::Info,
                "短视频开头缺少\"钩子\"，建议添加吸引注意力的元素",
            );
        }
    }

    dim
}

fn readability(text: &str, content_type: ContentType) -> DimensionScore {
    let mut dim = DimensionScore::new(QualityDimension::Readability);

    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect();
    let total: usize = sentences.iter().map(|s| char_len(s)).sum();
    let average = total as f64 / sentences.len().max(1) as f64;
    if average > 50.0 {
        dim.adjust(
            -15,
            FeedbackSeverity::Warning,
            format!("平均句子长度 {} 字，建议控制在 30-40 字以内", average.round()),
        );
    } else if average > 40.0 {
        dim.adjust(-5, FeedbackSeverity::Info, "部分句子偏长，可适当拆分");
    }

    let paragraphs = PARAGRAPH_SPLIT
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count();
    if paragraphs == 1 && char_len(text) > 300 {
        dim.adjust(
            -10,
            FeedbackSeverity::Warning,
            "内容缺少分段，建议适当分段提升可读性",
        );
    }

    if matches!(content_type, ContentType::Moments | ContentType::Xiaohongshu) {
        let lowered = text.to_lowercase();
        let jargon = JARGON.iter().filter(|j| lowered.contains(*j)).count() as i32;
        if jargon > 2 {
            dim.adjust(
                -jargon * 5,
                FeedbackSeverity::Warning,
                "包含较多专业术语，可能影响普通用户理解",
            );
        }
    }

    if REPEATED_PUNCTUATION.is_match(text) {
        dim.adjust(-5, FeedbackSeverity::Info, "避免使用连续多个感叹号或问号");
    }

    dim
}

fn completeness(text: &str, content_type: ContentType) -> DimensionScore {
    let mut dim = DimensionScore::new(QualityDimension::Completeness);

    match content_type {
        ContentType::VideoScript => {
            if char_len(text) < 200 {
                dim.adjust(-20, FeedbackSeverity::Warning, "短视频脚本过短，建议扩充内容");
            }
            if !CALL_TO_ACTION.is_match(text) {
                dim.adjust(
                    -10,
                    FeedbackSeverity::Info,
                    "缺少引导用户行动的内容（如关注、点赞等）",
                );
            }
        }
        ContentType::Xiaohongshu => {
            if !text.chars().any(is_emoji) {
                dim.adjust(-5, FeedbackSeverity::Info, "小红书笔记建议添加适当的表情符号");
            }
            if !HASHTAG.is_match(text) {
                dim.adjust(-10, FeedbackSeverity::Warning, "缺少话题标签，建议添加相关话题");
            }
        }
        ContentType::Moments => {
            if char_len(text) > 500 {
                dim.adjust(
                    -10,
                    FeedbackSeverity::Info,
                    "朋友圈文案偏长，建议精简到 300 字以内",
                );
            }
        }
        ContentType::Campaign => {
            let missing: Vec<&str> = CAMPAIGN_ELEMENTS
                .iter()
                .copied()
                .filter(|e| !text.contains(e))
                .collect();
            if missing.len() > 2 {
                dim.adjust(
                    -(missing.len() as i32) * 5,
                    FeedbackSeverity::Warning,
                    format!("活动方案缺少部分要素：{}", missing.join("、")),
                );
            }
        }
        ContentType::Article | ContentType::Reply | ContentType::General => {}
    }

    if text.ends_with("...") || text.ends_with("……") {
        dim.adjust(
            -15,
            FeedbackSeverity::Error,
            "内容似乎未完成，请检查是否有截断",
        );
    }

    dim
}

fn engagement(text: &str, content_type: ContentType) -> DimensionScore {
    let mut dim = DimensionScore::new(QualityDimension::Engagement);

    let emotional = EMOTIONAL_WORDS.iter().filter(|w| text.contains(*w)).count() as i32;
    if emotional > 0 {
        dim.adjust(
            (emotional * 3).min(15),
            FeedbackSeverity::Info,
            "内容包含情感表达，有利于引发共鸣",
        );
    }

    if INTERACTION_CUES.iter().any(|c| text.contains(c)) {
        dim.adjust(10, FeedbackSeverity::Info, "包含互动引导，有助于提升评论数");
    }

    if STORY_CUES.iter().filter(|c| text.contains(*c)).count() >= 2 {
        dim.adjust(10, FeedbackSeverity::Info, "内容有故事性，更容易吸引读者");
    }

    if ATTENTION_GRABBER.is_match(prefix(text, 50)) {
        dim.adjust(5, FeedbackSeverity::Info, "开头具有吸引力");
    }

    if content_type == ContentType::Xiaohongshu && SEEDING_WORDS.iter().any(|w| text.contains(w)) {
        dim.adjust(5, FeedbackSeverity::Info, "包含种草表达");
    }

    dim
}

fn suggestions(
    dimensions: &BTreeMap<QualityDimension, u32>,
    feedback: &[QualityFeedback],
    content_type: ContentType,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for dimension in QualityDimension::ALL {
        if dimensions.get(&dimension).copied().unwrap_or(0) >= SUGGESTION_THRESHOLD {
            continue;
        }
        let tip = match dimension {
            QualityDimension::Originality => "提升原创性：尝试使用更独特的视角或表达方式，避免模板化写作",
            QualityDimension::Readability => "改善可读性：缩短句子长度，增加段落分隔，使用更通俗的语言",
            QualityDimension::Completeness => "增强完整性：确保内容包含所有必要元素，检查是否有遗漏",
            QualityDimension::Engagement => "提升吸引力：增加情感表达、互动元素或故事性内容",
            QualityDimension::Compliance => "注意合规性：根据反馈修改违规词汇，确保符合平台规范",
        };
        out.push(tip.to_string());
    }

    if feedback.iter().any(|f| f.severity == FeedbackSeverity::Error) {
        out.insert(0, "【重要】请优先处理标记为错误的问题".to_string());
    }

    match content_type {
        ContentType::VideoScript if !out.iter().any(|s| s.contains("开头")) => {
            out.push("短视频技巧：前 3 秒至关重要，确保有吸引眼球的\"钩子\"".to_string());
        }
        ContentType::Xiaohongshu => {
            out.push("小红书技巧：图文结合效果更好，注意话题选择和关键词布局".to_string());
        }
        ContentType::Moments => {
            out.push("朋友圈技巧：配合 9 宫格图片效果更佳，发布时间选择早中晚三个高峰期".to_string());
        }
        _ => {}
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> QualityScorer {
        QualityScorer::default()
    }

    #[test]
    fn test_weights_sum_to_one_hundred() {
        for ct in [
            ContentType::VideoScript,
            ContentType::Xiaohongshu,
            ContentType::Moments,
            ContentType::Article,
            ContentType::Campaign,
            ContentType::Reply,
            ContentType::General,
        ] {
            assert_eq!(weights(ct).iter().sum::<u32>(), 100, "{ct}");
        }
    }

    #[test]
    fn test_overall_is_weighted_sum_of_dimensions() {
        let content = "春天来了，店里的郁金香开得正好。你最喜欢哪种颜色？欢迎到店挑选。";
        for ct in [ContentType::General, ContentType::Moments, ContentType::Campaign] {
            let result = scorer().score(content, ct, Platform::Weixin);
            assert_eq!(result.overall, overall_score(&result.dimensions, ct));
            assert_eq!(result.grade, Grade::from_score(result.overall));
            assert_eq!(result.dimensions.len(), 5);
        }
    }

    #[test]
    fn test_clean_general_content_scores() {
        // originality 80 + 10 (single "word"), readability 85, completeness 90,
        // engagement 75 + 3 (非常) + 10 (？) + 5 (？ in opening), compliance 100
        let result = scorer().score("这束花非常适合送给妈妈，你觉得呢？", ContentType::General, Platform::General);
        assert_eq!(result.dimensions[&QualityDimension::Originality], 90);
        assert_eq!(result.dimensions[&QualityDimension::Readability], 85);
        assert_eq!(result.dimensions[&QualityDimension::Completeness], 90);
        assert_eq!(result.dimensions[&QualityDimension::Engagement], 93);
        assert_eq!(result.dimensions[&QualityDimension::Compliance], 100);
        // (90*20 + 85*25 + 90*20 + 93*20 + 100*15 + 50) / 100 = 91
        assert_eq!(result.overall, 91);
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn test_compliance_deductions_and_error_lead_suggestion() {
        let result = scorer().score(
            "本品可以治疗失眠，疗程短，效果保证。",
            ContentType::General,
            Platform::General,
        );
        // 治疗 -15, 保证 -10
        assert_eq!(result.dimensions[&QualityDimension::Compliance], 75);
        assert!(result
            .feedback
            .iter()
            .any(|f| f.dimension == QualityDimension::Compliance
                && f.severity == FeedbackSeverity::Error));
        assert_eq!(result.suggestions[0], "【重要】请优先处理标记为错误的问题");
    }

    #[test]
    fn test_private_trade_penalty_skipped_on_weixin() {
        let content = "想要的朋友加我详聊";
        let general = scorer().score(content, ContentType::General, Platform::General);
        let weixin = scorer().score(content, ContentType::General, Platform::Weixin);
        assert_eq!(general.dimensions[&QualityDimension::Compliance], 90);
        assert_eq!(weixin.dimensions[&QualityDimension::Compliance], 100);
    }

    #[test]
    fn test_truncated_content_is_error() {
        let result = scorer().score("今日特价活动正在进行中……", ContentType::General, Platform::General);
        assert_eq!(result.dimensions[&QualityDimension::Completeness], 75);
        assert!(result.feedback.iter().any(|f| f.severity == FeedbackSeverity::Error));
    }

    #[test]
    fn test_dimension_scores_are_clamped() {
        let heavy = "治疗治愈疗效药效康复根治医治处方疾病病症药物临床诊断".repeat(3);
        let result = scorer().score(&heavy, ContentType::General, Platform::General);
        assert_eq!(result.dimensions[&QualityDimension::Compliance], 0);
        assert!(result.overall <= 100);
        assert!(result.dimensions.values().all(|&s| s <= 100));
    }

    #[test]
    fn test_empty_content_is_scored() {
        let result = scorer().score("", ContentType::VideoScript, Platform::Douyin);
        assert!(result.overall <= 100);
        assert_eq!(result.dimensions[&QualityDimension::Completeness], 60);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let content = "有一次客人突然问我，这款蛋糕是不是当天做的？结果第二天她又来了！#烘焙 #探店";
        let a = scorer().score(content, ContentType::Xiaohongshu, Platform::Xiaohongshu);
        let b = scorer().score(content, ContentType::Xiaohongshu, Platform::Xiaohongshu);
        assert_eq!(a, b);
    }

    #[test]
    fn test_suggestions_are_capped() {
        let content = "大家好……";
        let result = scorer().score(content, ContentType::Moments, Platform::Douyin);
        assert!(result.suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn test_campaign_missing_elements() {
        let result = scorer().score("活动时间：周末", ContentType::Campaign, Platform::General);
        // 背景 目标 内容 预算 效果 missing
        assert_eq!(result.dimensions[&QualityDimension::Completeness], 65);
    }

    #[test]
    fn test_batch_score_preserves_order() {
        let items = vec![
            ("短".to_string(), ContentType::General, Platform::General),
            ("治疗".to_string(), ContentType::General, Platform::General),
        ];
        let results = scorer().batch_score(&items);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].dimensions[&QualityDimension::Compliance], 100);
        assert_eq!(results[1].dimensions[&QualityDimension::Compliance], 85);
    }
}
