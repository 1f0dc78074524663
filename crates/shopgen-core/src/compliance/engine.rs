//! Forbidden-term scanning and replacement.
//!
//! Scanning is a single left-to-right pass over the content's characters. At
//! each position the longest term that matches wins; the scan then resumes
//! after the matched span, so reported matches never overlap. ASCII letters
//! match case-insensitively. `replace` substitutes exactly the spans `check`
//! reports, so the two always agree.

use std::collections::{BTreeMap, HashMap};

use shopgen_types::compliance::{
    ForbiddenCheckResult, ForbiddenMatch, ForbiddenTermEntry, Platform, ReplaceResult,
    Replacement, TermCategory,
};

use super::dictionary::{DEFAULT_SUGGESTION, ForbiddenDictionary};

const CONTEXT_CHARS: usize = 10;
const MASK: char = '*';

const PLATFORMS: [Platform; 4] = [
    Platform::Douyin,
    Platform::Xiaohongshu,
    Platform::Weixin,
    Platform::General,
];

#[derive(Debug, Clone)]
struct IndexedTerm {
    chars: Vec<char>,
    entry: usize,
}

/// Terms in force on one platform, bucketed by first character and
/// sorted longest first.
#[derive(Debug, Clone, Default)]
struct PlatformIndex {
    by_first: HashMap<char, Vec<IndexedTerm>>,
}

impl PlatformIndex {
    fn build(dictionary: &ForbiddenDictionary, platform: Platform) -> Self {
        let mut by_first: HashMap<char, Vec<IndexedTerm>> = HashMap::new();
        for (entry, term) in dictionary.entries().iter().enumerate() {
            if !term.applies_to(platform) {
                continue;
            }
            let chars: Vec<char> = term.term.chars().map(fold).collect();
            let Some(&first) = chars.first() else {
                continue;
            };
            by_first
                .entry(first)
                .or_default()
                .push(IndexedTerm { chars, entry });
        }
        for bucket in by_first.values_mut() {
            bucket.sort_by(|a, b| b.chars.len().cmp(&a.chars.len()).then(a.entry.cmp(&b.entry)));
        }
        Self { by_first }
    }

    /// Longest term starting at `at`, if any.
    fn longest_at(&self, folded: &[char], at: usize) -> Option<&IndexedTerm> {
        self.by_first.get(&folded[at])?.iter().find(|term| {
            folded
                .get(at..at + term.chars.len())
                .is_some_and(|window| window == term.chars.as_slice())
        })
    }
}

fn fold(c: char) -> char {
    c.to_ascii_lowercase()
}

/// A located match before it is rendered into a `ForbiddenMatch`.
struct Span<'a> {
    start: usize,
    len: usize,
    entry: &'a ForbiddenTermEntry,
}

/// Deterministic term scanner over a fixed dictionary.
#[derive(Debug, Clone)]
pub struct ForbiddenTermEngine {
    dictionary: ForbiddenDictionary,
    indexes: HashMap<Platform, PlatformIndex>,
}

impl ForbiddenTermEngine {
    pub fn new(dictionary: ForbiddenDictionary) -> Self {
        let indexes = PLATFORMS
            .iter()
            .map(|&p| (p, PlatformIndex::build(&dictionary, p)))
            .collect();
        Self {
            dictionary,
            indexes,
        }
    }

    pub fn builtin() -> Self {
        Self::new(ForbiddenDictionary::builtin())
    }

    fn scan(&self, chars: &[char], platform: Platform) -> Vec<Span<'_>> {
        let Some(index) = self.indexes.get(&platform) else {
            return Vec::new();
        };
        let folded: Vec<char> = chars.iter().copied().map(fold).collect();
        let entries = self.dictionary.entries();

        let mut spans = Vec::new();
        let mut at = 0;
        while at < folded.len() {
            match index.longest_at(&folded, at) {
                Some(term) => {
                    spans.push(Span {
                        start: at,
                        len: term.chars.len(),
                        entry: &entries[term.entry],
                    });
                    at += term.chars.len();
                }
                None => at += 1,
            }
        }
        spans
    }

    /// Find every forbidden term in `content` for `platform`.
    ///
    /// Positions and lengths are in characters.
    pub fn check(&self, content: &str, platform: Platform) -> ForbiddenCheckResult {
        let chars: Vec<char> = content.chars().collect();
        let matches: Vec<ForbiddenMatch> = self
            .scan(&chars, platform)
            .into_iter()
            .map(|span| {
                let context_start = span.start.saturating_sub(CONTEXT_CHARS);
                let context_end = (span.start + span.len + CONTEXT_CHARS).min(chars.len());
                ForbiddenMatch {
                    term: chars[span.start..span.start + span.len].iter().collect(),
                    category: span.entry.category,
                    severity: span.entry.severity,
                    position: span.start,
                    length: span.len,
                    context: chars[context_start..context_end].iter().collect(),
                    suggestion: span
                        .entry
                        .suggestion
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SUGGESTION.to_string()),
                }
            })
            .collect();

        ForbiddenCheckResult {
            has_forbidden: !matches.is_empty(),
            matches,
        }
    }

    /// Substitute every forbidden term in one pass.
    ///
    /// Terms with a configured suggestion are replaced by its first option;
    /// the rest are masked with `*`, one per character. Unmatched text is
    /// copied verbatim.
    pub fn replace(&self, content: &str, platform: Platform) -> ReplaceResult {
        let chars: Vec<char> = content.chars().collect();
        let spans = self.scan(&chars, platform);
        if spans.is_empty() {
            return ReplaceResult {
                result: content.to_string(),
                replacements: Vec::new(),
            };
        }

        let mut result = String::with_capacity(content.len());
        let mut replacements = Vec::with_capacity(spans.len());
        let mut cursor = 0;
        for span in spans {
            result.extend(&chars[cursor..span.start]);
            let original: String = chars[span.start..span.start + span.len].iter().collect();
            let (replacement, masked) = match span.entry.replacement() {
                Some(r) => (r.to_string(), false),
                None => (MASK.to_string().repeat(span.len), true),
            };
            result.push_str(&replacement);
            replacements.push(Replacement {
                original,
                replacement,
                position: span.start,
                masked,
            });
            cursor = span.start + span.len;
        }
        result.extend(&chars[cursor..]);

        tracing::debug!(%platform, count = replacements.len(), "Forbidden terms replaced");
        ReplaceResult {
            result,
            replacements,
        }
    }

    /// `check` over several texts, in input order.
    pub fn batch_check(&self, texts: &[String], platform: Platform) -> Vec<ForbiddenCheckResult> {
        texts.iter().map(|t| self.check(t, platform)).collect()
    }

    /// Every term in force on `platform`, grouped by category.
    pub fn all_terms(&self, platform: Platform) -> BTreeMap<TermCategory, Vec<String>> {
        self.dictionary.terms_by_category(platform)
    }

    pub fn dictionary(&self) -> &ForbiddenDictionary {
        &self.dictionary
    }
}

impl Default for ForbiddenTermEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopgen_types::compliance::Severity;

    fn engine() -> ForbiddenTermEngine {
        ForbiddenTermEngine::builtin()
    }

    #[test]
    fn test_clean_content_has_no_matches() {
        let result = engine().check("今天店里到了新鲜的郁金香，欢迎来看看。", Platform::General);
        assert!(!result.has_forbidden);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_longest_match_wins_at_position() {
        let result = engine().check("这是最好的选择", Platform::General);
        assert_eq!(result.matches.len(), 1);
        let m = &result.matches[0];
        assert_eq!(m.term, "最好");
        assert_eq!(m.position, 2);
        assert_eq!(m.length, 2);
        assert_eq!(m.suggestion, "优质的");
    }

    #[test]
    fn test_matches_do_not_overlap() {
        // "祖传秘方" covers both "祖传" and "秘方".
        let result = engine().check("祖传秘方", Platform::General);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].term, "祖传秘方");
        assert_eq!(result.matches[0].category, TermCategory::Exaggeration);
    }

    #[test]
    fn test_positions_are_chars_and_context_is_bounded() {
        let content = "一二三四五六七八九十甲乙丙治疗丁戊己庚辛壬癸子丑寅卯辰";
        let result = engine().check(content, Platform::General);
        let m = &result.matches[0];
        assert_eq!(m.position, 13);
        assert_eq!(m.severity, Severity::High);
        assert_eq!(m.context.chars().count(), 22);
        assert!(m.context.starts_with("四"));
    }

    #[test]
    fn test_platform_terms_only_on_their_platform() {
        let content = "有问题私信我";
        assert!(!engine().check(content, Platform::Xiaohongshu).has_forbidden);
        let douyin = engine().check(content, Platform::Douyin);
        assert_eq!(douyin.matches[0].category, TermCategory::Douyin);
        assert_eq!(douyin.matches[0].suggestion, DEFAULT_SUGGESTION);
    }

    #[test]
    fn test_ascii_terms_are_case_insensitive() {
        let result = engine().check("加VX领券", Platform::Douyin);
        assert_eq!(result.matches[0].term, "VX");
    }

    #[test]
    fn test_check_is_deterministic() {
        let content = "史上最低价，100%有效，纯天然无副作用，保证满意！";
        let a = engine().check(content, Platform::Xiaohongshu);
        let b = engine().check(content, Platform::Xiaohongshu);
        assert_eq!(a, b);
        let positions: Vec<usize> = a.matches.iter().map(|m| m.position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_replace_uses_first_suggestion_and_keeps_other_text() {
        let result = engine().replace("我们的服务第一，保证让您满意", Platform::General);
        assert_eq!(result.result, "我们的服务领先的，期待让您满意");
        assert_eq!(result.replacements.len(), 2);
        assert_eq!(result.replacements[0].original, "第一");
        assert_eq!(result.replacements[0].position, 5);
        assert!(!result.replacements[0].masked);
    }

    #[test]
    fn test_replace_masks_terms_without_suggestion() {
        let result = engine().replace("假冒必究", Platform::General);
        assert_eq!(result.result, "**必究");
        assert!(result.replacements[0].masked);
    }

    #[test]
    fn test_replace_output_is_clean() {
        let engine = engine();
        for platform in PLATFORMS {
            let content = "全网最低！最好的疗效，纯纯天然零添加我，一定治愈，特效药无副作用，私信微信vx，买它";
            let replaced = engine.replace(content, platform);
            let recheck = engine.check(&replaced.result, platform);
            assert!(
                !recheck.has_forbidden,
                "{platform}: {:?}",
                recheck.matches
            );
        }
    }

    #[test]
    fn test_replace_without_matches_is_identity() {
        let content = "欢迎光临";
        let result = engine().replace(content, Platform::Weixin);
        assert_eq!(result.result, content);
        assert!(result.replacements.is_empty());
    }

    #[test]
    fn test_batch_check_preserves_order() {
        let texts = vec!["干净的文案".to_string(), "顶级品质".to_string()];
        let results = engine().batch_check(&texts, Platform::General);
        assert!(!results[0].has_forbidden);
        assert!(results[1].has_forbidden);
    }
}
