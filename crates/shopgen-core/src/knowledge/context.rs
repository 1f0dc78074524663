//! Rendering ranked chunks into prompt context.

use shopgen_types::knowledge::ScoredChunk;

const CHUNK_SEPARATOR: &str = "\n\n---\n\n";
const TRUNCATION_MARKER: &str = "\n\n[... 内容已截断 ...]";
const SENTENCE_ENDS: [char; 6] = ['。', '！', '？', '.', '!', '?'];

/// Render chunks as numbered, titled sources in rank order.
pub fn render_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[来源 {}: {}]\n{}", i + 1, chunk.title, chunk.text))
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Rough token estimate: 1.5 per CJK ideograph plus one per other word.
pub fn estimate_tokens(text: &str) -> usize {
    let cjk = text.chars().filter(|&c| is_cjk(c)).count();
    let words = text
        .split(|c: char| c.is_whitespace() || is_cjk(c))
        .filter(|w| !w.is_empty())
        .count();
    (cjk as f64 * 1.5 + words as f64).ceil() as usize
}

/// Trim `context` to roughly `max_tokens`.
///
/// The cut lands on a sentence end when one exists in the last fifth of the
/// kept text, and a truncation marker is appended.
pub fn optimize_context(context: &str, max_tokens: usize) -> String {
    let current = estimate_tokens(context);
    if current <= max_tokens {
        return context.to_string();
    }

    let chars: Vec<char> = context.chars().collect();
    let ratio = max_tokens as f64 / current as f64;
    let target = ((chars.len() as f64) * ratio * 0.9).floor() as usize;
    let kept = &chars[..target.min(chars.len())];

    let cut = kept
        .iter()
        .rposition(|c| SENTENCE_ENDS.contains(c))
        .filter(|&pos| pos as f64 > target as f64 * 0.8)
        .map_or(kept.len(), |pos| pos + 1);

    let mut out: String = kept[..cut].iter().collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scored(title: &str, text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk_id: format!("{title}#00000"),
            document_id: Uuid::nil(),
            title: title.to_string(),
            category: None,
            text: text.to_string(),
            position: 0,
            similarity: 0.9,
        }
    }

    #[test]
    fn test_render_numbers_sources_in_order() {
        let context = render_context(&[scored("营业时间", "9:00 开门"), scored("退换政策", "七天无理由")]);
        assert_eq!(
            context,
            "[来源 1: 营业时间]\n9:00 开门\n\n---\n\n[来源 2: 退换政策]\n七天无理由"
        );
        assert_eq!(render_context(&[]), "");
    }

    #[test]
    fn test_estimate_tokens_mixed_text() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("hello world"), 2);
        // 4 ideographs -> 6, plus "VIP"
        assert_eq!(estimate_tokens("会员VIP折扣"), 7);
    }

    #[test]
    fn test_optimize_within_budget_is_unchanged() {
        let text = "短文本。";
        assert_eq!(optimize_context(text, 100), text);
    }

    #[test]
    fn test_optimize_truncates_at_sentence_end() {
        let text = "店铺提供同城配送服务。".repeat(100);
        let out = optimize_context(&text, 100);
        assert!(out.ends_with(TRUNCATION_MARKER));
        let body = out.trim_end_matches(TRUNCATION_MARKER);
        assert!(body.ends_with('。'));
        assert!(estimate_tokens(body) <= 100);
    }
}
