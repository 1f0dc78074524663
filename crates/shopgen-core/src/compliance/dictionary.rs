//! Built-in forbidden-term dictionary.
//!
//! Terms are grouped by category. The five general categories apply on every
//! platform; the `douyin` and `xiaohongshu` categories only on their own
//! platform. A term listed under several categories belongs to the first one
//! in table order.
//!
//! Replacement suggestions are chosen so that substituting them never forms a
//! new dictionary term with the surrounding unmatched text.

use std::collections::{BTreeMap, HashSet};

use shopgen_types::compliance::{ForbiddenTermEntry, Platform, TermCategory};

/// Shown when a term has no configured replacement.
pub const DEFAULT_SUGGESTION: &str = "建议删除或替换";

const TERMS: &[(TermCategory, &[&str])] = &[
    (
        TermCategory::Absolute,
        &[
            "最", "第一", "顶级", "极致", "绝对", "100%", "永久", "万能", "祖传", "特效", "无敌",
            "冠军", "独一无二", "唯一", "首选", "最佳", "最优", "最好", "最强", "国家级", "世界级",
            "全球首发", "全网最低", "史上最", "前所未有", "绝无仅有",
        ],
    ),
    (
        TermCategory::Medical,
        &[
            "治疗", "治愈", "疗效", "药效", "康复", "根治", "特效药", "医治", "处方", "疾病",
            "病症", "药物", "临床", "诊断", "医疗器械", "抗癌", "防癌", "抗病毒", "杀菌消毒",
        ],
    ),
    (
        TermCategory::FalsePromise,
        &[
            "包治", "包好", "保证", "承诺", "一定", "肯定", "必须", "绝对有效", "100%有效",
            "无效退款", "立竿见影", "立即见效", "马上见效", "永不反弹", "一次根治", "药到病除",
        ],
    ),
    (
        TermCategory::Exaggeration,
        &[
            "神奇", "奇迹", "秘方", "祖传秘方", "独家秘方", "纯天然", "零添加", "无副作用",
            "无任何副作用", "改变命运", "改变人生", "逆天", "神器",
        ],
    ),
    (
        TermCategory::Sensitive,
        &[
            "国家机关", "领导人", "党和国家", "政府", "违法", "违规", "走私", "假冒", "仿冒",
        ],
    ),
    (
        TermCategory::Douyin,
        &[
            "点击下方", "私信", "微信", "加我", "联系方式", "免费领取", "扫码", "vx", "wei信",
            "薇信", "小黄车", "橱窗", "链接在", "评论区见",
        ],
    ),
    (
        TermCategory::Xiaohongshu,
        &[
            "最便宜", "全网最低", "闺蜜价", "内部价", "买它", "必买", "无脑入", "冲冲冲", "代购",
            "正品保证", "假一赔十",
        ],
    ),
];

const SUGGESTIONS: &[(&str, &str)] = &[
    ("最", "非常/特别"),
    ("第一", "领先的/优质的"),
    ("顶级", "高端的/优质的"),
    ("极致", "精心打造的"),
    ("100%", "高达/接近"),
    ("永久", "长期/持久"),
    ("万能", "多功能"),
    ("无敌", "出色的"),
    ("最好", "优质的"),
    ("最强", "强大的"),
    ("唯一", "稀有的"),
    ("首选", "推荐的"),
    ("最佳", "优秀的"),
    ("治疗", "调理/改善"),
    ("治愈", "恢复/好转"),
    ("疗效", "功效/作用"),
    ("康复", "恢复"),
    ("根治", "改善"),
    ("保证", "期待/希望"),
    ("承诺", "力求/致力于"),
    ("一定", "努力做到"),
    ("肯定", "相信会"),
    ("神奇", "独特的"),
    ("奇迹", "惊喜"),
    ("纯天然", "源自天然/天然成分"),
    ("零添加", "少添加剂"),
];

fn suggestion_for(term: &str) -> Option<String> {
    SUGGESTIONS
        .iter()
        .find(|(t, _)| *t == term)
        .map(|(_, s)| (*s).to_string())
}

/// The full term list with categories, scopes and suggestions.
#[derive(Debug, Clone)]
pub struct ForbiddenDictionary {
    entries: Vec<ForbiddenTermEntry>,
}

impl ForbiddenDictionary {
    /// The compiled-in advertising-law and platform term lists.
    pub fn builtin() -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (category, terms) in TERMS {
            for term in *terms {
                if !seen.insert(*term) {
                    continue;
                }
                entries.push(ForbiddenTermEntry {
                    term: (*term).to_string(),
                    category: *category,
                    platform: category.scope(),
                    severity: category.severity(),
                    suggestion: suggestion_for(term),
                });
            }
        }
        Self { entries }
    }

    pub fn from_entries(entries: Vec<ForbiddenTermEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ForbiddenTermEntry] {
        &self.entries
    }

    /// Entries in force on `platform`, in dictionary order.
    pub fn entries_for(&self, platform: Platform) -> impl Iterator<Item = &ForbiddenTermEntry> {
        self.entries.iter().filter(move |e| e.applies_to(platform))
    }

    /// Terms in force on `platform`, grouped by category.
    pub fn terms_by_category(&self, platform: Platform) -> BTreeMap<TermCategory, Vec<String>> {
        let mut grouped: BTreeMap<TermCategory, Vec<String>> = BTreeMap::new();
        for entry in self.entries_for(platform) {
            grouped
                .entry(entry.category)
                .or_default()
                .push(entry.term.clone());
        }
        grouped
    }
}

impl Default for ForbiddenDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}
