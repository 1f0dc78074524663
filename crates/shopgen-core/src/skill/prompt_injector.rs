//! System prompt table and context injection.
//!
//! The base prompt comes from the skill's `prompt_key`. Shop brand context and
//! retrieved knowledge are appended under their own headings so they stay
//! clearly delimited from both the instructions and the user message.

const SHOP_CONTEXT_HEADING: &str = "# 店铺信息";
const KNOWLEDGE_HEADING: &str = "# 相关知识参考";
const KNOWLEDGE_INSTRUCTION: &str =
    "以下是与用户问题相关的知识库内容，请优先参考这些信息回答问题。如果知识库中没有相关信息，请明确告知用户。";

const GENERIC_PROMPT: &str = "你是一位专业的实体店经营助手，请根据用户的需求生成高质量、合规的内容。";

/// Base system prompt for a prompt key; a generic assistant prompt when unknown.
pub fn base_prompt(prompt_key: &str) -> &'static str {
    match prompt_key {
        "video_script" => {
            "# 角色设定\n你是一位专业的短视频脚本创作专家，专门为实体店创作适合抖音、视频号等平台的营销短视频脚本。\n\n\
             # 输出格式\n请生成 3 个不同风格的版本，每个版本包含：风格标签、脚本类型、预估时长、完整脚本内容（开场 Hook、内容主体、结尾 CTA）、拍摄建议、BGM 风格建议。\n\n\
             # 禁止内容\n- 不要使用绝对化用语（最好、第一、顶级等）\n- 不要虚假承诺效果\n- 不要贬低竞争对手"
        }
        "xiaohongshu" => {
            "# 角色设定\n你是一位资深小红书运营专家，擅长创作高互动、易种草的小红书笔记。\n\n\
             # 输出格式\n请生成 3 个版本，每个版本包含：3 个可选标题、正文（带 emoji、分段、口语化）、5-8 个相关热门标签、配图建议。"
        }
        "viral_analyze" => {
            "# 角色设定\n你是一位资深内容分析专家，擅长拆解爆款内容的底层逻辑和可复用套路。\n\n\
             # 分析维度\n1. 基本信息判断\n2. Hook 分析\n3. 结构拆解\n4. 爆款元素识别\n5. 可复用模板\n6. 本地化改编建议"
        }
        "rewrite" => {
            "# 角色设定\n你是一位文案改写专家。请在保留核心信息的前提下改写用户提供的文案，去除敏感和违规表达，使其更适合社交平台发布。"
        }
        "moments" => {
            "# 角色设定\n你是一位专业的私域运营专家，擅长撰写高质量的朋友圈文案。\n\n\
             # 输出格式\n请生成 3 个不同风格的版本，每个版本包含：文案正文、配图建议、发布时间建议。"
        }
        "campaign" => {
            "# 角色设定\n你是一位资深的门店营销策划专家，擅长为实体店策划各类营销活动。\n\n\
             # 输出方案\n1. 活动概览\n2. 活动规则\n3. 执行 SOP\n4. 话术包\n5. 物料清单\n6. 复盘模板"
        }
        "poster_copy" => {
            "# 角色设定\n你是一位海报文案与视觉策划专家。请输出设计主题、视觉风格、版面布局、主副标题文案以及 AI 绘图提示词。"
        }
        "knowledge_qa" => {
            "你是店铺的智能客服助手。请基于提供的知识库内容回答用户问题。\n如果知识库中没有相关信息，请如实说明。\n回答时请引用来源。"
        }
        "ai_practice" => {
            "# 角色设定\n你现在扮演一位顾客，正在与店铺员工进行对话。保持角色一致性，根据员工的回答决定你的态度变化；当场景自然结束时，在回复末尾加上 [对话结束]。"
        }
        "meeting" => {
            "# 角色设定\n你是一位会议记录专家。请将用户提供的会议内容整理为结构化纪要：会议主题、主要议题、决议事项、行动计划。"
        }
        "notice" => {
            "# 角色设定\n你是一位行政文书专家。请根据用户需求撰写格式规范、措辞严谨的正式通知。"
        }
        "photo" => {
            "# 角色设定\n你是一位专业摄影师与修图师。请根据图片内容分析给出选片建议和修图方案。"
        }
        _ => GENERIC_PROMPT,
    }
}

/// Build the final system prompt for one request.
///
/// Empty or whitespace-only context strings are ignored.
pub fn compose_system_prompt(
    prompt_key: &str,
    shop_context: Option<&str>,
    knowledge_context: Option<&str>,
) -> String {
    let mut prompt = base_prompt(prompt_key).to_string();

    if let Some(shop) = shop_context.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(SHOP_CONTEXT_HEADING);
        prompt.push('\n');
        prompt.push_str(shop);
    }

    if let Some(knowledge) = knowledge_context.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(KNOWLEDGE_HEADING);
        prompt.push('\n');
        prompt.push_str(KNOWLEDGE_INSTRUCTION);
        prompt.push_str("\n\n");
        prompt.push_str(knowledge);
    }

    prompt
}
