//! Simulation templates: the last-resort response when no real provider call
//! succeeds.
//!
//! Templates are keyed by skill id (feature ids map onto the closest skill)
//! and echo a character-truncated slice of the user's message. Rendering
//! is deterministic: no clock, no randomness, no I/O. Every template,
//! including the default, renders non-empty text.

/// Bumped whenever template wording changes.
pub const TEMPLATE_VERSION: u32 = 1;

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Template key for a skill or feature id.
fn template_key(skill_id: &str) -> &str {
    match skill_id {
        "moments" => "moments-copywriter",
        "rewrite" => "video-rewriter",
        "viral_analyze" => "viral-analyzer",
        "knowledge_qa" => "knowledge-query",
        "poster_copy" => "poster-creator",
        "xiaohongshu" => "xiaohongshu-writer",
        "campaign" => "campaign-planner",
        other => other,
    }
}

/// Render the canned response for `skill_id`.
pub fn render(skill_id: &str, message: &str, image_count: usize) -> String {
    let echo = |n: usize| truncate_chars(message.trim(), n);

    match template_key(skill_id) {
        "moments-copywriter" => format!(
            "---方案1---\n生活中的小确幸，往往藏在平凡的瞬间里 ✨\n\n{}... 今天的你，是否也遇到了让心情明亮的小事呢？\n\n#生活记录 #美好瞬间 💫\n\n\
             ---方案2---\n记录当下 📸\n\n{}...\n\n有些美好，值得被珍藏。你呢，今天过得怎么样？\n\n\
             ---方案3---\n平凡的日子里，总有不平凡的惊喜 🌟\n\n{}... 分享给你们～\n\n#日常vlog #心情记录",
            echo(30),
            echo(40),
            echo(35)
        ),
        "video-rewriter" => format!(
            "📝 改写后的视频文案：\n\n【精华版】\n{}...\n\n这个版本去除了敏感内容，优化了表达方式，更适合在社交平台发布。\n\n\
             关键亮点：\n• 核心信息保留完整\n• 语言更加流畅自然\n• 符合平台发布规范",
            echo(50)
        ),
        "viral-analyzer" => "🔥 爆款内容分析报告：\n\n**标题吸引力**：85分\n运用了好奇心驱动和情感共鸣\n\n\
             **内容结构**：\n1. 开头：设置悬念，快速抓住注意力\n2. 发展：层层递进，保持阅读节奏\n3. 高潮：情感爆发点，引发共鸣\n4. 结尾：留白思考，促进互动\n\n\
             **可复用元素**：\n- 故事化叙述手法\n- 情感递进节奏\n- 互动式结尾设计"
            .to_string(),
        "meeting-transcriber" => format!(
            "📋 会议纪要\n\n**会议主题**：{}...\n\n**主要议题**：\n1. 讨论了项目进展情况\n2. 确定了下一步工作计划\n3. 分配了具体任务\n\n\
             **决议事项**：\n• 需要在本周内完成方案初稿\n• 下周进行评审\n\n**下次会议**：待定",
            echo(30)
        ),
        "knowledge-query" => format!(
            "💡 为您查询到以下信息：\n\n关于\"{}\"的解答：\n\n1. **基本概念**：这涉及到一个重要的知识点...\n\n\
             2. **实际应用**：在日常经营中，这个概念可以...\n\n3. **扩展知识**：如果您想深入了解，还可以关注...\n\n\
             希望这个回答对您有帮助！如有其他问题，欢迎继续提问。",
            echo(20)
        ),
        "official-notice" => format!(
            "📢 正式通知\n\n**关于{}的通知**\n\n各位同事：\n\n根据相关要求，现就有关事项通知如下：\n\n\
             一、实施时间\n自发布之日起正式实施。\n\n二、具体要求\n1. 请各部门认真学习相关内容\n2. 严格按照规定执行\n3. 做好相关记录和反馈\n\n\
             三、注意事项\n如有疑问，请及时与相关部门联系。\n\n特此通知。",
            echo(20)
        ),
        "xiaohongshu-writer" => format!(
            "📕 小红书笔记草稿\n\n标题：{}｜真实分享\n\n姐妹们～今天想和大家聊聊{}...\n\n\
             💡 小贴士：配图建议 3-6 张，首图清晰明亮\n\n#探店 #好物分享 #生活方式",
            echo(15),
            echo(30)
        ),
        "campaign-planner" => format!(
            "🎯 活动策划方案（草稿）\n\n**活动主题**：{}\n\n**活动背景**：结合门店近期经营情况策划\n\
             **活动目标**：提升到店客流与复购\n**活动时间**：待定\n**活动内容**：到店礼、满减、会员专享\n\
             **预算**：待评估\n**预期效果**：待复盘",
            echo(20)
        ),
        "poster-creator" => format!(
            "🎨 海报设计方案\n\n**设计主题**：{}\n\n**视觉风格**：\n- 现代简约风格\n- 主色调：#FF6B6B（珊瑚红）+ #4ECDC4（青绿色）\n\n\
             **版面布局**：\n- 上部1/3：主标题区域\n- 中部：核心视觉元素\n- 下部：信息说明区\n\n\
             **AI绘图提示词**：\n\"minimalist poster design, coral and teal color scheme, modern typography, clean layout\"",
            echo(20)
        ),
        "photo-selector" => {
            if image_count == 0 {
                "📸 专业选片分析\n\n请上传 1-5 张照片，我将为您提供：\n\n1. 每张照片的评分（1-10分）\n2. 优缺点分析\n3. 修图建议\n4. 推荐照片"
                    .to_string()
            } else {
                format!(
                    "📸 专业选片分析报告\n\n已收到 {image_count} 张照片。\n\n## 照片 1 分析\n\n**综合评分**: 8.5/10\n\n\
                     **修图建议**：\n1. 适当裁剪，突出主体\n2. 提升整体对比度 +15\n3. 提亮暗部 +20\n\n## 总体建议\n\n**推荐照片**: 照片 1"
                )
            }
        }
        _ => format!(
            "感谢您的输入：\"{}\"。\n\n这是一个模拟响应，配置模型服务的 API Key 后即可获得真实的 AI 生成内容。",
            echo(50)
        ),
    }
}
