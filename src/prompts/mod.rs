//! 研究流程的Prompt模板
//!
//! 全部为纯函数渲染：相同入参产出字节一致的Prompt，不做截断与清洗，
//! 输出格式契约由调用方（Generation Gateway）负责复核。

use crate::types::FollowUpQA;

/// 将澄清问答渲染为`Q:`/`A:`段落，无内容时整段省略
fn render_follow_up(follow_up: &[FollowUpQA], heading: &str) -> String {
    if follow_up.is_empty() {
        return String::new();
    }

    let pairs = follow_up
        .iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("\n\n{}:\n{}", heading, pairs)
}

/// 查询生成模板
pub fn generate_queries_prompt(topic: &str, follow_up: &[FollowUpQA]) -> String {
    let follow_up_context = render_follow_up(follow_up, "Additional context from follow-up questions");

    format!(
        r#"You are a research assistant. Generate up to 3 optimized search queries that will help gather comprehensive information to write a detailed research report on the given topic.

Topic: {topic}{follow_up_context}

Requirements:
- Generate 2-3 specific, targeted search queries
- Each query should focus on different aspects of the topic
- Queries should be optimized for web search engines
- Avoid overly broad or generic terms
- Consider current events, statistics, expert opinions, and practical applications

Return your response as a JSON object with this structure:
{{
  "queries": ["query1", "query2", "query3"]
}}"#
    )
}

/// 内容提炼模板
pub fn summarize_content_prompt(topic: &str, raw_content: &str, follow_up: &[FollowUpQA]) -> String {
    let follow_up_context = render_follow_up(follow_up, "Additional context from follow-up questions");

    format!(
        r#"You are a research analyst. Curate and summarize the following raw content into a concise, well-structured summary that will be used to write a comprehensive research report.

Topic: {topic}{follow_up_context}

Raw Content:
{raw_content}

Requirements:
- Create a clear, structured summary
- Focus on key facts, statistics, and insights relevant to the topic
- Remove redundant information
- Organize information logically
- Maintain factual accuracy
- Keep the summary comprehensive but concise (aim for 500-800 words)

Return your response as a JSON object with this structure:
{{
  "summary": "your curated summary here"
}}"#
    )
}

/// 充分性校验模板
pub fn validate_content_prompt(topic: &str, follow_up: &[FollowUpQA], summary: &str) -> String {
    let follow_up_context = render_follow_up(follow_up, "Follow-up Q&A");

    format!(
        r#"You are a research quality assessor. Evaluate whether the current content is sufficient to write a comprehensive research report.

Topic: {topic}{follow_up_context}

Curated Summary:
{summary}

Assessment Criteria:
- Does the content adequately cover the main aspects of the topic?
- Is there sufficient depth and detail for a comprehensive report?
- Are key questions about the topic addressed?
- Is the information current and relevant?
- Are there any critical gaps in the information?

Return your response as a JSON object with this structure:
{{
  "isValid": true/false,
  "reason": "detailed explanation of your assessment"
}}"#
    )
}

/// 报告撰写模板
///
/// 报告篇幅（1000-1500词）只是Prompt层面的约束，不做程序化校验。
pub fn generate_report_prompt(
    topic: &str,
    follow_up: &[FollowUpQA],
    summary: &str,
    queries: &[String],
) -> String {
    let follow_up_context = render_follow_up(follow_up, "Follow-up Questions & Answers");
    let queries_used = queries.join(", ");

    format!(
        r#"You are an expert research writer. Generate a detailed, structured research report based on all the provided information.

Topic: {topic}{follow_up_context}

Research Summary:
{summary}

Search Queries Used: {queries_used}

Requirements:
- Write a comprehensive, well-structured research report
- Use clear headings and subheadings
- Include an executive summary at the beginning
- Present information in a logical flow
- Include specific facts, statistics, and insights
- Reference the follow-up Q&A when relevant
- Write in a professional, academic tone
- Aim for 1000-1500 words
- Use markdown formatting for structure

Generate only the report content, not wrapped in JSON."#
    )
}

/// 澄清问题生成模板（独立于主流程的辅助能力）
pub fn generate_questions_prompt(topic: &str) -> String {
    format!(
        r#"You are an intelligent research assistant. Given a broad topic, generate 2 to 4 concise, specific questions that help narrow the scope of the research.
The questions should be easy to answer quickly (e.g., with a word, short phrase, or simple sentence). Focus on identifying:
- Which specific aspect(s) of the topic the user is interested in (e.g., historical context, current trends, specific applications)
- The type of information the user is looking for (e.g., statistics, case studies, expert opinions)
- Any specific constraints or requirements (e.g., geographical focus, time period, format)
- The desired outcome or goal of the research (e.g., understanding a concept, making a decision, generating ideas)
- The desired level of detail or complexity (e.g., beginner, expert, technical, strategic)
- Any preferred viewpoints, contexts, or sources to include or avoid

Input:
Topic: {topic}

Output:
A list of 2 to 4 brief, targeted questions to refine the research direction.
Return the result as a JSON object with a "questions" key containing the array of questions."#
    )
}
