//! 边界请求校验

use serde_json::Value;

use crate::error::{ResearchError, Result};
use crate::types::ResearchRequest;

/// topic的最大长度（字符数）
const MAX_TOPIC_CHARS: usize = 500;

/// 校验原始请求体并构造只读的ResearchRequest
///
/// `followUp`缺省时落为空列表；topic为空、超长，或任一问答对
/// 存在空问题/空回答时报`Validation`错误。
pub fn validate_research_request(raw: &Value) -> Result<ResearchRequest> {
    let request: ResearchRequest = serde_json::from_value(raw.clone())
        .map_err(|e| ResearchError::Validation(format!("请求格式不合法: {}", e)))?;

    if request.topic.is_empty() {
        return Err(ResearchError::Validation("topic不能为空".to_string()));
    }
    if request.topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(ResearchError::Validation(format!(
            "topic长度不能超过{}字符",
            MAX_TOPIC_CHARS
        )));
    }

    for (index, qa) in request.follow_up.iter().enumerate() {
        if qa.question.is_empty() {
            return Err(ResearchError::Validation(format!(
                "followUp[{}].question不能为空",
                index
            )));
        }
        if qa.answer.is_empty() {
            return Err(ResearchError::Validation(format!(
                "followUp[{}].answer不能为空",
                index
            )));
        }
    }

    Ok(request)
}
