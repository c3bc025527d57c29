//! 研究流程的领域数据模型
//!
//! 对外的JSON字段名统一使用camelCase，与边界接口约定保持一致。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 澄清问答对，用于在研究开始前收窄主题范围
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpQA {
    pub question: String,
    pub answer: String,
}

/// 一次研究请求，经边界校验后在整个流程中保持只读
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default)]
    pub follow_up: Vec<FollowUpQA>,
}

/// 单条检索结果，来自搜索服务的规整化输出
///
/// 可选字段缺失时直接省略，不做任何补造。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// 单条查询的搜索结果归属
///
/// 批量搜索中失败的查询降级为空结果列表，而不是中断整批。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySearchOutcome {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// 查询生成阶段的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryGenerationResult {
    /// 用于调研该主题的搜索查询列表
    pub queries: Vec<String>,
}

/// 内容提炼阶段的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentSummary {
    /// 对检索内容的综合性摘要
    pub summary: String,
}

/// 充分性校验阶段的结构化输出，决定是否进入报告生成
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    /// 当前内容是否足以支撑一份完整的研究报告
    pub is_valid: bool,
    /// 判定理由
    pub reason: String,
}

/// 澄清问题生成的结构化输出（独立于主流程的辅助能力）
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuestionGenerationResult {
    pub questions: Vec<String>,
}

/// 一次研究流程对外可见的唯一产物
///
/// 不变量：`report`非空当且仅当`validated`为true。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub report: String,
    pub queries: Vec<String>,
    pub summary: String,
    pub validated: bool,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_request_follow_up_defaults_to_empty() {
        let request: ResearchRequest =
            serde_json::from_str(r#"{"topic":"量子计算的商业化进展"}"#).unwrap();
        assert_eq!(request.topic, "量子计算的商业化进展");
        assert!(request.follow_up.is_empty());
    }

    #[test]
    fn test_search_result_omits_missing_optional_fields() {
        let result = SearchResult {
            title: "Example".to_string(),
            url: "https://example.com".to_string(),
            text: "body".to_string(),
            published_date: None,
            author: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("publishedDate").is_none());
        assert!(json.get("author").is_none());
    }

    #[test]
    fn test_validation_verdict_uses_camel_case_wire_name() {
        let verdict: ValidationVerdict =
            serde_json::from_str(r#"{"isValid":false,"reason":"覆盖面不足"}"#).unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.reason, "覆盖面不足");
    }
}
