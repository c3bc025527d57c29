use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use deep_research_rs::error::{ResearchError, Result};
use deep_research_rs::llm::GenerationGateway;
use deep_research_rs::pipeline::ResearchPipeline;
use deep_research_rs::search::SearchGateway;
use deep_research_rs::server::validation::validate_research_request;
use deep_research_rs::types::{
    ContentSummary, FollowUpQA, QueryGenerationResult, QuestionGenerationResult, ResearchRequest,
    SearchResult, ValidationVerdict,
};

const FIXED_SUMMARY: &str = "各国可再生能源补贴政策的关键事实摘要";
const FIXED_REPORT: &str = "# Renewable Energy Subsidies\n\nExecutive summary...";

/// 端到端场景的生成网关桩
struct ScenarioGeneration;

#[async_trait]
impl GenerationGateway for ScenarioGeneration {
    async fn generate_search_queries(
        &self,
        topic: &str,
        _follow_up: &[FollowUpQA],
    ) -> Result<QueryGenerationResult> {
        assert_eq!(topic, "renewable energy subsidies");
        Ok(QueryGenerationResult {
            queries: vec![
                "renewable energy subsidy programs 2024".to_string(),
                "renewable subsidy effectiveness studies".to_string(),
            ],
        })
    }

    async fn summarize_content(
        &self,
        _topic: &str,
        raw_content: &str,
        _follow_up: &[FollowUpQA],
    ) -> Result<ContentSummary> {
        // 两条查询各有一个小节，第二条查询没有结果块
        assert!(raw_content.contains("=== Search Query: renewable energy subsidy programs 2024 ==="));
        assert!(raw_content.contains("=== Search Query: renewable subsidy effectiveness studies ==="));
        assert!(raw_content.contains("--- Result 1 ---"));
        assert!(raw_content.contains("--- Result 2 ---"));
        Ok(ContentSummary {
            summary: FIXED_SUMMARY.to_string(),
        })
    }

    async fn validate_content(
        &self,
        _topic: &str,
        _follow_up: &[FollowUpQA],
        summary: &str,
    ) -> Result<ValidationVerdict> {
        assert_eq!(summary, FIXED_SUMMARY);
        Ok(ValidationVerdict {
            is_valid: true,
            reason: "内容覆盖充分".to_string(),
        })
    }

    async fn generate_report(
        &self,
        _topic: &str,
        _follow_up: &[FollowUpQA],
        summary: &str,
        queries: &[String],
    ) -> Result<String> {
        assert_eq!(summary, FIXED_SUMMARY);
        assert_eq!(queries.len(), 2);
        Ok(FIXED_REPORT.to_string())
    }

    async fn generate_questions(&self, _topic: &str) -> Result<QuestionGenerationResult> {
        Ok(QuestionGenerationResult {
            questions: vec!["关注哪些国家？".to_string(), "侧重政策还是市场？".to_string()],
        })
    }
}

/// 端到端场景的搜索网关桩：第一条查询2个结果，第二条0个
struct ScenarioSearch;

#[async_trait]
impl SearchGateway for ScenarioSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        assert_eq!(limit, 3);
        if query == "renewable energy subsidy programs 2024" {
            Ok(vec![
                SearchResult {
                    title: "Global subsidy overview".to_string(),
                    url: "https://example.org/overview".to_string(),
                    text: "Subsidy levels across major economies...".to_string(),
                    published_date: Some("2024-05-01".to_string()),
                    author: None,
                },
                SearchResult {
                    title: "EU subsidy reform".to_string(),
                    url: "https://example.org/eu".to_string(),
                    text: "The EU reformed its support schemes...".to_string(),
                    published_date: None,
                    author: Some("J. Doe".to_string()),
                },
            ])
        } else {
            Ok(Vec::new())
        }
    }

    fn results_per_query(&self) -> usize {
        3
    }
}

#[tokio::test]
async fn test_end_to_end_research_scenario() {
    let pipeline = ResearchPipeline::new(Arc::new(ScenarioGeneration), Arc::new(ScenarioSearch), 3);

    let request = ResearchRequest {
        topic: "renewable energy subsidies".to_string(),
        follow_up: Vec::new(),
    };
    let response = pipeline.execute_research(&request).await.unwrap();

    assert!(response.validated);
    assert_eq!(response.report, FIXED_REPORT);
    assert_eq!(response.summary, FIXED_SUMMARY);
    assert_eq!(response.queries.len(), 2);
}

#[tokio::test]
async fn test_generate_questions_companion_flow() {
    let pipeline = ResearchPipeline::new(Arc::new(ScenarioGeneration), Arc::new(ScenarioSearch), 3);

    let questions = pipeline.generate_questions("renewable energy subsidies").await.unwrap();
    assert_eq!(questions.len(), 2);
}

#[test]
fn test_boundary_validator_accepts_valid_payload() {
    let raw = json!({
        "topic": "renewable energy subsidies",
        "followUp": [{"question": "Which region?", "answer": "EU"}]
    });
    let request = validate_research_request(&raw).unwrap();
    assert_eq!(request.follow_up.len(), 1);
}

#[test]
fn test_boundary_validator_rejects_out_of_bounds_topic() {
    assert!(validate_research_request(&json!({"topic": ""})).is_err());
    assert!(validate_research_request(&json!({"topic": "a".repeat(501)})).is_err());

    let err = validate_research_request(&json!({})).unwrap_err();
    assert!(matches!(err, ResearchError::Validation(_)));
    assert_eq!(err.status_code(), 400);
}
