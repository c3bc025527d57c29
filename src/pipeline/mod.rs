//! Research Pipeline - 五阶段研究流程的编排器
//!
//! 严格串行推进：查询生成 → 联网搜索（阶段内并发）→ 内容提炼 →
//! 充分性校验 → （通过时）报告生成。任一阶段的未恢复失败都会
//! 短路后续阶段，以携带阶段标识的聚合错误上抛。

use std::sync::Arc;

use crate::config::Config;
use crate::error::{PipelineStage, ResearchError, Result};
use crate::llm::{GenerationGateway, LLMClient};
use crate::search::{ExaSearchService, SearchGateway};
use crate::types::{QuerySearchOutcome, ResearchRequest, ResearchResponse};

/// 研究流程编排器
pub struct ResearchPipeline {
    llm: Arc<dyn GenerationGateway>,
    search: Arc<dyn SearchGateway>,
    max_queries: usize,
}

impl ResearchPipeline {
    /// 以显式的网关实例组装流程，便于测试替换
    pub fn new(
        llm: Arc<dyn GenerationGateway>,
        search: Arc<dyn SearchGateway>,
        max_queries: usize,
    ) -> Self {
        Self {
            llm,
            search,
            max_queries,
        }
    }

    /// 从配置组装真实的网关实例
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = LLMClient::new(config.clone())?;
        let search = ExaSearchService::new(config.search.clone())?;
        Ok(Self::new(
            Arc::new(llm),
            Arc::new(search),
            config.search.max_queries,
        ))
    }

    /// 执行一次完整的研究流程
    ///
    /// 请求在整个流程中只读；充分性校验未通过时直接返回
    /// `validated=false`且`report`为空的响应，不再消耗报告生成调用。
    pub async fn execute_research(&self, request: &ResearchRequest) -> Result<ResearchResponse> {
        // 阶段一：查询生成
        println!("🔎 阶段一：生成检索查询...");
        let query_result = self
            .llm
            .generate_search_queries(&request.topic, &request.follow_up)
            .await
            .map_err(|e| e.at_stage(PipelineStage::QueryGeneration))?;

        // 即使模型给出更多查询也只做截断，不重新生成
        let mut queries = query_result.queries;
        queries.truncate(self.max_queries);
        println!("   生成查询: {:?}", queries);

        // 阶段二：联网搜索（并发，单条失败降级为空结果）
        println!("🌐 阶段二：执行联网搜索...");
        let outcomes = self.search.search_batch(&queries).await;
        let raw_content = combine_search_results(&outcomes);

        // 阶段三：内容提炼
        println!("📋 阶段三：提炼检索内容...");
        let summary = self
            .llm
            .summarize_content(&request.topic, &raw_content, &request.follow_up)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Summarization))?;

        // 阶段四：充分性校验
        println!("🧐 阶段四：校验内容充分性...");
        let verdict = self
            .llm
            .validate_content(&request.topic, &request.follow_up, &summary.summary)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Validation))?;

        // 校验门：未通过时跳过报告生成，直接返回
        if !verdict.is_valid {
            println!("⛔ 内容未通过充分性校验: {}", verdict.reason);
            return Ok(ResearchResponse {
                report: String::new(),
                queries,
                summary: summary.summary,
                validated: false,
                reason: verdict.reason,
            });
        }

        // 阶段五：报告生成（仅在校验通过后执行）
        println!("📝 阶段五：撰写研究报告...");
        let report = self
            .llm
            .generate_report(&request.topic, &request.follow_up, &summary.summary, &queries)
            .await
            .map_err(|e| e.at_stage(PipelineStage::ReportGeneration))?;

        // 守住不变量：校验通过的响应必须携带非空报告
        if report.trim().is_empty() {
            return Err(ResearchError::Generation("模型返回了空的报告内容".to_string())
                .at_stage(PipelineStage::ReportGeneration));
        }

        println!("✅ 研究流程执行完毕");
        Ok(ResearchResponse {
            report,
            queries,
            summary: summary.summary,
            validated: true,
            reason: verdict.reason,
        })
    }

    /// 澄清问题生成：给定主题产出2-4个收窄范围的问题
    ///
    /// 与主流程相互独立；一个问题都没有时整次调用失败。
    pub async fn generate_questions(&self, topic: &str) -> Result<Vec<String>> {
        let result = self
            .llm
            .generate_questions(topic)
            .await
            .map_err(|e| e.at_stage(PipelineStage::QuestionGeneration))?;

        if result.questions.is_empty() {
            return Err(ResearchError::SchemaViolation(
                "模型未生成任何澄清问题".to_string(),
            )
            .at_stage(PipelineStage::QuestionGeneration));
        }

        Ok(result.questions)
    }
}

/// 将批量搜索结果拼接为单块文本
///
/// 每条查询一个带标签的小节，小节内按原始顺序编号列出结果，
/// 可选字段缺失时对应行整体省略。
fn combine_search_results(outcomes: &[QuerySearchOutcome]) -> String {
    let mut combined = String::new();

    for outcome in outcomes {
        combined.push_str(&format!("\n\n=== Search Query: {} ===\n\n", outcome.query));

        for (index, result) in outcome.results.iter().enumerate() {
            combined.push_str(&format!("--- Result {} ---\n", index + 1));
            combined.push_str(&format!("Title: {}\n", result.title));
            combined.push_str(&format!("URL: {}\n", result.url));
            if let Some(published) = &result.published_date {
                combined.push_str(&format!("Published: {}\n", published));
            }
            if let Some(author) = &result.author {
                combined.push_str(&format!("Author: {}\n", author));
            }
            combined.push_str(&format!("Content: {}\n\n", result.text));
        }
    }

    combined
}
