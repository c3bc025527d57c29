//! Generation Gateway - 提供统一的文本生成服务接口

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

pub mod providers;
pub mod utils;

use providers::{GenerationParams, ProviderAgent, ProviderClient};

use crate::config::{Config, GenerationStage, LLMProvider};
use crate::error::{ResearchError, Result};
use crate::prompts;
use crate::types::{ContentSummary, FollowUpQA, QueryGenerationResult, QuestionGenerationResult, ValidationVerdict};

/// 文本生成服务的能力接口，按研究流程的业务操作划分
///
/// 流程编排只依赖这个trait，测试中以桩实现替换真实的模型服务。
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// 查询生成：产出用于联网检索的查询列表
    async fn generate_search_queries(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
    ) -> Result<QueryGenerationResult>;

    /// 内容提炼：将拼接后的检索原文压缩为结构化摘要
    async fn summarize_content(
        &self,
        topic: &str,
        raw_content: &str,
        follow_up: &[FollowUpQA],
    ) -> Result<ContentSummary>;

    /// 充分性校验：判断摘要是否足以支撑完整报告
    async fn validate_content(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
        summary: &str,
    ) -> Result<ValidationVerdict>;

    /// 报告撰写：自由文本模式，不做结构约束
    async fn generate_report(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
        summary: &str,
        queries: &[String],
    ) -> Result<String>;

    /// 澄清问题生成：主流程之外的辅助能力
    async fn generate_questions(&self, topic: &str) -> Result<QuestionGenerationResult>;
}

/// LLM客户端 - GenerationGateway的真实实现
#[derive(Clone)]
pub struct LLMClient {
    config: Config,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端，缺少凭证时立即失败
    pub fn new(config: Config) -> Result<Self> {
        if config.llm.provider != LLMProvider::Ollama && config.llm.api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "未配置LLM API KEY（环境变量 DEEP_RESEARCH_LLM_API_KEY）".to_string(),
            ));
        }

        let client = ProviderClient::new(&config.llm)
            .map_err(|e| ResearchError::Configuration(format!("创建Provider客户端失败: {}", e)))?;
        Ok(Self { config, client })
    }

    /// 按阶段取模型配置并创建Agent
    fn agent_for(&self, stage: GenerationStage) -> ProviderAgent {
        let stage_model = self.config.models.for_stage(stage);
        let params = GenerationParams {
            model: stage_model.model.clone(),
            temperature: stage_model.temperature,
            max_tokens: self.config.llm.max_tokens,
        };
        self.client.create_agent(&params)
    }

    /// 自由文本生成
    pub async fn generate_text(&self, stage: GenerationStage, prompt: &str) -> Result<String> {
        self.agent_for(stage)
            .prompt(prompt)
            .await
            .map_err(|e| ResearchError::Generation(e.to_string()))
    }

    /// 结构化生成
    ///
    /// 模型以文本形式返回JSON，这里提取首个JSON对象并对照`T`的结构声明
    /// 做必填字段与类型的防御性复核，再反序列化为目标类型。
    pub async fn generate_structured<T>(&self, stage: GenerationStage, prompt: &str) -> Result<T>
    where
        T: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static,
    {
        let raw = self.generate_text(stage, prompt).await?;

        let json_text = utils::extract_first_json_object(&raw).ok_or_else(|| {
            ResearchError::SchemaViolation("响应文本中未找到JSON对象".to_string())
        })?;

        let value: serde_json::Value = serde_json::from_str(json_text)
            .map_err(|e| ResearchError::SchemaViolation(format!("JSON解析失败: {}", e)))?;

        utils::verify_schema_contract::<T>(&value)?;

        serde_json::from_value(value)
            .map_err(|e| ResearchError::SchemaViolation(format!("反序列化失败: {}", e)))
    }
}

#[async_trait]
impl GenerationGateway for LLMClient {
    async fn generate_search_queries(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
    ) -> Result<QueryGenerationResult> {
        let prompt = prompts::generate_queries_prompt(topic, follow_up);
        self.generate_structured::<QueryGenerationResult>(GenerationStage::Planning, &prompt)
            .await
    }

    async fn summarize_content(
        &self,
        topic: &str,
        raw_content: &str,
        follow_up: &[FollowUpQA],
    ) -> Result<ContentSummary> {
        let prompt = prompts::summarize_content_prompt(topic, raw_content, follow_up);
        let summary = self
            .generate_structured::<ContentSummary>(GenerationStage::Extraction, &prompt)
            .await?;

        if summary.summary.trim().is_empty() {
            return Err(ResearchError::SchemaViolation(
                "字段 `summary` 不能为空".to_string(),
            ));
        }
        Ok(summary)
    }

    async fn validate_content(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
        summary: &str,
    ) -> Result<ValidationVerdict> {
        let prompt = prompts::validate_content_prompt(topic, follow_up, summary);
        self.generate_structured::<ValidationVerdict>(GenerationStage::Analysis, &prompt)
            .await
    }

    async fn generate_report(
        &self,
        topic: &str,
        follow_up: &[FollowUpQA],
        summary: &str,
        queries: &[String],
    ) -> Result<String> {
        let prompt = prompts::generate_report_prompt(topic, follow_up, summary, queries);
        let report = self.generate_text(GenerationStage::Report, &prompt).await?;

        if report.trim().is_empty() {
            return Err(ResearchError::Generation(
                "模型返回了空的报告内容".to_string(),
            ));
        }
        Ok(report)
    }

    async fn generate_questions(&self, topic: &str) -> Result<QuestionGenerationResult> {
        let prompt = prompts::generate_questions_prompt(topic);
        self.generate_structured::<QuestionGenerationResult>(GenerationStage::Question, &prompt)
            .await
    }
}
