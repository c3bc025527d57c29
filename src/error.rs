//! 研究流程的错误分类体系

use thiserror::Error;

/// 研究流程的阶段标识
///
/// 只为可能携带未恢复失败的阶段建变体；搜索阶段的单条失败
/// 在批量搜索内被降级吸收，不会以错误形式上抛。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    QueryGeneration,
    Summarization,
    Validation,
    ReportGeneration,
    QuestionGeneration,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::QueryGeneration => write!(f, "查询生成"),
            PipelineStage::Summarization => write!(f, "内容提炼"),
            PipelineStage::Validation => write!(f, "充分性校验"),
            PipelineStage::ReportGeneration => write!(f, "报告生成"),
            PipelineStage::QuestionGeneration => write!(f, "问题生成"),
        }
    }
}

/// 统一的错误分类
///
/// - `Validation`：入参不合法，调用方修正后可恢复
/// - `Configuration`：部署配置缺失（如API KEY），需运维修复
/// - `Search`：单条查询的搜索失败，批量搜索中会被降级为空结果
/// - `Generation`：模型服务调用失败，对当次研究流程是致命的
/// - `SchemaViolation`：模型返回内容不满足约定的结构契约
/// - `Pipeline`：聚合包装，携带首个未恢复失败的阶段标识
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("请求校验失败: {0}")]
    Validation(String),

    #[error("配置缺失: {0}")]
    Configuration(String),

    #[error("搜索服务调用失败: {0}")]
    Search(String),

    #[error("模型服务调用失败: {0}")]
    Generation(String),

    #[error("模型返回结果不符合约定结构: {0}")]
    SchemaViolation(String),

    #[error("研究流程在「{stage}」阶段失败: {source}")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<ResearchError>,
    },
}

impl ResearchError {
    /// 在流程层包装阶段信息
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        ResearchError::Pipeline {
            stage,
            source: Box::new(self),
        }
    }

    /// 边界层的HTTP状态码映射
    pub fn status_code(&self) -> u16 {
        match self {
            ResearchError::Validation(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ResearchError::Validation("topic不能为空".to_string()).status_code(),
            400
        );
        assert_eq!(
            ResearchError::Configuration("缺少EXA_API_KEY".to_string()).status_code(),
            500
        );
        assert_eq!(
            ResearchError::Generation("上游超时".to_string())
                .at_stage(PipelineStage::Summarization)
                .status_code(),
            500
        );
    }

    #[test]
    fn test_pipeline_error_carries_stage() {
        let err = ResearchError::Generation("服务不可用".to_string())
            .at_stage(PipelineStage::QueryGeneration);
        let message = err.to_string();
        assert!(message.contains("查询生成"));
        assert!(message.contains("服务不可用"));
    }
}
