//! HTTP服务边界
//!
//! 对外暴露两个JSON接口：`POST /api/deep-research`执行完整研究流程，
//! `POST /api/generate-questions`生成澄清问题。边界负责请求校验、
//! 错误到状态码的映射，以及对上游错误信息的脱敏。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::ResearchError;
use crate::pipeline::ResearchPipeline;

pub mod validation;

pub type SharedState = Arc<ResearchPipeline>;

/// 组装路由
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/api/deep-research",
            post(deep_research).fallback(method_not_allowed),
        )
        .route(
            "/api/generate-questions",
            post(generate_questions).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// 启动HTTP服务
pub async fn launch(config: &Config) -> anyhow::Result<()> {
    let pipeline = ResearchPipeline::from_config(config)?;
    let router = build_router(Arc::new(pipeline));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    println!(
        "🚀 deep-research-rs 服务已启动，监听 {}",
        config.server.listen_addr
    );
    axum::serve(listener, router).await?;
    Ok(())
}

async fn deep_research(State(pipeline): State<SharedState>, Json(raw): Json<Value>) -> Response {
    let request = match validation::validate_research_request(&raw) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    match pipeline.execute_research(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            eprintln!("❌ 研究流程执行失败: {}", e);
            error_response(&e)
        }
    }
}

async fn generate_questions(
    State(pipeline): State<SharedState>,
    Json(raw): Json<Value>,
) -> Response {
    let topic = match raw.get("topic").and_then(Value::as_str) {
        Some(topic) if !topic.is_empty() => topic.to_string(),
        _ => {
            return error_response(&ResearchError::Validation("topic不能为空".to_string()));
        }
    };

    match pipeline.generate_questions(&topic).await {
        Ok(questions) => (StatusCode::OK, Json(questions)).into_response(),
        Err(e) => {
            eprintln!("❌ 澄清问题生成失败: {}", e);
            error_response(&e)
        }
    }
}

/// 不支持的请求方法的固定响应
async fn method_not_allowed() -> Response {
    let payload = json!({
        "error": "不支持的请求方法，请使用POST",
        "report": "",
        "queries": [],
        "summary": "",
        "validated": false,
        "reason": "不支持的请求方法，请使用POST",
    });
    (StatusCode::METHOD_NOT_ALLOWED, Json(payload)).into_response()
}

/// 统一的错误响应：固定错误形态 + 按类别映射状态码
fn error_response(err: &ResearchError) -> Response {
    let message = boundary_message(err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let payload = json!({
        "error": message,
        "report": "",
        "queries": [],
        "summary": "",
        "validated": false,
        "reason": message,
    });
    (status, Json(payload)).into_response()
}

/// 对外的错误文案：标明出错的环节，但不透出上游的原始堆栈
fn boundary_message(err: &ResearchError) -> String {
    match err {
        ResearchError::Validation(_) => err.to_string(),
        ResearchError::Configuration(_) => "缺少必要的API配置".to_string(),
        ResearchError::Pipeline { stage, .. } => {
            format!("服务调用错误: 研究流程在「{}」阶段失败", stage)
        }
        ResearchError::Search(_) => "服务调用错误: 搜索服务暂不可用".to_string(),
        ResearchError::Generation(_) | ResearchError::SchemaViolation(_) => {
            "服务调用错误: 模型服务暂不可用".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineStage;

    /// 读出响应的状态码与JSON载荷
    async fn payload_of(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// 校验固定错误形态：report/queries/summary清空、validated为false
    fn assert_error_shape(payload: &Value) {
        assert_eq!(payload["report"], "");
        assert_eq!(payload["queries"], json!([]));
        assert_eq!(payload["summary"], "");
        assert_eq!(payload["validated"], false);
        assert_eq!(payload["error"], payload["reason"]);
    }

    #[tokio::test]
    async fn test_validation_error_response_is_400_with_error_shape() {
        let response = error_response(&ResearchError::Validation("topic不能为空".to_string()));
        let (status, payload) = payload_of(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_shape(&payload);
        assert!(payload["error"].as_str().unwrap().contains("topic不能为空"));
    }

    #[tokio::test]
    async fn test_stage_failure_response_is_500_with_error_shape() {
        let err = ResearchError::Generation("raw provider trace".to_string())
            .at_stage(PipelineStage::ReportGeneration);
        let (status, payload) = payload_of(error_response(&err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_error_shape(&payload);
        let message = payload["error"].as_str().unwrap();
        assert!(message.contains("报告生成"));
        assert!(!message.contains("raw provider trace"));
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_fixed_405_rejection() {
        let (status, payload) = payload_of(method_not_allowed().await).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error_shape(&payload);
        assert!(payload["error"].as_str().unwrap().contains("POST"));
    }

    #[test]
    fn test_boundary_message_identifies_failing_stage() {
        let err = ResearchError::Generation("raw provider trace".to_string())
            .at_stage(PipelineStage::Summarization);
        let message = boundary_message(&err);
        assert!(message.contains("内容提炼"));
        assert!(!message.contains("raw provider trace"));
    }

    #[test]
    fn test_boundary_message_redacts_configuration_detail() {
        let err = ResearchError::Configuration("EXA_API_KEY missing at /etc/...".to_string());
        assert_eq!(boundary_message(&err), "缺少必要的API配置");
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ResearchError::Validation("topic不能为空".to_string());
        assert!(boundary_message(&err).contains("topic不能为空"));
        assert_eq!(err.status_code(), 400);
    }
}
