//! Search Gateway - 封装Exa联网搜索服务

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{ResearchError, Result};
use crate::types::{QuerySearchOutcome, SearchResult};

/// 联网搜索的能力接口
///
/// `search_batch`是缺省实现的定长并发join：所有查询同时发出、
/// 全部落定后按提交顺序收集；单条查询失败只降级为空结果，
/// 批量调用本身绝不因此失败。
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// 执行单条查询，返回规整化的结果列表
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;

    /// 每条查询拉取的结果数
    fn results_per_query(&self) -> usize;

    /// 并发执行一批查询，输出顺序与提交顺序一致
    async fn search_batch(&self, queries: &[String]) -> Vec<QuerySearchOutcome> {
        let limit = self.results_per_query();
        let search_futures = queries.iter().map(|query| async move {
            match self.search(query, limit).await {
                Ok(results) => QuerySearchOutcome {
                    query: query.clone(),
                    results,
                },
                Err(e) => {
                    eprintln!("⚠️ 查询「{}」搜索失败，降级为空结果: {}", query, e);
                    QuerySearchOutcome {
                        query: query.clone(),
                        results: Vec::new(),
                    }
                }
            }
        });

        join_all(search_futures).await
    }
}

/// Exa搜索API的请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_domains: Vec<String>,
    contents: ExaContents,
}

#[derive(Debug, Serialize)]
struct ExaContents {
    text: bool,
}

/// Exa搜索API的响应体
#[derive(Debug, Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaRawResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaRawResult {
    title: Option<String>,
    url: Option<String>,
    text: Option<String>,
    published_date: Option<String>,
    author: Option<String>,
}

impl ExaRawResult {
    /// 规整化：标题/链接/正文缺失时落为空串，可选字段缺失时保持缺省
    fn normalize(self) -> SearchResult {
        SearchResult {
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            text: self.text.unwrap_or_default(),
            published_date: self.published_date,
            author: self.author,
        }
    }
}

/// Exa搜索服务客户端
#[derive(Debug, Clone)]
pub struct ExaSearchService {
    http: reqwest::Client,
    config: SearchConfig,
}

impl ExaSearchService {
    /// 创建搜索客户端，缺少凭证时立即失败
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "未配置搜索服务API KEY（环境变量 EXA_API_KEY）".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }
}

#[async_trait]
impl SearchGateway for ExaSearchService {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let request = ExaSearchRequest {
            query,
            num_results: limit,
            exclude_domains: self.config.excluded_domains.clone(),
            contents: ExaContents { text: true },
        };

        let url = format!("{}/search", self.config.api_base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ResearchError::Search(e.to_string()))?
            .error_for_status()
            .map_err(|e| ResearchError::Search(e.to_string()))?;

        let payload: ExaSearchResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Search(format!("响应解析失败: {}", e)))?;

        Ok(payload
            .results
            .into_iter()
            .map(ExaRawResult::normalize)
            .collect())
    }

    fn results_per_query(&self) -> usize {
        self.config.results_per_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;

    #[test]
    fn test_construction_fails_without_credential() {
        let config = SearchConfig {
            api_key: String::new(),
            ..SearchConfig::default()
        };
        let err = ExaSearchService::new(config).unwrap_err();
        assert!(matches!(err, ResearchError::Configuration(_)));
    }

    #[test]
    fn test_request_serialization_omits_empty_exclusions() {
        let request = ExaSearchRequest {
            query: "renewable energy subsidies",
            num_results: 3,
            exclude_domains: Vec::new(),
            contents: ExaContents { text: true },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["numResults"], 3);
        assert!(json.get("excludeDomains").is_none());
        assert_eq!(json["contents"]["text"], true);
    }

    #[test]
    fn test_raw_result_normalization() {
        let raw: ExaRawResult = serde_json::from_str(
            r#"{"title":null,"url":"https://example.com","text":"body","publishedDate":"2024-01-01"}"#,
        )
        .unwrap();
        let result = raw.normalize();
        assert_eq!(result.title, "");
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.published_date.as_deref(), Some("2024-01-01"));
        assert!(result.author.is_none());
    }
}
