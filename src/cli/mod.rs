use crate::config::{Config, LLMProvider};
use clap::Parser;
use std::path::PathBuf;

/// deep-research-rs - 由Rust与AI驱动的深度研究引擎
#[derive(Parser, Debug)]
#[command(name = "deep-research-rs")]
#[command(
    about = "AI-powered deep research engine. It plans web-search queries for a topic, retrieves and curates content, validates its sufficiency and writes a structured research report."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 一次性研究的主题；指定后不启动HTTP服务，直接在终端输出报告
    #[arg(short, long)]
    pub topic: Option<String>,

    /// HTTP服务监听地址
    #[arg(short, long)]
    pub listen: Option<String>,

    /// LLM Provider (openrouter, openai, anthropic, gemini, deepseek, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 单次调用的最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 统一覆盖所有阶段的模型标识
    #[arg(long)]
    pub model: Option<String>,

    /// 搜索服务API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 单次研究最多保留的查询数
    #[arg(long)]
    pub max_queries: Option<usize>,

    /// 每条查询拉取的结果数
    #[arg(long)]
    pub results_per_query: Option<usize>,
}

impl Args {
    /// 将CLI参数合并到配置，CLI参数优先级最高
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 尝试从默认位置加载，不存在则使用默认值
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("deep-research.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                Config::default()
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        // 统一覆盖各阶段模型
        if let Some(model) = self.model {
            config.models.planning.model = model.clone();
            config.models.extraction.model = model.clone();
            config.models.analysis.model = model.clone();
            config.models.report.model = model.clone();
            config.models.question.model = model;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }
        if let Some(max_queries) = self.max_queries {
            config.search.max_queries = max_queries;
        }
        if let Some(results_per_query) = self.results_per_query {
            config.search.results_per_query = results_per_query;
        }

        // 覆盖服务配置
        if let Some(listen) = self.listen {
            config.server.listen_addr = listen;
        }

        config
    }
}
