use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openrouter")]
    #[default]
    OpenRouter,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 研究流程中需要调用模型的阶段
///
/// 每个阶段可以独立配置模型与温度，在确定性与创造性之间各自取舍。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// 查询生成 - 需要理解主题并发散出多角度查询
    Planning,
    /// 内容提炼 - 需要高效、准确的信息压缩
    Extraction,
    /// 充分性校验 - 需要稳定一致的批判性判断
    Analysis,
    /// 报告撰写 - 需要兼顾准确与可读的长文输出
    Report,
    /// 澄清问题生成 - 主流程之外的辅助能力
    Question,
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM服务配置
    pub llm: LLMConfig,

    /// 各阶段的模型配置
    pub models: StageModels,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// HTTP服务边界配置
    pub server: ServerConfig,
}

/// LLM服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 单次调用的最大tokens
    pub max_tokens: u32,
}

/// 单个阶段的模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StageModel {
    /// 模型标识
    pub model: String,

    /// 温度，越低越收敛
    pub temperature: f64,
}

impl StageModel {
    fn new(model: &str, temperature: f64) -> Self {
        Self {
            model: model.to_string(),
            temperature,
        }
    }
}

/// 按阶段划分的模型配置表
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StageModels {
    pub planning: StageModel,
    pub extraction: StageModel,
    pub analysis: StageModel,
    pub report: StageModel,
    pub question: StageModel,
}

impl StageModels {
    /// 取指定阶段的模型配置
    pub fn for_stage(&self, stage: GenerationStage) -> &StageModel {
        match stage {
            GenerationStage::Planning => &self.planning,
            GenerationStage::Extraction => &self.extraction,
            GenerationStage::Analysis => &self.analysis,
            GenerationStage::Report => &self.report,
            GenerationStage::Question => &self.question,
        }
    }
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 搜索服务API KEY
    pub api_key: String,

    /// 搜索服务API基地址
    pub api_base_url: String,

    /// 单次研究最多保留的查询数
    pub max_queries: usize,

    /// 每条查询拉取的结果数
    pub results_per_query: usize,

    /// 搜索时排除的域名
    pub excluded_domains: Vec<String>,
}

/// HTTP服务边界配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub listen_addr: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// 默认模型与原始部署保持一致，各阶段按任务特性设定温度
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite-preview-06-17";

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DEEP_RESEARCH_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://openrouter.ai/api/v1"),
            max_tokens: 16384,
        }
    }
}

impl Default for StageModels {
    fn default() -> Self {
        Self {
            planning: StageModel::new(DEFAULT_MODEL, 0.7),
            extraction: StageModel::new(DEFAULT_MODEL, 0.3),
            analysis: StageModel::new(DEFAULT_MODEL, 0.2),
            report: StageModel::new(DEFAULT_MODEL, 0.4),
            question: StageModel::new(DEFAULT_MODEL, 0.7),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("EXA_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.exa.ai"),
            max_queries: 3,
            results_per_query: 3,
            excluded_domains: vec![
                "reddit.com".to_string(),
                "twitter.com".to_string(),
                "facebook.com".to_string(),
                "youtube.com".to_string(),
            ],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: String::from("127.0.0.1:8080"),
        }
    }
}
