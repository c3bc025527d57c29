use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod error;
mod llm;
mod pipeline;
mod prompts;
mod search;
mod server;
mod types;

use crate::pipeline::ResearchPipeline;
use crate::types::ResearchRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let topic = args.topic.clone();
    let config = args.into_config();

    match topic {
        // 一次性研究模式：直接在终端输出结果
        Some(topic) => {
            let pipeline = ResearchPipeline::from_config(&config)?;
            let request = ResearchRequest {
                topic,
                follow_up: Vec::new(),
            };
            let response = pipeline.execute_research(&request).await?;

            if response.validated {
                println!("{}", response.report);
            } else {
                eprintln!("⛔ 检索内容不足以生成报告: {}", response.reason);
                eprintln!("已获得的摘要:\n{}", response.summary);
            }
            Ok(())
        }
        // 服务模式：启动HTTP边界
        None => server::launch(&config).await,
    }
}
