pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod search;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::ResearchPipeline;
pub use server::launch;
