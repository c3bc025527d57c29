pub mod client;

pub use client::{GenerationGateway, LLMClient};
