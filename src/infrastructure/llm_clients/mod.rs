pub mod anthropic;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;

pub use anthropic::AnthropicClient;

#[async_trait]
pub trait LLMClient {
    /// Sends a single user-role prompt and returns the concatenated text reply.
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String>;
}
