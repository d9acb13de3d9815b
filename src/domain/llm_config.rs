use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct LLMConfig {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[validate(length(min = 1))]
    pub anthropic_version: String,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// The configured key, if it holds anything besides whitespace.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-3-7-sonnet-20250219".to_string(),
            api_key: None,
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            max_tokens: 8000,
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}
