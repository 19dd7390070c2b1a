use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completion endpoint base, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub model: String,
    /// API key; absent means the caller must supply one per request
    pub api_key: Option<String>,
    /// Kept low so the structured output stays close to deterministic
    pub temperature: f32,
}

impl LlmConfig {
    pub fn new() -> Self {
        let base_url = env::var("KOTOBA_LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let model = env::var("KOTOBA_LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        LlmConfig {
            base_url,
            model,
            api_key: env::var("OPENAI_API_KEY").ok(),
            temperature: 0.3,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::new()
    }
}
