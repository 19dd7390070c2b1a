use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing OpenAI API key: set OPENAI_API_KEY or pass credentials")]
    MissingApiKey,

    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("failed to parse LLM response as JSON: {message}\nResponse: {raw}")]
    Parse { message: String, raw: String },

    #[error("missing required fields in LLM response: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("invalid tense: {0}. Must be 'past', 'present', or 'future'")]
    InvalidTense(String),
}
