use kotoba_config::llm::LlmConfig;
use kotoba_types::card::LlmCard;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;

/// The 13 keys every model response must carry.
const REQUIRED_FIELDS: [&str; 13] = [
    "source_input",
    "tense",
    "has_polite_and_casual",
    "polite_jp",
    "polite_kana",
    "polite_reading",
    "translation_polite",
    "casual_jp",
    "casual_kana",
    "translation_casual",
    "notes",
    "img_prompt_polite",
    "img_prompt_casual",
];

const VALID_TENSES: [&str; 3] = ["past", "present", "future"];

/// Chat-completion client producing validated [`LlmCard`] data.
///
/// One request per input, no retries; every failure propagates to the
/// pipeline, which aborts the invocation.
#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f32,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Generate structured card data for one trimmed Japanese input.
    ///
    /// `api_key` overrides the configured key for this call; `system_prompt`
    /// overrides the embedded template.
    pub async fn generate_card(
        &self,
        input: &str,
        api_key: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<LlmCard, LlmError> {
        let key = api_key
            .or(self.config.api_key.as_deref())
            .ok_or(LlmError::MissingApiKey)?;

        let prompt = system_prompt.unwrap_or_else(|| crate::default_system_prompt());
        let user = format!("Generate data for this Japanese input: {input}");

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: self.config.temperature,
        };

        tracing::debug!(model = %self.config.model, "requesting chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: extract_api_message(&message),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        parse_card(&content)
    }
}

/// Parse and validate the model's JSON payload.
pub fn parse_card(content: &str) -> Result<LlmCard, LlmError> {
    let cleaned = strip_code_fence(content);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| LlmError::Parse {
        message: e.to_string(),
        raw: content.to_string(),
    })?;

    let object = value.as_object().ok_or_else(|| LlmError::Parse {
        message: "expected a JSON object".to_string(),
        raw: content.to_string(),
    })?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LlmError::MissingFields(missing));
    }

    let tense = &object["tense"];
    if !tense
        .as_str()
        .is_some_and(|t| VALID_TENSES.contains(&t))
    {
        let shown = tense.as_str().map_or_else(|| tense.to_string(), String::from);
        return Err(LlmError::InvalidTense(shown));
    }

    serde_json::from_value(value).map_err(|e| LlmError::Parse {
        message: e.to_string(),
        raw: content.to_string(),
    })
}

/// Drop an optional Markdown code fence around the payload.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Pull `error.message` out of an API error body, falling back to raw text.
fn extract_api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}
