use std::path::{Path, PathBuf};

use kotoba_config::speech::SpeechConfig;
use serde::Serialize;

use crate::error::MediaError;
use crate::{api_message, write_media};

/// Speech synthesis client.
///
/// The synthesis endpoint returns the audio bytes inline; they are written
/// to the target path as the final step.
#[derive(Clone)]
pub struct SpeechClient {
    base_url: String,
    api_key: Option<String>,
    config: SpeechConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl SpeechClient {
    pub fn new(base_url: String, api_key: Option<String>, config: SpeechConfig) -> Self {
        Self {
            base_url,
            api_key,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Synthesize Japanese `text` and save the audio at `output_path`.
    pub async fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        api_key: Option<&str>,
    ) -> Result<PathBuf, MediaError> {
        let key = api_key
            .or(self.api_key.as_deref())
            .ok_or(MediaError::MissingApiKey("audio"))?;

        tracing::debug!(model = %self.config.model, voice = %self.config.voice, "requesting speech synthesis");

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(key)
            .json(&SpeechRequest {
                model: &self.config.model,
                input: text,
                voice: &self.config.voice,
                response_format: &self.config.format,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                service: "audio",
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyPayload("audio"));
        }

        write_media(output_path, &bytes)?;

        tracing::debug!(path = %output_path.display(), "audio saved");
        Ok(output_path.to_path_buf())
    }
}
