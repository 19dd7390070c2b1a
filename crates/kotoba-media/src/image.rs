use std::path::{Path, PathBuf};

use kotoba_config::image::ImageConfig;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::{api_message, write_media};

/// Image generation client.
///
/// One generation call per prompt: request an image, take the returned
/// download URL, fetch the bytes, write them under the media directory.
#[derive(Clone)]
pub struct ImageClient {
    base_url: String,
    api_key: Option<String>,
    config: ImageConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

impl ImageClient {
    pub fn new(base_url: String, api_key: Option<String>, config: ImageConfig) -> Self {
        Self {
            base_url,
            api_key,
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Generate one image for `prompt` and save it at `output_path`.
    pub async fn generate(
        &self,
        prompt: &str,
        output_path: &Path,
        api_key: Option<&str>,
    ) -> Result<PathBuf, MediaError> {
        let key = api_key
            .or(self.api_key.as_deref())
            .ok_or(MediaError::MissingApiKey("image"))?;

        tracing::debug!(model = %self.config.model, "requesting image generation");

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(key)
            .json(&GenerationRequest {
                model: &self.config.model,
                prompt,
                n: 1,
                size: &self.config.size,
                quality: &self.config.quality,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                service: "image",
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        let generated: GenerationResponse = response.json().await?;
        let url = generated
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(MediaError::EmptyPayload("image"))?;

        let download = self.client.get(&url).send().await?;
        let status = download.status();
        if !status.is_success() {
            return Err(MediaError::Api {
                service: "image download",
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let bytes = download.bytes().await?;
        write_media(output_path, &bytes)?;

        tracing::debug!(path = %output_path.display(), "image saved");
        Ok(output_path.to_path_buf())
    }
}
