use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub model: String,
    /// Voice id on the synthesis endpoint
    pub voice: String,
    /// Output container, written as-is to the media file extension's format
    pub format: String,
}

impl SpeechConfig {
    pub fn new() -> Self {
        let model =
            env::var("KOTOBA_TTS_MODEL").unwrap_or_else(|_| "gpt-4o-mini-tts".to_string());
        let voice = env::var("KOTOBA_TTS_VOICE").unwrap_or_else(|_| "alloy".to_string());

        SpeechConfig {
            model,
            voice,
            format: "mp3".to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self::new()
    }
}
