use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub model: String,
    pub size: String,
    pub quality: String,
}

impl ImageConfig {
    pub fn new() -> Self {
        let model = env::var("KOTOBA_IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());

        ImageConfig {
            model,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self::new()
    }
}
