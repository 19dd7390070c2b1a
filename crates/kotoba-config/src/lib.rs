use serde::{Deserialize, Serialize};

use self::image::ImageConfig;
use self::llm::LlmConfig;
use self::speech::SpeechConfig;
use self::storage::StorageConfig;

pub mod image;
pub mod llm;
pub mod speech;
pub mod storage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub image: ImageConfig,
    pub speech: SpeechConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            llm: LlmConfig::new(),
            image: ImageConfig::new(),
            speech: SpeechConfig::new(),
            storage: StorageConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-request credential override, merged over the configured key.
///
/// The HTTP/CLI caller may supply a key for one invocation without
/// touching process-wide configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: Option<String>,
}

impl Credentials {
    /// Resolve the effective API key: override first, configured key second.
    pub fn resolve<'a>(&'a self, configured: Option<&'a str>) -> Option<&'a str> {
        self.api_key.as_deref().or(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_key_wins() {
        let creds = Credentials {
            api_key: Some("override".to_string()),
        };
        assert_eq!(creds.resolve(Some("configured")), Some("override"));
    }

    #[test]
    fn configured_key_is_fallback() {
        let creds = Credentials::default();
        assert_eq!(creds.resolve(Some("configured")), Some("configured"));
        assert_eq!(creds.resolve(None), None);
    }
}
