use std::fs;
use std::path::Path;

pub mod error;
pub mod image;
pub mod speech;

pub use error::MediaError;
pub use image::ImageClient;
pub use speech::SpeechClient;

/// Write generated media bytes, creating parent directories as needed.
///
/// Called as the last step of a generation so a failed upstream call never
/// leaves a file behind.
pub(crate) fn write_media(path: &Path, bytes: &[u8]) -> Result<(), MediaError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Pull `error.message` out of an upstream error body, falling back to raw text.
pub(crate) fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}
