use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("missing OpenAI API key for {0} generation")]
    MissingApiKey(&'static str),

    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("empty payload from {0} API")]
    EmptyPayload(&'static str),

    #[error("failed to write media file: {0}")]
    Io(#[from] std::io::Error),
}
