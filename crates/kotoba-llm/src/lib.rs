pub mod client;
pub mod error;

pub use client::LlmClient;
pub use error::LlmError;

/// The system prompt shipped with the crate.
///
/// Callers may override it per request; the HTTP collaborator exposes it
/// verbatim so a UI can show what will be sent.
pub fn default_system_prompt() -> &'static str {
    include_str!("prompts/jp_anki_system.txt")
}
