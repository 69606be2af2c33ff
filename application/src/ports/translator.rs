//! Translation port

use super::error::CollaboratorError;
use async_trait::async_trait;

/// Moves text between the caller's language and English.
///
/// Both directions must return the text unchanged when `lang == "en"`.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Detect the language of `text` (ISO 639-1 code)
    async fn detect_language(&self, text: &str) -> Result<String, CollaboratorError>;

    async fn to_english(&self, text: &str, lang: &str) -> Result<String, CollaboratorError>;

    async fn from_english(&self, text: &str, lang: &str) -> Result<String, CollaboratorError>;
}
