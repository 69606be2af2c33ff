//! Script-aware translator.
//!
//! Detects Sinhala by its Unicode block and translates cloud vocabulary
//! through a fixed glossary. English passes through untouched; any other
//! language passes through with a warning.

use async_trait::async_trait;
use rag_application::ports::error::CollaboratorError;
use rag_application::ports::translator::Translator;
use tracing::warn;

const SINHALA_BLOCK: std::ops::RangeInclusive<char> = '\u{0D80}'..='\u{0DFF}';

/// Sinhala cloud terms and their English equivalents.
const SI_EN_GLOSSARY: &[(&str, &str)] = &[
    ("ක්ලවුඩ්", "cloud"),
    ("සේවාව", "service"),
    ("සර්වර්", "server"),
    ("ගබඩාව", "storage"),
    ("දත්ත", "data"),
    ("ගිණුම", "account"),
    ("ආරක්ෂාව", "security"),
    ("ජාලය", "network"),
    ("වින්\u{200d}යාසය", "configuration"),
    ("ගැටලුව", "problem"),
    ("දෝෂය", "error"),
    ("උදව්", "help"),
    ("සහාය", "support"),
];

pub fn contains_sinhala(text: &str) -> bool {
    text.chars().any(|c| SINHALA_BLOCK.contains(&c))
}

/// Glossary translator for English and Sinhala.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self
    }

    fn sinhala_to_english(text: &str) -> String {
        let mut out = text.to_string();
        for (si, en) in SI_EN_GLOSSARY {
            out = out.replace(si, en);
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Replace whole English glossary words, keeping surrounding punctuation
    /// and whitespace.
    fn english_to_sinhala(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();

        for c in text.chars() {
            if c.is_alphanumeric() {
                word.push(c);
            } else {
                out.push_str(&Self::glossary_word(&word));
                word.clear();
                out.push(c);
            }
        }
        out.push_str(&Self::glossary_word(&word));
        out
    }

    fn glossary_word(word: &str) -> String {
        SI_EN_GLOSSARY
            .iter()
            .find(|(_, en)| en.eq_ignore_ascii_case(word))
            .map(|(si, _)| si.to_string())
            .unwrap_or_else(|| word.to_string())
    }
}

#[async_trait]
impl Translator for GlossaryTranslator {
    async fn detect_language(&self, text: &str) -> Result<String, CollaboratorError> {
        let language = if contains_sinhala(text) { "si" } else { "en" };
        Ok(language.to_string())
    }

    async fn to_english(&self, text: &str, source: &str) -> Result<String, CollaboratorError> {
        match source {
            "en" => Ok(text.to_string()),
            "si" => Ok(Self::sinhala_to_english(text)),
            other => {
                warn!("No translation available from '{}', using text as-is", other);
                Ok(text.to_string())
            }
        }
    }

    async fn from_english(&self, text: &str, target: &str) -> Result<String, CollaboratorError> {
        match target {
            "en" => Ok(text.to_string()),
            "si" => Ok(Self::english_to_sinhala(text)),
            other => {
                warn!("No translation available into '{}', using English", other);
                Ok(text.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detects_sinhala_script() {
        let translator = GlossaryTranslator::new();
        assert_eq!(translator.detect_language("සර්වර් ගැටලුව").await.unwrap(), "si");
        assert_eq!(translator.detect_language("EC2 is slow").await.unwrap(), "en");
        assert_eq!(translator.detect_language("").await.unwrap(), "en");
    }

    #[tokio::test]
    async fn test_sinhala_to_english_uses_glossary() {
        let translator = GlossaryTranslator::new();
        let english = translator
            .to_english("EC2 සර්වර්  දෝෂය", "si")
            .await
            .unwrap();
        assert_eq!(english, "EC2 server error");
    }

    #[tokio::test]
    async fn test_english_to_sinhala_whole_words_only() {
        let translator = GlossaryTranslator::new();
        let sinhala = translator
            .from_english("Check the server, not the servers.", "si")
            .await
            .unwrap();
        assert_eq!(sinhala, "Check the සර්වර්, not the servers.");
    }

    #[tokio::test]
    async fn test_english_and_unknown_are_identity() {
        let translator = GlossaryTranslator::new();
        assert_eq!(translator.to_english("hello", "en").await.unwrap(), "hello");
        assert_eq!(translator.from_english("hello", "fr").await.unwrap(), "hello");
    }
}
