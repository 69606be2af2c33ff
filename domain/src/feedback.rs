//! User feedback value objects

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of feedback a user gave on a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Positive,
    Negative,
    TooDetailed,
    NotDetailedEnough,
    WrongLanguage,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Positive => "positive",
            FeedbackType::Negative => "negative",
            FeedbackType::TooDetailed => "too_detailed",
            FeedbackType::NotDetailedEnough => "not_detailed_enough",
            FeedbackType::WrongLanguage => "wrong_language",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedbackType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "positive" | "thumbs_up" => Ok(FeedbackType::Positive),
            "negative" | "thumbs_down" => Ok(FeedbackType::Negative),
            "too_detailed" => Ok(FeedbackType::TooDetailed),
            "not_detailed_enough" => Ok(FeedbackType::NotDetailedEnough),
            "wrong_language" => Ok(FeedbackType::WrongLanguage),
            _ => Err(DomainError::InvalidFeedbackType(s.to_string())),
        }
    }
}

/// One feedback event on a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub user_id: String,
    pub thread_id: String,
    pub message_id: String,
    pub feedback_type: FeedbackType,
    pub timestamp: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        user_id: impl Into<String>,
        thread_id: impl Into<String>,
        message_id: impl Into<String>,
        feedback_type: FeedbackType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: thread_id.into(),
            message_id: message_id.into(),
            feedback_type,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feedback_types() {
        assert_eq!(
            "too-detailed".parse::<FeedbackType>().unwrap(),
            FeedbackType::TooDetailed
        );
        assert_eq!(
            "Not_Detailed_Enough".parse::<FeedbackType>().unwrap(),
            FeedbackType::NotDetailedEnough
        );
        assert!(matches!(
            "meh".parse::<FeedbackType>(),
            Err(DomainError::InvalidFeedbackType(_))
        ));
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&FeedbackType::WrongLanguage).unwrap();
        assert_eq!(json, format!("\"{}\"", FeedbackType::WrongLanguage));
    }
}
