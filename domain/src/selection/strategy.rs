//! Selection strategy value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named algorithm for ranking tools for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    Performance,
    Category,
    Relevance,
    #[default]
    Hybrid,
}

impl SelectionStrategy {
    pub const ALL: [SelectionStrategy; 4] = [
        SelectionStrategy::Performance,
        SelectionStrategy::Category,
        SelectionStrategy::Relevance,
        SelectionStrategy::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::Performance => "performance",
            SelectionStrategy::Category => "category",
            SelectionStrategy::Relevance => "relevance",
            SelectionStrategy::Hybrid => "hybrid",
        }
    }

    /// Parse a strategy name, falling back to [`SelectionStrategy::Hybrid`]
    /// for unknown names.
    ///
    /// Returns the parse error alongside the fallback so the caller can log it.
    pub fn parse_or_default(name: &str) -> (Self, Option<DomainError>) {
        match name.parse() {
            Ok(strategy) => (strategy, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "performance" => Ok(SelectionStrategy::Performance),
            "category" => Ok(SelectionStrategy::Category),
            "relevance" => Ok(SelectionStrategy::Relevance),
            "hybrid" => Ok(SelectionStrategy::Hybrid),
            _ => Err(DomainError::InvalidStrategy(s.to_string())),
        }
    }
}
