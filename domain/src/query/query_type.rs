//! Query type classification tag.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse intent of a user query, produced by the external classifier.
///
/// Drives the category strategy's table and the response template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Troubleshooting,
    Comparison,
    #[default]
    #[serde(alias = "general_inquiry")]
    General,
    Configuration,
    Performance,
    Pricing,
    Security,
    Migration,
}

impl QueryType {
    pub const ALL: [QueryType; 8] = [
        QueryType::Troubleshooting,
        QueryType::Comparison,
        QueryType::General,
        QueryType::Configuration,
        QueryType::Performance,
        QueryType::Pricing,
        QueryType::Security,
        QueryType::Migration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Troubleshooting => "troubleshooting",
            QueryType::Comparison => "comparison",
            QueryType::General => "general",
            QueryType::Configuration => "configuration",
            QueryType::Performance => "performance",
            QueryType::Pricing => "pricing",
            QueryType::Security => "security",
            QueryType::Migration => "migration",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "troubleshooting" => Ok(QueryType::Troubleshooting),
            "comparison" => Ok(QueryType::Comparison),
            "general" | "general_inquiry" => Ok(QueryType::General),
            "configuration" => Ok(QueryType::Configuration),
            "performance" => Ok(QueryType::Performance),
            "pricing" => Ok(QueryType::Pricing),
            "security" => Ok(QueryType::Security),
            "migration" => Ok(QueryType::Migration),
            _ => Err(DomainError::InvalidQueryType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for qt in QueryType::ALL {
            assert_eq!(qt.as_str().parse::<QueryType>().unwrap(), qt);
        }
    }

    #[test]
    fn test_general_inquiry_alias() {
        assert_eq!(
            "general_inquiry".parse::<QueryType>().unwrap(),
            QueryType::General
        );
        let parsed: QueryType = serde_json::from_str(r#""general_inquiry""#).unwrap();
        assert_eq!(parsed, QueryType::General);
    }

    #[test]
    fn test_invalid() {
        assert!("weather".parse::<QueryType>().is_err());
    }
}
