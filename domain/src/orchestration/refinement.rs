//! Bounded query refinement between passes.

use crate::core::text::{truncate_words, word_set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caps on how much a query may grow across refinements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementLimits {
    /// Missing terms appended per pass
    pub max_terms: usize,
    /// Maximum refined query length in bytes
    pub max_query_chars: usize,
}

impl Default for RefinementLimits {
    fn default() -> Self {
        Self {
            max_terms: 5,
            max_query_chars: 512,
        }
    }
}

/// Append missing terms to `query`.
///
/// Terms are lower-cased and trimmed; terms already present in the query
/// (as whole words) or repeated in `missing` are skipped. At most
/// `limits.max_terms` are appended and the result is cut at a word
/// boundary to `limits.max_query_chars`.
pub fn refine_query(query: &str, missing: &[String], limits: RefinementLimits) -> String {
    let present = word_set(query);
    let mut added: HashSet<String> = HashSet::new();
    let mut refined = query.trim().to_string();

    for term in missing {
        if added.len() >= limits.max_terms {
            break;
        }
        let term = term.trim().to_lowercase();
        if term.is_empty() || present.contains(&term) || added.contains(&term) {
            continue;
        }
        if !refined.is_empty() {
            refined.push(' ');
        }
        refined.push_str(&term);
        added.insert(term);
    }

    truncate_words(&refined, limits.max_query_chars)
}
