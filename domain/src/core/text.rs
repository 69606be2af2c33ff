//! Text helpers for lexical scoring and query refinement.

use std::collections::HashSet;

/// Lower-cased, whitespace-separated word set of `text`.
///
/// Punctuation is kept attached to words; "ec2," and "ec2" are different
/// words. Scoring relies on this being a plain, predictable split.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate to at most `max_bytes`, cutting at the last whole word.
///
/// Falls back to a character-boundary cut when the first word alone is
/// longer than the limit.
pub fn truncate_words(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }

    let mut out = String::new();
    for word in s.split_whitespace() {
        let needed = if out.is_empty() {
            word.len()
        } else {
            out.len() + 1 + word.len()
        };
        if needed > max_bytes {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    if out.is_empty() {
        truncate_str(s.trim_start(), max_bytes).to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_set_lowercases_and_dedupes() {
        let words = word_set("EC2 instance ec2  Slow");
        assert_eq!(words.len(), 3);
        assert!(words.contains("ec2"));
        assert!(words.contains("slow"));
    }

    #[test]
    fn word_set_empty() {
        assert!(word_set("   ").is_empty());
    }

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "あのね";
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 9), "あのね");
    }

    #[test]
    fn truncate_words_keeps_whole_words() {
        assert_eq!(truncate_words("ec2 instance slow", 12), "ec2 instance");
        assert_eq!(truncate_words("ec2 instance slow", 100), "ec2 instance slow");
    }

    #[test]
    fn truncate_words_single_long_word() {
        assert_eq!(truncate_words("supercalifragilistic", 5), "super");
    }
}
