// File: src/matching/counter.rs
use regex::{Regex, RegexBuilder};

/// A compiled whole-word, case-insensitive matcher for one literal name.
///
/// Names are free-form user data, so the needle is always escaped before it
/// reaches the regex engine.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    pattern: Regex,
}

impl NameMatcher {
    /// Returns `None` for a blank needle, which never matches anything.
    pub fn new(needle: &str) -> Option<Self> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }
        let source = format!(r"\b{}\b", regex::escape(needle));
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(pattern) => Some(Self { pattern }),
            Err(e) => {
                log::warn!("Cannot build matcher for '{}': {}", needle, e);
                None
            }
        }
    }

    /// Non-overlapping matches, scanned left to right.
    pub fn count(&self, haystack: &str) -> u64 {
        self.pattern.find_iter(haystack).count() as u64
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.pattern.is_match(haystack)
    }
}

/// Counts whole-word, case-insensitive occurrences of `needle` in `haystack`.
/// Absent or empty input counts as zero.
pub fn count_occurrences(haystack: Option<&str>, needle: &str) -> u64 {
    match (haystack, NameMatcher::new(needle)) {
        (Some(text), Some(matcher)) if !text.is_empty() => matcher.count(text),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_words() {
        assert_eq!(count_occurrences(Some("Wade hit Wade."), "Wade"), 2);
        assert_eq!(count_occurrences(Some("Wadesworth"), "Wade"), 0);
        assert_eq!(count_occurrences(Some("wade, WADE and WaDe"), "Wade"), 3);
    }

    #[test]
    fn multi_word_names_match_the_phrase() {
        let text = "Blind Al said Blind  Al and blind al";
        assert_eq!(count_occurrences(Some(text), "Blind Al"), 2);
        assert_eq!(count_occurrences(Some("Blind Allison"), "Blind Al"), 0);
    }

    #[test]
    fn metacharacters_are_literal() {
        assert_eq!(count_occurrences(Some("X.Y met XaY"), "X.Y"), 1);
        assert_eq!(count_occurrences(Some("call C3(PO) now"), "C3(PO"), 1);
        assert_eq!(count_occurrences(Some("aaa"), "a+"), 0);
    }

    #[test]
    fn absent_or_blank_inputs_are_zero() {
        assert_eq!(count_occurrences(None, "Wade"), 0);
        assert_eq!(count_occurrences(Some(""), "Wade"), 0);
        assert_eq!(count_occurrences(Some("Wade"), "  "), 0);
    }

    #[test]
    fn unicode_names() {
        assert_eq!(count_occurrences(Some("ÉLODIE et élodie"), "Élodie"), 2);
    }
}
