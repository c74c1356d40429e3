// File: src/core/normalizer.rs
use crate::config::CanonicalCasing;
use crate::core::types::CharacterName;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const NAME_SEPARATOR: char = ',';

/// Splits a raw scene-characters cell into name tokens.
///
/// Tokens are trimmed, lose one leading `[` and one trailing `]`, and empty
/// tokens are dropped. Order and duplicates are kept as listed.
pub fn normalize_cell(cell: &str) -> Vec<CharacterName> {
    cell.split(NAME_SEPARATOR)
        .filter_map(|token| {
            let mut name = token.trim();
            if let Some(rest) = name.strip_prefix('[') {
                name = rest;
            }
            if let Some(rest) = name.strip_suffix(']') {
                name = rest;
            }
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// The identity key of a name: two names are the same character iff their keys match.
pub fn fold_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Capitalized-word runs in a cell, the way the roster page lists names.
pub fn capitalized_names(cell: &str) -> Vec<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z\s]+\b").ok());
    match pattern {
        Some(re) => re.find_iter(cell).map(|m| m.as_str().to_string()).collect(),
        None => Vec::new(),
    }
}

fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if c.is_whitespace() || c == '-' {
            result.push(c);
            at_word_start = true;
        } else if at_word_start {
            result.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

/// Maps case-folded keys to one canonical display form per character.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    casing: CanonicalCasing,
    index: HashMap<String, usize>,
    names: Vec<CharacterName>,
}

impl Roster {
    pub fn new(casing: CanonicalCasing) -> Self {
        Self { casing, index: HashMap::new(), names: Vec::new() }
    }

    /// Returns the display form for `raw`, registering it on first sight.
    pub fn canonicalize(&mut self, raw: &str) -> CharacterName {
        let key = fold_key(raw);
        if let Some(&id) = self.index.get(&key) {
            return self.names[id].clone();
        }
        let display = match self.casing {
            CanonicalCasing::FirstSeen => raw.trim().to_string(),
            CanonicalCasing::TitleCase => title_case(raw.trim()),
        };
        self.index.insert(key, self.names.len());
        self.names.push(display.clone());
        display
    }

    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.index.get(&fold_key(raw)).map(|&id| self.names[id].as_str())
    }

    /// Canonical names in first-seen order.
    pub fn names(&self) -> &[CharacterName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Roster {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut roster = Roster::new(CanonicalCasing::FirstSeen);
        for name in iter {
            roster.canonicalize(name);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        assert_eq!(
            normalize_cell(" Wade ,Vanessa,  Colossus "),
            vec!["Wade", "Vanessa", "Colossus"]
        );
    }

    #[test]
    fn strips_brackets_once() {
        assert_eq!(normalize_cell("[Wade, Vanessa]"), vec!["Wade", "Vanessa"]);
        assert_eq!(normalize_cell("[[Wade]]"), vec!["[Wade]"]);
        assert_eq!(normalize_cell("[ Dopinder ]"), vec!["Dopinder"]);
    }

    #[test]
    fn drops_empty_tokens_and_keeps_duplicates() {
        assert!(normalize_cell("   ").is_empty());
        assert!(normalize_cell(", [], ,").is_empty());
        assert_eq!(normalize_cell("Wade,,Wade"), vec!["Wade", "Wade"]);
    }

    #[test]
    fn first_seen_casing_wins() {
        let mut roster = Roster::new(CanonicalCasing::FirstSeen);
        assert_eq!(roster.canonicalize("Wade"), "Wade");
        assert_eq!(roster.canonicalize("WADE"), "Wade");
        assert_eq!(roster.resolve("wade"), Some("Wade"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn title_case_rule() {
        let mut roster = Roster::new(CanonicalCasing::TitleCase);
        assert_eq!(roster.canonicalize("NEGASONIC teenage WARHEAD"), "Negasonic Teenage Warhead");
        assert_eq!(roster.canonicalize("negasonic Teenage warhead"), "Negasonic Teenage Warhead");
        assert_eq!(roster.canonicalize("jean-luc"), "Jean-Luc");
    }

    #[test]
    fn capitalized_runs() {
        assert_eq!(capitalized_names("Wade, Vanessa"), vec!["Wade", "Vanessa"]);
        assert_eq!(capitalized_names("['Weasel', 'Blind Al']"), vec!["Weasel", "Blind Al"]);
        assert!(capitalized_names("nobody here").is_empty());
    }
}
