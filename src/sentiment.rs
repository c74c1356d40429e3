// File: src/sentiment.rs
//! Positive/negative word clouds over dialogue.
//!
//! Polarity comes from an external scorer; this module only tokenizes,
//! splits by sign and turns the words into weights a renderer can draw.

use crate::core::tally::Tally;
use crate::error::{AnalysisError, Result};
use crate::report::sort_descending_by_count;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

const MAX_CLOUD_WORDS: usize = 200;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "doing", "for", "from", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "my",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "our", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
];

// A handful of VADER valences, enough for a usable default without a lexicon file.
const BUILTIN_LEXICON: &[(&str, f64)] = &[
    ("love", 3.2), ("loves", 2.7), ("good", 1.9), ("great", 3.1), ("happy", 2.7),
    ("best", 3.2), ("fun", 2.3), ("win", 2.8), ("beautiful", 2.9), ("nice", 1.8),
    ("thanks", 1.9), ("friend", 2.2), ("hope", 1.9), ("laugh", 2.6), ("awesome", 3.1),
    ("safe", 1.9), ("free", 2.3), ("kiss", 1.8), ("smile", 1.5), ("yes", 1.7),
    ("hate", -2.7), ("bad", -2.5), ("kill", -3.7), ("dead", -3.3), ("die", -2.9),
    ("death", -2.9), ("sad", -2.1), ("pain", -2.3), ("hurt", -2.4), ("cancer", -3.4),
    ("angry", -2.3), ("fear", -2.2), ("cry", -2.1), ("ugly", -2.3), ("stupid", -2.4),
    ("war", -2.9), ("gun", -1.4), ("blood", -1.4), ("wrong", -2.1), ("sorry", -0.3),
];

/// External polarity model, queried one token at a time.
pub trait PolarityScorer {
    /// Positive above zero, negative below, zero for neutral or unknown tokens.
    fn polarity(&self, token: &str) -> f64;
}

/// Token valences from a VADER-format lexicon (`token<TAB>mean<TAB>...`).
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl LexiconScorer {
    pub fn builtin() -> Self {
        Self {
            valences: BUILTIN_LEXICON
                .iter()
                .map(|&(token, valence)| (token.to_string(), valence))
                .collect(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut valences = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(token), Some(mean)) = (fields.next(), fields.next()) else {
                return Err(AnalysisError::Lexicon(format!(
                    "line {}: expected token and valence",
                    line_no + 1
                )));
            };
            let valence: f64 = mean.trim().parse().map_err(|_| {
                AnalysisError::Lexicon(format!("line {}: bad valence '{}'", line_no + 1, mean))
            })?;
            valences.insert(token.trim().to_lowercase(), valence);
        }
        log::info!("Loaded {} lexicon entries from {}", valences.len(), path.display());
        Ok(Self { valences })
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, token: &str) -> f64 {
        self.valences.get(&token.to_lowercase()).copied().unwrap_or(0.0)
    }
}

/// Word tokens in text order; punctuation is dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    match PATTERN.get_or_init(|| Regex::new(r"\w+(?:'\w+)*").ok()) {
        Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
        None => Vec::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSplit {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

pub fn split_by_sentiment(text: &str, scorer: &dyn PolarityScorer) -> SentimentSplit {
    let mut split = SentimentSplit::default();
    for token in tokenize(text) {
        let score = scorer.polarity(token);
        if score > 0.0 {
            split.positive.push(token.to_string());
        } else if score < 0.0 {
            split.negative.push(token.to_string());
        }
    }
    log::debug!(
        "Sentiment split: {} positive, {} negative tokens",
        split.positive.len(),
        split.negative.len()
    );
    split
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWeight {
    pub word: String,
    pub count: u64,
    /// Count relative to the most frequent word, in (0, 1].
    pub weight: f64,
}

fn is_stopword(word: &str) -> bool {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect()).contains(word)
}

/// Frequencies for a word cloud renderer, most frequent first.
pub fn word_cloud<S: AsRef<str>>(words: &[S]) -> Vec<WordWeight> {
    let mut counts: Tally<String> = Tally::new();
    let mut display: HashMap<String, String> = HashMap::new();

    for word in words {
        let word = word.as_ref().trim();
        let word = match word.len().checked_sub(2) {
            Some(cut) if word.is_char_boundary(cut) && word[cut..].eq_ignore_ascii_case("'s") => {
                &word[..cut]
            }
            _ => word,
        };
        let key = word.to_lowercase();
        if key.is_empty() || is_stopword(&key) || key.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        display.entry(key.clone()).or_insert_with(|| word.to_string());
        counts.increment(key);
    }

    let mut sorted = sort_descending_by_count(&counts);
    sorted.truncate(MAX_CLOUD_WORDS);
    let max = sorted.first().map_or(1, |&(_, count)| count.max(1)) as f64;
    sorted
        .into_iter()
        .map(|(key, count)| WordWeight {
            word: display.remove(&key).unwrap_or(key),
            count,
            weight: count as f64 / max,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentClouds {
    pub positive: Vec<WordWeight>,
    pub negative: Vec<WordWeight>,
}

pub fn sentiment_clouds(text: &str, scorer: &dyn PolarityScorer) -> SentimentClouds {
    let split = split_by_sentiment(text, scorer);
    SentimentClouds {
        positive: word_cloud(&split.positive),
        negative: word_cloud(&split.negative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct SignOfLength;

    impl PolarityScorer for SignOfLength {
        fn polarity(&self, token: &str) -> f64 {
            match token.len() {
                0..=3 => 0.0,
                4 => 1.0,
                _ => -1.0,
            }
        }
    }

    #[test]
    fn tokenizes_words_and_contractions() {
        assert_eq!(
            tokenize("Don't stop, Wade's 2 cats!"),
            vec!["Don't", "stop", "Wade's", "2", "cats"]
        );
    }

    #[test]
    fn splits_by_sign_in_order() {
        let scorer = LexiconScorer::builtin();
        let split = split_by_sentiment("I love this hateful town, love!", &scorer);
        assert_eq!(split.positive, vec!["love", "love"]);
        assert!(split.negative.is_empty());

        let split = split_by_sentiment("good grief, chimichanga", &SignOfLength);
        assert_eq!(split.positive, vec!["good"]);
        assert_eq!(split.negative, vec!["grief", "chimichanga"]);
    }

    #[test]
    fn cloud_weights_and_filters() {
        let words = ["Love", "love", "the", "Wade's", "wade", "1984", "LOVE"];
        let cloud = word_cloud(&words);
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0].word, "Love");
        assert_eq!(cloud[0].count, 3);
        assert_eq!(cloud[0].weight, 1.0);
        assert_eq!(cloud[1].word, "Wade");
        assert_eq!(cloud[1].count, 2);
        assert!((cloud[1].weight - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_cloud() {
        let words: [&str; 0] = [];
        assert!(word_cloud(&words).is_empty());
    }

    #[test]
    fn loads_vader_lexicon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chimichanga\t2.5\t0.5\t[2, 3]").unwrap();
        writeln!(file, "Unicorn\t-1.0\t0.3\t[-1]").unwrap();
        let scorer = LexiconScorer::from_path(file.path()).unwrap();
        assert_eq!(scorer.len(), 2);
        assert_eq!(scorer.polarity("CHIMICHANGA"), 2.5);
        assert_eq!(scorer.polarity("unicorn"), -1.0);
        assert_eq!(scorer.polarity("taco"), 0.0);
    }

    #[test]
    fn rejects_bad_lexicon_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chimichanga\tlots").unwrap();
        assert!(matches!(LexiconScorer::from_path(file.path()), Err(AnalysisError::Lexicon(_))));
    }
}
