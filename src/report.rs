// File: src/report.rs
use crate::config::DEFAULT_TOP_N;
use crate::core::engine::ScriptAnalysis;
use crate::core::normalizer::fold_key;
use crate::core::tally::Tally;
use crate::core::types::{CharacterName, CoOccurrenceKey};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Entries sorted by count, descending. Ties keep tally order.
pub fn sort_descending_by_count<K: Eq + Hash + Clone>(tally: &Tally<K>) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> =
        tally.iter().map(|(key, count)| (key.clone(), count)).collect();
    entries.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
    entries
}

/// A copy of `tally` restricted to `allowed` keys. Counts and order are unchanged.
pub fn filter_to_subset<K: Eq + Hash + Clone>(tally: &Tally<K>, allowed: &HashSet<K>) -> Tally<K> {
    Tally::from_entries(
        tally
            .iter()
            .filter(|(key, _)| allowed.contains(*key))
            .map(|(key, count)| (key.clone(), count)),
    )
}

/// The closed set of views over one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    SceneCounts,
    DialogueCounts,
    CoOccurrence,
    TopPairs { n: usize },
}

impl ReportKind {
    /// Accepts `scenes`, `dialogue`, `pairs`, `top` and `top:N` (plus the snake_case names).
    /// A bare `top` takes `top_n` rows.
    pub fn parse_with_top_n(s: &str, top_n: usize) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let (name, arg) = match lowered.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (lowered.as_str(), None),
        };
        match (name, arg) {
            ("scenes" | "scene_counts", None) => Ok(Self::SceneCounts),
            ("dialogue" | "dialogue_counts", None) => Ok(Self::DialogueCounts),
            ("pairs" | "co_occurrence", None) => Ok(Self::CoOccurrence),
            ("top" | "top_pairs", None) => Ok(Self::TopPairs { n: top_n }),
            ("top" | "top_pairs", Some(n)) => n
                .parse()
                .map(|n| Self::TopPairs { n })
                .map_err(|_| AnalysisError::UnknownReport(s.to_string())),
            _ => Err(AnalysisError::UnknownReport(s.to_string())),
        }
    }
}

impl FromStr for ReportKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_top_n(s, DEFAULT_TOP_N)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneCounts => write!(f, "Scene Counts by Character"),
            Self::DialogueCounts => write!(f, "Dialogue Counts by Character"),
            Self::CoOccurrence => write!(f, "Character Interactions"),
            Self::TopPairs { n } => write!(f, "Top {} Character Pairs", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCount {
    pub name: CharacterName,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub a: CharacterName,
    pub b: CharacterName,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRows {
    Characters(Vec<CharacterCount>),
    Pairs(Vec<PairCount>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Characters(rows) => rows.len(),
            Self::Pairs(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub rows: ReportRows,
}

fn character_rows(entries: Vec<(CharacterName, u64)>) -> ReportRows {
    ReportRows::Characters(
        entries
            .into_iter()
            .map(|(name, count)| CharacterCount { name, count })
            .collect(),
    )
}

fn pair_rows(entries: Vec<(CoOccurrenceKey, u64)>) -> ReportRows {
    ReportRows::Pairs(
        entries
            .into_iter()
            .map(|(key, count)| PairCount { a: key.a, b: key.b, count })
            .collect(),
    )
}

/// Builds one report. `subset` limits characters (for pairs, both ends);
/// its names are matched case-insensitively.
pub fn assemble(analysis: &ScriptAnalysis, kind: ReportKind, subset: Option<&[String]>) -> Report {
    let tallies = &analysis.tallies;
    let allowed_chars: Option<HashSet<CharacterName>> = subset.map(|names| {
        let wanted: HashSet<String> = names.iter().map(|name| fold_key(name)).collect();
        tallies
            .scene_counts
            .keys()
            .filter(|name| wanted.contains(&fold_key(name)))
            .cloned()
            .collect()
    });

    let characters = |tally: &Tally<CharacterName>| match &allowed_chars {
        Some(allowed) => sort_descending_by_count(&filter_to_subset(tally, allowed)),
        None => sort_descending_by_count(tally),
    };
    let pairs = || match &allowed_chars {
        Some(allowed) => {
            let allowed_pairs: HashSet<CoOccurrenceKey> = tallies
                .co_occurrence
                .keys()
                .filter(|key| allowed.contains(&key.a) && allowed.contains(&key.b))
                .cloned()
                .collect();
            sort_descending_by_count(&filter_to_subset(&tallies.co_occurrence, &allowed_pairs))
        }
        None => sort_descending_by_count(&tallies.co_occurrence),
    };

    let rows = match kind {
        ReportKind::SceneCounts => character_rows(characters(&tallies.scene_counts)),
        ReportKind::DialogueCounts => character_rows(characters(&tallies.dialogue_counts)),
        ReportKind::CoOccurrence => pair_rows(pairs()),
        ReportKind::TopPairs { n } => {
            let mut top = pairs();
            top.truncate(n);
            pair_rows(top)
        }
    };
    log::debug!("Assembled '{}' with {} rows", kind, rows.len());
    Report { kind, rows }
}
