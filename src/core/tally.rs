// File: src/core/tally.rs
use crate::config::SceneCounting;
use crate::core::normalizer::{fold_key, normalize_cell, Roster};
use crate::core::types::{CharacterName, CoOccurrenceKey, ScriptRow, Tallies};
use crate::matching::counter::NameMatcher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// An insertion-ordered counter.
///
/// Iteration follows the order in which keys were first counted, which is
/// what keeps sorted reports deterministic on ties.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (K, u64)>) -> Self {
        let mut tally = Self::new();
        for (key, count) in entries {
            tally.add(key, count);
        }
        tally
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Adds `count` to `key`. A zero count still registers the key.
    pub fn add(&mut self, key: K, count: u64) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += count,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.index.get(key).map_or(0, |&pos| self.entries[pos].1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Folds `other` into `self`; keys new to `self` keep `other`'s order.
    pub fn merge(&mut self, other: &Tally<K>) {
        for (key, count) in &other.entries {
            self.add(key.clone(), *count);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(K, u64)> {
        self.entries
    }
}

impl<K: PartialEq> PartialEq for Tally<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Serialize> Serialize for Tally<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for Tally<K>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<(K, u64)>::deserialize(deserializer).map(Self::from_entries)
    }
}

/// Counts case-insensitive whole-word mentions of `name` in one dialogue cell.
pub fn record_dialogue_match(name: &str, dialogue: Option<&str>) -> u64 {
    crate::matching::counter::count_occurrences(dialogue, name)
}

/// Accumulates scene, co-occurrence and dialogue tallies over one table.
#[derive(Debug, Clone)]
pub struct TallyEngine {
    roster: Roster,
    scene_counting: SceneCounting,
    scene_counts: Tally<CharacterName>,
    co_occurrence: Tally<CoOccurrenceKey>,
    /// Dialogue of every scene that listed at least one character.
    dialogues: Vec<String>,
}

impl TallyEngine {
    pub fn new(roster: Roster, scene_counting: SceneCounting) -> Self {
        Self {
            roster,
            scene_counting,
            scene_counts: Tally::new(),
            co_occurrence: Tally::new(),
            dialogues: Vec::new(),
        }
    }

    /// Feeds one row. Rows without characters are a no-op.
    pub fn record_row(&mut self, row: &ScriptRow) {
        let Some(cell) = row.scene_characters.as_deref() else {
            return;
        };
        let raw_names = normalize_cell(cell);
        if raw_names.is_empty() {
            log::debug!("Skipping scene with empty character list");
            return;
        }
        let names: Vec<CharacterName> = raw_names
            .iter()
            .map(|raw| self.roster.canonicalize(raw))
            .collect();

        self.record_scene(&names);
        self.record_co_occurrence(&names);

        if let Some(dialogue) = row.scene_dialogue.as_deref() {
            if !dialogue.trim().is_empty() {
                self.dialogues.push(dialogue.to_string());
            }
        }
    }

    pub fn record_scene(&mut self, names: &[CharacterName]) {
        match self.scene_counting {
            SceneCounting::PerMention => {
                for name in names {
                    self.scene_counts.increment(name.clone());
                }
            }
            SceneCounting::PerScene => {
                let mut seen = HashSet::new();
                for name in names {
                    if seen.insert(fold_key(name)) {
                        self.scene_counts.increment(name.clone());
                    }
                }
            }
        }
    }

    /// Counts every ordered pair of positions whose names differ.
    /// O(k^2) in the number of names listed for the scene.
    pub fn record_co_occurrence(&mut self, names: &[CharacterName]) {
        let keys: Vec<String> = names.iter().map(|name| fold_key(name)).collect();
        for (i, a) in names.iter().enumerate() {
            for (j, b) in names.iter().enumerate() {
                if i != j && keys[i] != keys[j] {
                    self.co_occurrence.increment(CoOccurrenceKey::new(a.clone(), b.clone()));
                }
            }
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Computes dialogue counts for every rostered character and returns the tallies.
    pub fn finish(self) -> Tallies {
        let mut dialogue_counts = Tally::new();
        for name in self.roster.names() {
            let count = match NameMatcher::new(name) {
                Some(matcher) => self
                    .dialogues
                    .iter()
                    .map(|dialogue| matcher.count(dialogue))
                    .sum(),
                None => 0,
            };
            dialogue_counts.add(name.clone(), count);
        }

        Tallies {
            scene_counts: self.scene_counts,
            dialogue_counts,
            co_occurrence: self.co_occurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanonicalCasing;

    fn engine(counting: SceneCounting) -> TallyEngine {
        TallyEngine::new(Roster::new(CanonicalCasing::FirstSeen), counting)
    }

    #[test]
    fn tally_keeps_first_insertion_order() {
        let mut tally = Tally::new();
        tally.increment("b");
        tally.increment("a");
        tally.increment("b");
        assert_eq!(tally.iter().collect::<Vec<_>>(), vec![(&"b", 2), (&"a", 1)]);
        assert_eq!(tally.get(&"missing"), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn merge_adds_counts() {
        let mut left = Tally::from_entries([("x", 2), ("y", 1)]);
        let right = Tally::from_entries([("z", 4), ("x", 3)]);
        left.merge(&right);
        assert_eq!(left.into_entries(), vec![("x", 5), ("y", 1), ("z", 4)]);
    }

    #[test]
    fn pair_count_per_scene_is_k_times_k_minus_one() {
        let mut engine = engine(SceneCounting::PerMention);
        let names: Vec<String> = ["Wade", "Vanessa", "Weasel", "Dopinder"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        engine.record_co_occurrence(&names);
        assert_eq!(engine.co_occurrence.total(), 4 * 3);
        for (key, count) in engine.co_occurrence.iter() {
            assert_eq!(engine.co_occurrence.get(&key.reversed()), count);
        }
    }

    #[test]
    fn self_pairs_are_skipped_regardless_of_case() {
        let mut engine = engine(SceneCounting::PerMention);
        engine.record_row(&ScriptRow::new(Some("Wade, WADE"), None));
        assert!(engine.co_occurrence.is_empty());
        assert_eq!(engine.scene_counts.get(&"Wade".to_string()), 2);
    }

    #[test]
    fn per_scene_counting_dedupes() {
        let mut engine = engine(SceneCounting::PerScene);
        engine.record_row(&ScriptRow::new(Some("Wade, Wade, Vanessa"), None));
        let tallies = engine.finish();
        assert_eq!(tallies.scene_counts.get(&"Wade".to_string()), 1);
        assert_eq!(tallies.scene_counts.get(&"Vanessa".to_string()), 1);
    }

    #[test]
    fn null_characters_row_is_a_no_op() {
        let mut engine = engine(SceneCounting::PerMention);
        engine.record_row(&ScriptRow::new(None, Some("Wade Wade Wade")));
        assert_eq!(engine.finish(), Tallies::default());
    }

    #[test]
    fn dialogue_counts_include_silent_characters() {
        let mut engine = engine(SceneCounting::PerMention);
        engine.record_row(&ScriptRow::new(Some("Wade, Colossus"), Some("Wade, wade!")));
        let tallies = engine.finish();
        assert_eq!(tallies.dialogue_counts.get(&"Wade".to_string()), 2);
        assert_eq!(tallies.dialogue_counts.get(&"Colossus".to_string()), 0);
        assert_eq!(tallies.dialogue_counts.len(), 2);
    }

    #[test]
    fn record_dialogue_match_is_total() {
        assert_eq!(record_dialogue_match("Wade", None), 0);
        assert_eq!(record_dialogue_match("Wade", Some("wade? WADE.")), 2);
    }
}
