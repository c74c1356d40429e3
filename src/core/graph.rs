// --- File: src/core/graph.rs
use crate::core::normalizer::Roster;
use crate::core::tally::Tally;
use crate::core::types::{CharacterName, CoOccurrenceKey, Tallies};
use crate::report::sort_descending_by_count;
use std::collections::HashSet;

/// A symmetric, queryable view over co-occurrence counts.
#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    pairs: Tally<CoOccurrenceKey>,
    roster: Roster,
}

impl RelationshipGraph {
    pub fn from_tallies(tallies: &Tallies) -> Self {
        let roster = tallies.scene_counts.keys().map(String::as_str).collect();
        Self { pairs: tallies.co_occurrence.clone(), roster }
    }

    fn display<'a>(&'a self, name: &'a str) -> &'a str {
        self.roster.resolve(name).unwrap_or(name)
    }

    /// Scenes shared by `a` and `b`. Unknown names or pairs count zero.
    pub fn lookup(&self, a: &str, b: &str) -> u64 {
        let key = CoOccurrenceKey::new(self.display(a), self.display(b));
        self.pairs.get(&key)
    }

    /// The `n` most frequent ordered pairs, ties in first-seen order.
    pub fn top_pairs(&self, n: usize) -> Vec<(CoOccurrenceKey, u64)> {
        let mut sorted = sort_descending_by_count(&self.pairs);
        sorted.truncate(n);
        sorted
    }

    /// Everyone who shared a scene with `name`, most frequent first.
    pub fn partners(&self, name: &str) -> Vec<(CharacterName, u64)> {
        let name = self.display(name);
        let partners: Tally<CharacterName> = Tally::from_entries(
            self.pairs
                .iter()
                .filter(|(key, _)| key.a == name)
                .map(|(key, count)| (key.b.clone(), count)),
        );
        sort_descending_by_count(&partners)
    }

    /// Each pair once, in the orientation it was first recorded.
    pub fn unordered_pairs(&self) -> Vec<(CoOccurrenceKey, u64)> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for (key, count) in self.pairs.iter() {
            if seen.contains(&key.reversed()) {
                continue;
            }
            seen.insert(key.clone());
            result.push((key.clone(), count));
        }
        result
    }

    pub fn pairs(&self) -> &Tally<CoOccurrenceKey> {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(entries: &[(&str, &str, u64)]) -> RelationshipGraph {
        let mut tallies = Tallies::default();
        for &(a, b, count) in entries {
            tallies.scene_counts.add(a.to_string(), 1);
            tallies.scene_counts.add(b.to_string(), 1);
            tallies.co_occurrence.add(CoOccurrenceKey::new(a, b), count);
            tallies.co_occurrence.add(CoOccurrenceKey::new(b, a), count);
        }
        RelationshipGraph::from_tallies(&tallies)
    }

    #[test]
    fn lookup_is_case_insensitive_and_total() {
        let graph = graph(&[("Wade", "Vanessa", 3)]);
        assert_eq!(graph.lookup("wade", "VANESSA"), 3);
        assert_eq!(graph.lookup("Vanessa", "Wade"), 3);
        assert_eq!(graph.lookup("Wade", "Cable"), 0);
        assert_eq!(graph.lookup("Nobody", "Else"), 0);
    }

    #[test]
    fn top_pairs_break_ties_by_insertion() {
        let graph = graph(&[("Wade", "Vanessa", 2), ("Weasel", "Dopinder", 2), ("Al", "Wade", 5)]);
        let top = graph.top_pairs(4);
        assert_eq!(top[0], (CoOccurrenceKey::new("Al", "Wade"), 5));
        assert_eq!(top[1], (CoOccurrenceKey::new("Wade", "Al"), 5));
        assert_eq!(top[2], (CoOccurrenceKey::new("Wade", "Vanessa"), 2));
        assert_eq!(top[3], (CoOccurrenceKey::new("Vanessa", "Wade"), 2));
        assert_eq!(graph.top_pairs(1), vec![(CoOccurrenceKey::new("Al", "Wade"), 5)]);
    }

    #[test]
    fn partners_and_unordered_pairs() {
        let graph = graph(&[("Wade", "Vanessa", 1), ("Wade", "Weasel", 4)]);
        assert_eq!(
            graph.partners("wade"),
            vec![("Weasel".to_string(), 4), ("Vanessa".to_string(), 1)]
        );
        assert_eq!(
            graph.unordered_pairs(),
            vec![
                (CoOccurrenceKey::new("Wade", "Vanessa"), 1),
                (CoOccurrenceKey::new("Wade", "Weasel"), 4),
            ]
        );
    }
}
