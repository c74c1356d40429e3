// src/core/types.rs
use crate::core::tally::Tally;
use serde::{Deserialize, Serialize};

/// A normalized character name in its canonical display form.
pub type CharacterName = String;

/// One scene of the script: who is present and what is said.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRow {
    pub scene_characters: Option<String>,
    pub scene_dialogue: Option<String>,
}

impl ScriptRow {
    pub fn new(scene_characters: Option<&str>, scene_dialogue: Option<&str>) -> Self {
        Self {
            scene_characters: scene_characters.map(str::to_string),
            scene_dialogue: scene_dialogue.map(str::to_string),
        }
    }
}

/// An ordered pair of distinct characters seen in the same scene.
/// Both orientations are recorded, so `(a, b)` and `(b, a)` always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoOccurrenceKey {
    pub a: CharacterName,
    pub b: CharacterName,
}

impl CoOccurrenceKey {
    pub fn new(a: impl Into<CharacterName>, b: impl Into<CharacterName>) -> Self {
        Self { a: a.into(), b: b.into() }
    }

    pub fn reversed(&self) -> Self {
        Self { a: self.b.clone(), b: self.a.clone() }
    }
}

/// All counts derived from one table. Rebuilt from scratch per analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tallies {
    pub scene_counts: Tally<CharacterName>,
    pub dialogue_counts: Tally<CharacterName>,
    pub co_occurrence: Tally<CoOccurrenceKey>,
}

impl Tallies {
    pub fn is_empty(&self) -> bool {
        self.scene_counts.is_empty() && self.co_occurrence.is_empty()
    }
}
