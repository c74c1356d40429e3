// File: src/table.rs
use crate::config::AnalysisConfig;
use crate::core::normalizer::capitalized_names;
use crate::core::types::ScriptRow;
use crate::error::{AnalysisError, Result};
use crate::matching::counter::{count_occurrences, NameMatcher};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The uploaded script: one row per scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptTable {
    rows: Vec<ScriptRow>,
}

impl ScriptTable {
    pub fn from_rows(rows: Vec<ScriptRow>) -> Self {
        Self { rows }
    }

    pub fn from_path(path: &Path, config: &AnalysisConfig) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(file, config)?;
        log::info!("Loaded {} scenes from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads CSV with a header row. Both configured columns must be present;
    /// empty cells and short rows read as absent values.
    pub fn from_reader<R: Read>(reader: R, config: &AnalysisConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::MissingColumn {
                    column: name.to_string(),
                    available: headers.clone(),
                })
        };
        let characters_idx = column(&config.characters_column)?;
        let dialogue_idx = column(&config.dialogue_column)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |idx: usize| {
                record
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };
            rows.push(ScriptRow {
                scene_characters: cell(characters_idx),
                scene_dialogue: cell(dialogue_idx),
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ScriptRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn character_cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.scene_characters.as_deref())
    }

    fn dialogue_cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.scene_dialogue.as_deref())
    }

    /// Distinct capitalized names across all character cells, sorted.
    pub fn character_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .character_cells()
            .flat_map(capitalized_names)
            .collect();
        names.into_iter().collect()
    }

    /// Whole-word mentions of `name` across every scene's dialogue.
    pub fn dialogue_mentions(&self, name: &str) -> u64 {
        self.rows
            .iter()
            .map(|row| count_occurrences(row.scene_dialogue.as_deref(), name))
            .sum()
    }

    /// Scenes whose character list mentions `name` as a whole word, any case.
    pub fn scenes_featuring(&self, name: &str) -> u64 {
        let Some(matcher) = NameMatcher::new(name) else {
            return 0;
        };
        self.character_cells().filter(|cell| matcher.is_match(cell)).count() as u64
    }

    /// All dialogue, space-joined.
    pub fn dialogue_blob(&self) -> String {
        self.dialogue_cells().collect::<Vec<_>>().join(" ")
    }

    /// Dialogue of the scenes whose character cell contains `name` verbatim.
    pub fn character_dialogue_blob(&self, name: &str) -> String {
        if name.trim().is_empty() {
            return String::new();
        }
        self.rows
            .iter()
            .filter(|row| {
                row.scene_characters
                    .as_deref()
                    .is_some_and(|cell| cell.contains(name))
            })
            .filter_map(|row| row.scene_dialogue.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "\
Scene_Number,Scene_Characters,Scene_Dialogue
1,\"Wade, Vanessa\",Wade loves Vanessa
2,Wade,
3,,Nobody is here
4,\"[Weasel, Blind Al]\",\"Weasel: Wade owes me. Al: wade always does.\"
";

    fn table() -> ScriptTable {
        ScriptTable::from_reader(SCRIPT.as_bytes(), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn reads_rows_and_absent_cells() {
        let table = table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[1], ScriptRow::new(Some("Wade"), None));
        assert_eq!(table.rows()[2], ScriptRow::new(None, Some("Nobody is here")));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Scene_Characters,Other\nWade,x\n";
        let err = ScriptTable::from_reader(csv.as_bytes(), &AnalysisConfig::default()).unwrap_err();
        match err {
            AnalysisError::MissingColumn { column, available } => {
                assert_eq!(column, "Scene_Dialogue");
                assert_eq!(available, vec!["Scene_Characters", "Other"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_is_empty_not_an_error() {
        let csv = "Scene_Characters,Scene_Dialogue\n";
        let table = ScriptTable::from_reader(csv.as_bytes(), &AnalysisConfig::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "Scene_Characters,Scene_Dialogue\nWade\n";
        let table = ScriptTable::from_reader(csv.as_bytes(), &AnalysisConfig::default()).unwrap();
        assert_eq!(table.rows()[0], ScriptRow::new(Some("Wade"), None));
    }

    #[test]
    fn single_character_queries() {
        let table = table();
        assert_eq!(table.dialogue_mentions("wade"), 3);
        assert_eq!(table.scenes_featuring("WADE"), 2);
        assert_eq!(table.scenes_featuring("Al"), 1);
        assert_eq!(table.scenes_featuring(""), 0);
    }

    #[test]
    fn roster_names_are_sorted_and_distinct() {
        assert_eq!(table().character_names(), vec!["Blind Al", "Vanessa", "Wade", "Weasel"]);
    }

    #[test]
    fn dialogue_blobs() {
        let table = table();
        assert_eq!(
            table.dialogue_blob(),
            "Wade loves Vanessa Nobody is here Weasel: Wade owes me. Al: wade always does."
        );
        assert_eq!(table.character_dialogue_blob("Wade"), "Wade loves Vanessa");
        assert_eq!(table.character_dialogue_blob("wade"), "");
        assert_eq!(table.character_dialogue_blob(" "), "");
    }
}
