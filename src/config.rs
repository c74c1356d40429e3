// File: src/config.rs
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_CHARACTERS_COLUMN: &str = "Scene_Characters";
pub const DEFAULT_DIALOGUE_COLUMN: &str = "Scene_Dialogue";
pub const DEFAULT_TOP_N: usize = 10;

/// How a character listed more than once in one scene cell is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneCounting {
    /// Every mention in the raw list counts, duplicates included.
    #[default]
    PerMention,
    /// A character counts at most once per scene.
    PerScene,
}

/// Which spelling of a character name is shown when several casings exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalCasing {
    #[default]
    FirstSeen,
    TitleCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub characters_column: String,
    pub dialogue_column: String,
    pub scene_counting: SceneCounting,
    pub casing: CanonicalCasing,
    /// Row limit for top-N style reports.
    pub top_n: usize,
    /// VADER-format lexicon used for word-cloud sentiment splitting.
    pub lexicon_path: Option<PathBuf>,
    /// External emotion classifier: program followed by its arguments.
    pub emotion_command: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            characters_column: DEFAULT_CHARACTERS_COLUMN.to_string(),
            dialogue_column: DEFAULT_DIALOGUE_COLUMN.to_string(),
            scene_counting: SceneCounting::default(),
            casing: CanonicalCasing::default(),
            top_n: DEFAULT_TOP_N,
            lexicon_path: None,
            emotion_command: None,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, or the defaults when no file exists there.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.characters_column.trim().is_empty() || self.dialogue_column.trim().is_empty() {
            return Err(AnalysisError::Config("column names must not be empty".to_string()));
        }
        if self.top_n == 0 {
            return Err(AnalysisError::Config("top_n must be at least 1".to_string()));
        }
        if let Some(cmd) = &self.emotion_command {
            if cmd.is_empty() {
                return Err(AnalysisError::Config("emotion_command needs a program".to_string()));
            }
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("script-insight");
    path.push("config.json");
    Some(path)
}
