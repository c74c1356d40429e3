use crate::config::AnalysisConfig;
use crate::core::graph::RelationshipGraph;
use crate::core::normalizer::Roster;
use crate::core::tally::TallyEngine;
use crate::core::types::{ScriptRow, Tallies};
use crate::error::Result;
use crate::report::{assemble, Report, ReportKind};
use crate::table::ScriptTable;
use std::path::Path;

// One analyzer per request. It holds configuration only; every call to
// `analyze` starts from empty tallies.
#[derive(Debug, Clone, Default)]
pub struct ScriptAnalyzer {
    config: AnalysisConfig,
}

/// Everything derived from one table.
#[derive(Debug, Clone)]
pub struct ScriptAnalysis {
    pub tallies: Tallies,
    pub graph: RelationshipGraph,
}

impl ScriptAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn load(&self, path: &Path) -> Result<ScriptTable> {
        ScriptTable::from_path(path, &self.config)
    }

    pub fn analyze(&self, table: &ScriptTable) -> ScriptAnalysis {
        self.analyze_rows(table.rows())
    }

    pub fn analyze_rows(&self, rows: &[ScriptRow]) -> ScriptAnalysis {
        let roster = Roster::new(self.config.casing);
        let mut engine = TallyEngine::new(roster, self.config.scene_counting);
        for row in rows {
            engine.record_row(row);
        }
        let tallies = engine.finish();
        let graph = RelationshipGraph::from_tallies(&tallies);

        log::info!(
            "Analyzed {} scenes: {} characters, {} related pairs",
            rows.len(),
            tallies.scene_counts.len(),
            graph.unordered_pairs().len()
        );
        ScriptAnalysis { tallies, graph }
    }

    /// Loads and analyzes in one step. A missing column aborts before any tallying.
    pub fn analyze_path(&self, path: &Path) -> Result<(ScriptTable, ScriptAnalysis)> {
        let table = self.load(path)?;
        let analysis = self.analyze(&table);
        Ok((table, analysis))
    }
}

impl ScriptAnalysis {
    pub fn report(&self, kind: ReportKind, subset: Option<&[String]>) -> Report {
        assemble(self, kind, subset)
    }

    /// Canonical character names in first-seen order.
    pub fn characters(&self) -> Vec<&str> {
        self.tallies.scene_counts.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }
}
