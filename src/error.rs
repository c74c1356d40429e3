// File: src/error.rs
use thiserror::Error;

/// Errors surfaced by the analysis library.
///
/// Malformed-but-present cell data never produces an error; it degrades to
/// zero or empty results. Only structural problems with the input, I/O and
/// the external collaborators are reported here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is absent from the uploaded table.
    #[error("missing column '{column}' (available: {})", .available.join(", "))]
    MissingColumn { column: String, available: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    /// The external emotion classifier failed or returned unusable output.
    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown report kind '{0}'")]
    UnknownReport(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
