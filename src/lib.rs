// src/lib.rs

pub mod c_api;
pub mod config;
pub mod core;
pub mod emotion;
pub mod error;
pub mod export;
pub mod logging;
pub mod matching;
pub mod render;
pub mod report;
pub mod sentiment;
pub mod table;

pub use crate::config::AnalysisConfig;
pub use crate::core::engine::{ScriptAnalysis, ScriptAnalyzer};
pub use crate::error::{AnalysisError, Result};
pub use crate::table::ScriptTable;
