// src/core/mod.rs
pub mod engine;
pub mod graph;
pub mod normalizer;
pub mod tally;
pub mod types;
