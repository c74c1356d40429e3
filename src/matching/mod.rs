// File: src/matching/mod.rs
pub mod counter;

pub use counter::{count_occurrences, NameMatcher};
