//! Dictionaries for text analysis.
//!
//! Provides curated word sets used by sentence splitting.

pub mod abbreviations;
