//! Core library for leggibile.
//!
//! Readability metrics for Italian text: tokenization, the Gulpease index,
//! type-token ratio, sentence-length buckets, a composite complexity score,
//! and a word-frequency table. Also holds the data model for comparing these
//! metrics with an estimate produced by an external language model.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`text`] - Sentence and word tokenization
//! - [`metrics`] - The metrics engine
//! - [`options`] - Analysis options and request coercion
//! - [`semantic`] - Prompt and response model for the semantic analyzer
//! - [`compare`] - Local vs. semantic comparison
//!
//! # Quick Start
//!
//! ```
//! use leggibile_core::{AnalysisOptions, analyze};
//!
//! let report = analyze(
//!     "Il gatto corre veloce nel giardino. La pioggia cade lentamente sulla città.",
//!     AnalysisOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.statistics.total_sentences, 2);
//! println!("Gulpease: {}", report.gulpease);
//! ```
#![deny(unsafe_code)]

pub mod compare;

pub mod config;

pub mod dictionaries;

pub mod error;

pub mod metrics;

pub mod options;

pub mod semantic;

pub mod text;

/// Default maximum input size (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use compare::{Agreement, ComparisonReport, Differences, Failure, Outcome, Success};

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{
    AnalysisError, AnalysisResult, ConfigError, ConfigResult, SemanticError, SemanticResult,
};

pub use metrics::{ComplexityCategory, TextAnalysis, analyze};

pub use options::AnalysisOptions;

pub use semantic::SemanticReport;
