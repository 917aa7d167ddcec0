//! Comparison between the engine's metrics and a model's estimate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, SemanticError};
use crate::metrics::TextAnalysis;
use crate::semantic::SemanticReport;

/// Agreement between two complexity scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Agreement {
    /// Scores differ by less than 15 points.
    Alta,
    /// Scores differ by less than 30 points.
    Media,
    /// Scores differ by 30 points or more.
    Bassa,
}

impl Agreement {
    /// Classify a complexity delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta < 15.0 {
            Self::Alta
        } else if delta < 30.0 {
            Self::Media
        } else {
            Self::Bassa
        }
    }
}

/// Numeric deltas between two analyses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Differences {
    /// `|gulpease_local - gulpease_semantic|`
    pub gulpease_diff: f64,
    /// `|complexity_local - complexity_semantic|`
    pub complexity_diff: f64,
    /// Agreement label derived from `complexity_diff`.
    pub agreement: Agreement,
}

/// Compute deltas between the engine's result and a model's estimate.
pub fn differences(local: &TextAnalysis, semantic: &SemanticReport) -> Differences {
    let gulpease_diff = (local.gulpease - semantic.gulpease).abs();
    let complexity_diff = (local.complexity_score.score - semantic.complexity_score.score).abs();
    Differences {
        gulpease_diff,
        complexity_diff,
        agreement: Agreement::from_delta(complexity_diff),
    }
}

/// Errors that carry a stable discriminant for serialized payloads.
pub trait ErrorKind: std::fmt::Display {
    /// Machine-readable error kind.
    fn kind(&self) -> &'static str;
}

impl ErrorKind for AnalysisError {
    fn kind(&self) -> &'static str {
        Self::kind(self)
    }
}

impl ErrorKind for SemanticError {
    fn kind(&self) -> &'static str {
        Self::kind(self)
    }
}

/// A successful report, flagged with `"success": true` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Success<T> {
    success: bool,
    /// The report.
    #[serde(flatten)]
    pub report: T,
}

impl<T> Success<T> {
    /// Wrap a report.
    pub const fn new(report: T) -> Self {
        Self {
            success: true,
            report,
        }
    }
}

/// A failure with a human-readable message and a discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Failure {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable kind (e.g. `empty_input`).
    pub kind: String,
}

impl Failure {
    /// Build a failure from a typed error.
    pub fn from_error<E: ErrorKind>(err: &E) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

/// Either side of a comparison: a report or a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    /// The analysis succeeded.
    Success(Success<T>),
    /// The analysis failed.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// The report, if the analysis succeeded.
    pub const fn report(&self) -> Option<&T> {
        match self {
            Self::Success(s) => Some(&s.report),
            Self::Failure(_) => None,
        }
    }
}

impl<T, E: ErrorKind> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(report) => Self::Success(Success::new(report)),
            Err(err) => Self::Failure(Failure::from_error(&err)),
        }
    }
}

/// Side-by-side result of the engine and the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Deterministic engine result.
    pub local: Outcome<TextAnalysis>,
    /// Model result.
    pub semantic: Outcome<SemanticReport>,
    /// Deltas; present only when both sides succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differences: Option<Differences>,
}

impl ComparisonReport {
    /// Pair two outcomes and compute deltas when both succeeded.
    #[tracing::instrument(skip_all)]
    pub fn new(local: Outcome<TextAnalysis>, semantic: Outcome<SemanticReport>) -> Self {
        let differences = match (local.report(), semantic.report()) {
            (Some(l), Some(s)) => Some(differences(l, s)),
            _ => None,
        };
        if let Some(ref d) = differences {
            tracing::debug!(
                complexity_diff = d.complexity_diff,
                agreement = ?d.agreement,
                "analyses compared"
            );
        }
        Self {
            local,
            semantic,
            differences,
        }
    }
}
