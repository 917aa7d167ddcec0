//! Analysis options and request coercion.
//!
//! The metrics engine only accepts a typed [`AnalysisOptions`]. Front ends
//! that receive loosely typed payloads (MCP tool calls, JSON requests) go
//! through [`AnalysisOptions::from_request`] first.

use serde::Serialize;
use serde_json::Value;

/// Default minimum word length for the frequency table.
pub const DEFAULT_MIN_WORD_LENGTH: usize = 4;

/// Smallest accepted minimum word length.
pub const MIN_WORD_LENGTH_FLOOR: usize = 2;

/// Largest accepted minimum word length.
pub const MIN_WORD_LENGTH_CEILING: usize = 10;

/// Options controlling the word-frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisOptions {
    filter_short_words: bool,
    min_word_length: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            filter_short_words: true,
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
        }
    }
}

impl AnalysisOptions {
    /// Build options, clamping `min_word_length` into `[2, 10]`.
    pub fn new(filter_short_words: bool, min_word_length: i64) -> Self {
        Self {
            filter_short_words,
            min_word_length: clamp_min_word_length(min_word_length),
        }
    }

    /// Whether short words are dropped before counting frequencies.
    pub const fn filter_short_words(&self) -> bool {
        self.filter_short_words
    }

    /// The clamped minimum word length.
    pub const fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Coerce a loosely typed request object into options.
    ///
    /// Reads `filter_short_words` and `min_word_length` from `request`:
    ///
    /// - `filter_short_words` must be a JSON boolean; anything else means `true`.
    /// - `min_word_length` accepts integers, floats (truncated), booleans,
    ///   and integer strings; everything else falls back to 4. The result is
    ///   clamped into `[2, 10]`.
    pub fn from_request(request: &Value) -> Self {
        let filter_short_words = request
            .get("filter_short_words")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let min_word_length = request
            .get("min_word_length")
            .map_or(DEFAULT_MIN_WORD_LENGTH, coerce_min_word_length);

        Self {
            filter_short_words,
            min_word_length,
        }
    }
}

/// Clamp a typed minimum word length into the accepted range.
pub fn clamp_min_word_length(value: i64) -> usize {
    let floor = MIN_WORD_LENGTH_FLOOR as i64;
    let ceiling = MIN_WORD_LENGTH_CEILING as i64;
    // Always within [2, 10], so the conversion cannot fail.
    usize::try_from(value.clamp(floor, ceiling)).unwrap_or(DEFAULT_MIN_WORD_LENGTH)
}

/// Coerce one loosely typed `min_word_length` value.
pub fn coerce_min_word_length(value: &Value) -> usize {
    let parsed = match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(truncate_float)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.map_or(DEFAULT_MIN_WORD_LENGTH, clamp_min_word_length)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_float(f: f64) -> i64 {
    // `as` saturates at the i64 bounds; the clamp that follows handles the rest.
    f.trunc() as i64
}
