//! Readability and lexical-complexity metrics for Italian text.
//!
//! Gulpease formula: `89 + (300 * sentences - 10 * letters) / words`
//!
//! Higher Gulpease = easier text (0–100 scale). The complexity score inverts
//! it and adds bonuses for lexical diversity and long sentences, then maps
//! the result to one of five categories.
//!
//! Uses [`text::tokenize`] for sentence and word segmentation.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::options::AnalysisOptions;
use crate::text;

/// Entries computed for the word-frequency table.
pub const TOP_WORDS_COMPUTED: usize = 10;

/// Entries exposed in [`TextAnalysis::most_common_words`].
pub const TOP_WORDS_EXPOSED: usize = 5;

/// Sentences with fewer tokens than this are short.
const SHORT_SENTENCE_TOKENS: usize = 10;

/// Sentences with more tokens than this are long.
const LONG_SENTENCE_TOKENS: usize = 20;

/// Result of analyzing a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextAnalysis {
    /// Counts and averages.
    pub statistics: Statistics,
    /// Gulpease readability index, rounded to 2 decimals.
    pub gulpease: f64,
    /// Type-token ratio, rounded to 3 decimals.
    pub ttr: f64,
    /// Sentence-length histogram.
    pub sentence_complexity: SentenceComplexity,
    /// Composite complexity score with category and display color.
    pub complexity_score: ComplexityScore,
    /// Most frequent words as `(word, count)` pairs, at most five.
    pub most_common_words: Vec<(String, usize)>,
    /// Frequency filter that was applied.
    pub filter_applied: FilterApplied,
}

/// Counts and averages over the cleaned word list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Statistics {
    /// Number of alphabetic words.
    pub total_words: usize,
    /// Number of sentences.
    pub total_sentences: usize,
    /// Characters in the raw input, whitespace included.
    pub total_chars: usize,
    /// Mean word length in characters, rounded to 2 decimals.
    pub avg_word_length: f64,
    /// Words per sentence, rounded to 2 decimals.
    pub avg_sentence_length: f64,
    /// Distinct words.
    pub unique_words: usize,
}

/// Sentence counts by token length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceComplexity {
    /// Fewer than 10 tokens.
    pub short: usize,
    /// 10 to 20 tokens.
    pub medium: usize,
    /// More than 20 tokens.
    pub long: usize,
}

impl SentenceComplexity {
    /// Classify sentences by their token count.
    ///
    /// Each sentence is re-tokenized on its own, so punctuation tokens count
    /// toward its length even though they are absent from the word list.
    pub fn from_sentences(sentences: &[String]) -> Self {
        sentences
            .iter()
            .map(|s| text::tokenize_words(s).len())
            .fold(Self::default(), |mut acc, len| {
                if len < SHORT_SENTENCE_TOKENS {
                    acc.short += 1;
                } else if len <= LONG_SENTENCE_TOKENS {
                    acc.medium += 1;
                } else {
                    acc.long += 1;
                }
                acc
            })
    }

    /// Total number of classified sentences.
    pub const fn total(&self) -> usize {
        self.short + self.medium + self.long
    }
}

/// Complexity category, from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ComplexityCategory {
    /// Score below 30.
    #[serde(rename = "Molto Semplice")]
    MoltoSemplice,
    /// Score in `[30, 50)`.
    #[serde(rename = "Semplice")]
    Semplice,
    /// Score in `[50, 70)`.
    #[serde(rename = "Medio")]
    Medio,
    /// Score in `[70, 85)`.
    #[serde(rename = "Complesso")]
    Complesso,
    /// Score of 85 or more.
    #[serde(rename = "Molto Complesso")]
    MoltoComplesso,
}

impl ComplexityCategory {
    /// Map a score to its category. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Self::MoltoSemplice
        } else if score < 50.0 {
            Self::Semplice
        } else if score < 70.0 {
            Self::Medio
        } else if score < 85.0 {
            Self::Complesso
        } else {
            Self::MoltoComplesso
        }
    }

    /// Italian display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MoltoSemplice => "Molto Semplice",
            Self::Semplice => "Semplice",
            Self::Medio => "Medio",
            Self::Complesso => "Complesso",
            Self::MoltoComplesso => "Molto Complesso",
        }
    }

    /// Display color as a `#rrggbb` hex string.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::MoltoSemplice => "#22c55e",
            Self::Semplice => "#84cc16",
            Self::Medio => "#eab308",
            Self::Complesso => "#f97316",
            Self::MoltoComplesso => "#ef4444",
        }
    }

    /// Display color as an RGB triple.
    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::MoltoSemplice => (0x22, 0xc5, 0x5e),
            Self::Semplice => (0x84, 0xcc, 0x16),
            Self::Medio => (0xea, 0xb3, 0x08),
            Self::Complesso => (0xf9, 0x73, 0x16),
            Self::MoltoComplesso => (0xef, 0x44, 0x44),
        }
    }
}

impl std::fmt::Display for ComplexityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite complexity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplexityScore {
    /// Score in `[0, 100]`, rounded to 2 decimals.
    pub score: f64,
    /// Category for the score.
    pub category: ComplexityCategory,
    /// Display color for the category.
    pub color: String,
}

impl ComplexityScore {
    /// Build a score and derive its category and color.
    ///
    /// The category comes from the unrounded score.
    pub fn new(raw_score: f64) -> Self {
        let category = ComplexityCategory::from_score(raw_score);
        Self {
            score: round_to(raw_score, 2),
            category,
            color: category.color().to_string(),
        }
    }
}

/// Frequency filter settings echoed in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterApplied {
    /// Whether short words were dropped.
    pub enabled: bool,
    /// Minimum word length; `null` when the filter is off.
    pub min_length: Option<usize>,
}

impl From<&AnalysisOptions> for FilterApplied {
    fn from(options: &AnalysisOptions) -> Self {
        Self {
            enabled: options.filter_short_words(),
            min_length: options
                .filter_short_words()
                .then_some(options.min_word_length()),
        }
    }
}

/// Analyze Italian text.
///
/// # Errors
///
/// * [`AnalysisError::EmptyInput`]: `text` is empty or whitespace only.
/// * [`AnalysisError::InvalidInput`]: no alphabetic words or no sentences.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn analyze(text: &str, options: AnalysisOptions) -> AnalysisResult<TextAnalysis> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let tokens = text::tokenize(text);
    let words = &tokens.words;
    let total_words = words.len();
    let total_sentences = tokens.sentences.len();

    if total_words == 0 || total_sentences == 0 {
        return Err(AnalysisError::InvalidInput);
    }

    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_length = letters as f64 / total_words as f64;
    let avg_sentence_length = total_words as f64 / total_sentences as f64;

    let gulpease = gulpease(total_sentences, letters, total_words);
    let unique_words = words.iter().collect::<HashSet<_>>().len();
    let ttr = unique_words as f64 / total_words as f64;

    let sentence_complexity = SentenceComplexity::from_sentences(&tokens.sentences);
    let raw_complexity = complexity_score(gulpease, ttr, avg_sentence_length);

    let mut most_common_words = most_common_words(words, &options);
    most_common_words.truncate(TOP_WORDS_EXPOSED);

    tracing::debug!(
        total_words,
        total_sentences,
        gulpease,
        complexity = raw_complexity,
        "text analyzed"
    );

    Ok(TextAnalysis {
        statistics: Statistics {
            total_words,
            total_sentences,
            total_chars: text.chars().count(),
            avg_word_length: round_to(avg_word_length, 2),
            avg_sentence_length: round_to(avg_sentence_length, 2),
            unique_words,
        },
        gulpease: round_to(gulpease, 2),
        ttr: round_to(ttr, 3),
        sentence_complexity,
        complexity_score: ComplexityScore::new(raw_complexity),
        most_common_words,
        filter_applied: FilterApplied::from(&options),
    })
}

/// Gulpease index (unrounded). `words` must be non-zero.
pub fn gulpease(sentences: usize, letters: usize, words: usize) -> f64 {
    let numerator = 300 * sentences as i64 - 10 * letters as i64;
    89.0 + numerator as f64 / words as f64
}

/// Composite complexity score (unrounded), clamped to `[0, 100]`.
///
/// Starts at `100 - gulpease`; adds 10 when `ttr > 0.7`; adds 15 when the
/// average sentence exceeds 25 words, or 10 when it exceeds 20.
pub fn complexity_score(gulpease: f64, ttr: f64, avg_sentence_length: f64) -> f64 {
    let mut score = 100.0 - gulpease;
    if ttr > 0.7 {
        score += 10.0;
    }
    if avg_sentence_length > 25.0 {
        score += 15.0;
    } else if avg_sentence_length > 20.0 {
        score += 10.0;
    }
    score.clamp(0.0, 100.0)
}

/// Words eligible for the frequency table under `options`.
pub fn frequency_pool<'a>(words: &'a [String], options: &AnalysisOptions) -> Vec<&'a str> {
    words
        .iter()
        .map(String::as_str)
        .filter(|w| !options.filter_short_words() || w.chars().count() >= options.min_word_length())
        .collect()
}

/// The [`TOP_WORDS_COMPUTED`] most frequent words.
///
/// Ordered by count (descending), ties by first occurrence.
pub fn most_common_words(words: &[String], options: &AnalysisOptions) -> Vec<(String, usize)> {
    // word -> (first occurrence, count)
    let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, w) in frequency_pool(words, options).into_iter().enumerate() {
        freq.entry(w).or_insert((idx, 0)).1 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = freq
        .into_iter()
        .map(|(word, (first, count))| (word, first, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    ranked
        .into_iter()
        .take(TOP_WORDS_COMPUTED)
        .map(|(word, _, count)| (word.to_string(), count))
        .collect()
}

/// Round to `decimals` places, half to even on the exact binary value.
///
/// Goes through decimal formatting so 2.675 rounds the way its stored
/// value (2.67499…) dictates.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
