//! Semantic analysis produced by an external language model.
//!
//! The model is asked to estimate the same metrics the engine computes and
//! to add qualitative judgments. Nothing here calls the network: this module
//! builds the prompt and parses the answer. Its fields are best-effort and
//! are not validated beyond their JSON shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{SemanticError, SemanticResult};
use crate::metrics::ComplexityCategory;

/// A model's analysis of a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemanticReport {
    /// Which analyzer produced the report (e.g. `gemini`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Estimated counts.
    #[serde(default)]
    pub statistics: SemanticStatistics,
    /// Estimated Gulpease index.
    pub gulpease: f64,
    /// Estimated type-token ratio.
    #[serde(default)]
    pub ttr: f64,
    /// Estimated complexity score.
    pub complexity_score: SemanticComplexity,
    /// Qualitative judgments.
    #[serde(default)]
    pub semantic_analysis: SemanticAnalysis,
    /// Suggestions to simplify the text.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Passages or traits that make the text hard.
    #[serde(default)]
    pub critical_points: Vec<String>,
}

/// Counts estimated by the model. Models sometimes answer with decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SemanticStatistics {
    /// Estimated word count.
    pub total_words: f64,
    /// Estimated sentence count.
    pub total_sentences: f64,
    /// Estimated words per sentence.
    pub avg_sentence_length: f64,
    /// Estimated distinct words.
    pub unique_words: f64,
}

/// Complexity score as estimated by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemanticComplexity {
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Category label chosen by the model.
    #[serde(default)]
    pub category: String,
    /// Display color, always derived locally from `score`.
    #[serde(default)]
    pub color: String,
}

/// Qualitative judgments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SemanticAnalysis {
    /// Conceptual difficulty: Bassa, Media, Alta.
    pub conceptual_difficulty: String,
    /// Target school level: Elementare, Media, Superiore, Università.
    pub school_level: String,
    /// Register: Informale, Formale, Tecnico, Divulgativo.
    pub register: String,
    /// Technical terms found in the text.
    pub technical_terms: Vec<String>,
    /// Short description of the reasoning required.
    pub reasoning_complexity: String,
}

/// Build the instruction prompt for `text`.
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Analizza il seguente testo italiano e rispondi esclusivamente con un documento JSON.

TESTO:
{text}

Formato richiesto (solo JSON, senza testo aggiuntivo):
{{
  "statistics": {{
    "total_words": <intero>,
    "total_sentences": <intero>,
    "avg_sentence_length": <decimale>,
    "unique_words": <intero>
  }},
  "gulpease": <decimale tra 0 e 100>,
  "ttr": <decimale tra 0 e 1>,
  "complexity_score": {{
    "score": <decimale tra 0 e 100>,
    "category": "<Molto Semplice|Semplice|Medio|Complesso|Molto Complesso>"
  }},
  "semantic_analysis": {{
    "conceptual_difficulty": "<Bassa|Media|Alta>",
    "school_level": "<Elementare|Media|Superiore|Università>",
    "register": "<Informale|Formale|Tecnico|Divulgativo>",
    "technical_terms": [<termini tecnici presenti nel testo>],
    "reasoning_complexity": "<breve descrizione>"
  }},
  "suggestions": ["<suggerimento>", "<suggerimento>", "<suggerimento>"],
  "critical_points": ["<punto critico>", "<punto critico>"]
}}

Regole:
- Gulpease: 89 + (300 * frasi - 10 * lettere) / parole
- TTR: parole distinte diviso parole totali
- La complessità tiene conto di sintassi e semantica
- Calcola le statistiche con precisione
- Elenca i termini tecnici realmente presenti
- Dai suggerimenti pratici e concreti
"#
    )
}

/// Parse a model answer into a [`SemanticReport`].
///
/// Markdown code fences around the JSON are tolerated. The complexity color
/// is recomputed from the score with the engine's category table.
///
/// # Errors
///
/// [`SemanticError::InvalidResponse`] when the answer is not the expected JSON.
pub fn parse_response(raw: &str) -> SemanticResult<SemanticReport> {
    let body = strip_code_fences(raw);
    let mut report: SemanticReport = serde_json::from_str(body)
        .map_err(|e| SemanticError::InvalidResponse(e.to_string()))?;

    report.complexity_score.color = ComplexityCategory::from_score(report.complexity_score.score)
        .color()
        .to_string();

    Ok(report)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
