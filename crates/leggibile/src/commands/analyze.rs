//! Analyze command: readability metrics for an Italian text.

use anyhow::Context;
use clap::Args;
use leggibile_core::{AnalysisOptions, Success, TextAnalysis, analyze};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use super::InputArgs;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input and frequency-table flags.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Compute readability metrics for a file or standard input.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.input.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    configured: AnalysisOptions,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let options = args.input.options(configured);
    debug!(file = %args.input.file, ?options, "executing analyze command");

    let content = args.input.read(max_input_bytes)?;
    let report = analyze(&content, options)
        .with_context(|| format!("failed to analyze {}", args.input.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&Success::new(&report))?);
    } else {
        print_report(args.input.file.as_str(), &report);
    }

    Ok(())
}

/// Human-readable rendering shared with `compare`.
pub fn print_report(name: &str, report: &TextAnalysis) {
    let stats = &report.statistics;
    let score = &report.complexity_score;
    let (r, g, b) = score.category.rgb();

    println!("{}", name.bold());
    println!(
        "\n  {} {:.2} ({})",
        "Complexity:".cyan(),
        score.score,
        score.category.label().truecolor(r, g, b).bold(),
    );
    println!("  {} {:.2}", "Gulpease:".cyan(), report.gulpease);
    println!("  {} {:.3}", "TTR:".cyan(), report.ttr);

    println!(
        "\n  {} {} words, {} sentences, {} unique",
        "Text:".cyan(),
        stats.total_words,
        stats.total_sentences,
        stats.unique_words,
    );
    println!(
        "  {} {:.2} letters per word, {:.2} words per sentence",
        "Averages:".cyan(),
        stats.avg_word_length,
        stats.avg_sentence_length,
    );

    let buckets = &report.sentence_complexity;
    println!(
        "  {} {} short / {} medium / {} long",
        "Sentences:".cyan(),
        buckets.short,
        buckets.medium,
        buckets.long,
    );

    if !report.most_common_words.is_empty() {
        let top: Vec<_> = report
            .most_common_words
            .iter()
            .map(|(word, count)| format!("\"{word}\" ({count})"))
            .collect();
        println!("\n  {} {}", "Frequent:".cyan(), top.join(", "));
    }
    match report.filter_applied.min_length {
        Some(min) => println!("  {}", format!("(words shorter than {min} letters skipped)").dimmed()),
        None => println!("  {}", "(all words counted)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn write_input(dir: &tempfile::TempDir, text: &str) -> Utf8PathBuf {
        let path = dir.path().join("testo.txt");
        std::fs::write(&path, text).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn args_for(file: Utf8PathBuf) -> AnalyzeArgs {
        AnalyzeArgs {
            input: InputArgs {
                file,
                no_filter: false,
                min_word_length: None,
            },
        }
    }

    #[test]
    fn analyze_text_output_succeeds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = write_input(&tmp, "Il gatto corre veloce nel giardino.");
        assert!(cmd_analyze(args_for(file), false, AnalysisOptions::default(), None).is_ok());
    }

    #[test]
    fn analyze_json_output_succeeds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = write_input(&tmp, "Il gatto corre veloce nel giardino.");
        assert!(cmd_analyze(args_for(file), true, AnalysisOptions::default(), None).is_ok());
    }

    #[test]
    fn blank_input_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = write_input(&tmp, "   \n");
        let err = cmd_analyze(args_for(file), false, AnalysisOptions::default(), None).unwrap_err();
        assert!(format!("{err:#}").contains("empty text"));
    }
}
