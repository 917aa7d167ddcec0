//! Compare command: local metrics side by side with a Gemini estimate.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use leggibile_core::compare::Outcome;
use leggibile_core::{AnalysisOptions, ComparisonReport, SemanticReport, Success, analyze};
use owo_colors::OwoColorize;
use tracing::{debug, instrument, warn};

use super::InputArgs;
use super::analyze::print_report;
use crate::gemini::{GeminiClient, GeminiConfig};

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Input and frequency-table flags.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Analyze a text locally and with Gemini, then report the differences.
///
/// A failed local analysis is an error. A failed Gemini call is reported in
/// the output and logged, but the command still succeeds.
#[instrument(name = "cmd_compare", skip_all, fields(file = %args.input.file))]
pub fn cmd_compare(
    args: CompareArgs,
    global_json: bool,
    configured: AnalysisOptions,
    gemini: GeminiConfig,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let options = args.input.options(configured);
    debug!(file = %args.input.file, ?options, model = %gemini.model, "executing compare command");

    let content = args.input.read(max_input_bytes)?;
    let local = analyze(&content, options)
        .with_context(|| format!("failed to analyze {}", args.input.file))?;

    let client = GeminiClient::new(gemini).context("failed to set up the Gemini client")?;
    let semantic = {
        let spinner = Spinner::new(!global_json, client.model());
        let rt = tokio::runtime::Runtime::new()
            .context("failed to create async runtime for the Gemini client")?;
        let result = rt.block_on(client.analyze(&content));
        spinner.finish();
        result
    };
    if let Err(ref err) = semantic {
        warn!(error = %err, kind = err.kind(), "semantic analysis unavailable");
    }

    let report = ComparisonReport::new(Outcome::Success(Success::new(local)), semantic.into());

    if global_json {
        println!("{}", serde_json::to_string_pretty(&Success::new(&report))?);
    } else {
        print_comparison(args.input.file.as_str(), &report);
    }

    Ok(())
}

fn print_comparison(name: &str, report: &ComparisonReport) {
    if let Some(local) = report.local.report() {
        println!("{}", "Local".bold().underline());
        print_report(name, local);
    }

    println!("\n{}", "Gemini".bold().underline());
    match report.semantic {
        Outcome::Success(ref s) => print_semantic(&s.report),
        Outcome::Failure(ref f) => {
            println!("  {} {}", "Unavailable:".yellow(), f.error);
        }
    }

    if let Some(ref d) = report.differences {
        println!("\n{}", "Differences".bold().underline());
        println!("  {} {:.2}", "Gulpease:".cyan(), d.gulpease_diff);
        println!("  {} {:.2}", "Complexity:".cyan(), d.complexity_diff);
        println!("  {} {:?}", "Agreement:".cyan(), d.agreement);
    }
}

fn print_semantic(semantic: &SemanticReport) {
    let score = &semantic.complexity_score;
    println!(
        "  {} {:.2} ({})",
        "Complexity:".cyan(),
        score.score,
        score.category
    );
    println!("  {} {:.2}", "Gulpease:".cyan(), semantic.gulpease);
    println!("  {} {:.3}", "TTR:".cyan(), semantic.ttr);

    let analysis = &semantic.semantic_analysis;
    if !analysis.school_level.is_empty() {
        println!("  {} {}", "School level:".cyan(), analysis.school_level);
    }
    if !analysis.register.is_empty() {
        println!("  {} {}", "Register:".cyan(), analysis.register);
    }
    if !analysis.technical_terms.is_empty() {
        println!(
            "  {} {}",
            "Technical terms:".cyan(),
            analysis.technical_terms.join(", ")
        );
    }
    for suggestion in &semantic.suggestions {
        println!("  {} {suggestion}", "-".dimmed());
    }
}

/// Spinner on stderr while waiting for the model; hidden when not interactive.
struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    fn new(enabled: bool, model: &str) -> Self {
        let bar = (enabled && std::io::stderr().is_terminal()).then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("waiting for {model}..."));
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });
        Self { bar }
    }

    fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn args_for(dir: &tempfile::TempDir, text: &str) -> CompareArgs {
        let path = dir.path().join("testo.txt");
        std::fs::write(&path, text).unwrap();
        CompareArgs {
            input: InputArgs {
                file: Utf8PathBuf::try_from(path).unwrap(),
                no_filter: false,
                min_word_length: None,
            },
        }
    }

    #[test]
    fn unconfigured_gemini_still_reports_local_side() {
        let tmp = tempfile::TempDir::new().unwrap();
        let args = args_for(&tmp, "Il gatto corre veloce nel giardino.");
        let result = cmd_compare(
            args,
            true,
            AnalysisOptions::default(),
            GeminiConfig::default(),
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn blank_input_fails_before_calling_gemini() {
        let tmp = tempfile::TempDir::new().unwrap();
        let args = args_for(&tmp, "  ");
        let err = cmd_compare(
            args,
            false,
            AnalysisOptions::default(),
            GeminiConfig::default(),
            None,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("empty text"));
    }

    #[test]
    fn disabled_spinner_is_inert() {
        let spinner = Spinner::new(false, "gemini-flash-latest");
        assert!(spinner.bar.is_none());
        spinner.finish();
    }
}
