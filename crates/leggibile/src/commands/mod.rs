//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use leggibile_core::AnalysisOptions;

pub mod analyze;
#[cfg(feature = "semantic")]
pub mod compare;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Input and frequency-table flags shared by `analyze` and `compare`.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// File to analyze (`-` reads standard input).
    pub file: Utf8PathBuf,

    /// Count every word in the frequency table, including short ones.
    #[arg(long)]
    pub no_filter: bool,

    /// Minimum word length for the frequency table (clamped to 2..=10).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub min_word_length: Option<i64>,
}

impl InputArgs {
    /// Options from the flags, falling back to the configured defaults.
    pub fn options(&self, configured: AnalysisOptions) -> AnalysisOptions {
        let filter = !self.no_filter && configured.filter_short_words();
        let min_len = self
            .min_word_length
            .unwrap_or(configured.min_word_length() as i64);
        AnalysisOptions::new(filter, min_len)
    }

    /// Whether the input comes from standard input.
    pub fn is_stdin(&self) -> bool {
        self.file.as_str() == "-"
    }

    /// Read the input named by `file`, enforcing the size limit.
    pub fn read(&self, max_bytes: Option<usize>) -> anyhow::Result<String> {
        if self.is_stdin() {
            read_input_stdin(max_bytes)
        } else {
            read_input_file(&self.file, max_bytes)
        }
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len();
        if size > max as u64 {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read standard input, stopping one byte past the limit.
pub fn read_input_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    read_limited(std::io::stdin().lock(), max_bytes, "standard input")
}

fn read_limited<R: Read>(reader: R, max_bytes: Option<usize>, name: &str) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    match max_bytes {
        Some(max) => {
            reader
                .take(max as u64 + 1)
                .read_to_end(&mut buf)
                .with_context(|| format!("failed to read {name}"))?;
            if buf.len() > max {
                anyhow::bail!("input too large: {name} exceeds {max} bytes");
            }
        }
        None => {
            let mut reader = reader;
            reader
                .read_to_end(&mut buf)
                .with_context(|| format!("failed to read {name}"))?;
        }
    }
    String::from_utf8(buf).with_context(|| format!("{name} is not valid UTF-8"))
}
