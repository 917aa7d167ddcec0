//! Development tasks for leggibile: man pages and shell completions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Development tasks for leggibile", long_about = None)]
struct XtaskCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render man pages for the CLI and every subcommand
    Man {
        /// Output directory
        #[arg(long, default_value = "target/dist/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/dist/completions")]
        out: PathBuf,
        /// Shells to generate for (default: all)
        #[arg(long, value_enum)]
        shell: Vec<Shell>,
    },
}

fn main() -> Result<()> {
    match XtaskCli::parse().command {
        Commands::Man { out } => man(&out),
        Commands::Completions { out, shell } => completions(&out, &shell),
    }
}

fn man(out: &Path) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    clap_mangen::generate_to(leggibile::command(), out)
        .with_context(|| format!("failed to write man pages to {}", out.display()))?;
    println!("man pages written to {}", out.display());
    Ok(())
}

fn completions(out: &Path, shells: &[Shell]) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let shells = if shells.is_empty() {
        Shell::value_variants()
    } else {
        shells
    };

    let mut cmd = leggibile::command();
    for shell in shells {
        let path = clap_complete::generate_to(*shell, &mut cmd, "leggibile", out)
            .with_context(|| format!("failed to write {shell} completions"))?;
        println!("{shell}: {}", path.display());
    }
    Ok(())
}
