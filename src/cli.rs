use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::output;

#[derive(Parser, Debug)]
#[command(name = "godmap")]
#[command(about = "Detects god files, god classes, and god methods, and suggests extractions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a source tree and report god objects
    Analyze {
        /// Path to analyze (file or directory)
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads (0 = all available cores)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Configuration file (defaults to discovering godmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default godmap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => output::OutputFormat::Terminal,
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Markdown => output::OutputFormat::Markdown,
        }
    }
}

/// Exit codes: clean, issues found, engine failure.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_ISSUES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
