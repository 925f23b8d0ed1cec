//! godmap CLI entry point.
//!
//! Handles thread pool sizing, configuration discovery, command dispatch,
//! and exit-code mapping. The analysis itself lives in the library.

use anyhow::Result;
use clap::Parser;
use godmap::cli::{Cli, Commands, EXIT_CLEAN, EXIT_ERROR, EXIT_ISSUES};
use godmap::config::{default_config_template, GodmapConfig, CONFIG_FILE_NAME};
use godmap::engine::AnalysisEngine;
use godmap::io::output::create_writer;
use godmap::observability::init_tracing;
use godmap::ParserRegistry;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("godmap: {error:#}");
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            jobs,
            config,
        } => analyze(&path, format, output, jobs, config),
        Commands::Init { force } => init(force),
    }
}

fn analyze(
    path: &Path,
    format: godmap::cli::OutputFormat,
    output: Option<PathBuf>,
    jobs: usize,
    config_path: Option<PathBuf>,
) -> Result<i32> {
    configure_thread_pool(jobs);

    let config = match config_path {
        Some(explicit) => GodmapConfig::load_from(&explicit)?,
        None => GodmapConfig::discover(path)?,
    };

    let engine = AnalysisEngine::new(
        ParserRegistry::with_defaults(),
        config.detection_thresholds.clone(),
    )
    .with_extra_ignores(config.ignore.directories.clone());

    let analysis = engine.run(path)?;

    let destination: Box<dyn Write + Send> = match output {
        Some(file) => Box::new(std::fs::File::create(file)?),
        None => Box::new(std::io::stdout()),
    };
    create_writer(format.into(), destination).write_report(&analysis)?;

    Ok(if analysis.report.has_issues() {
        EXIT_ISSUES
    } else {
        EXIT_CLEAN
    })
}

fn init(force: bool) -> Result<i32> {
    let target = Path::new(CONFIG_FILE_NAME);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists (use --force to overwrite)");
    }
    std::fs::write(target, default_config_template())?;
    println!("wrote {CONFIG_FILE_NAME}");
    Ok(EXIT_CLEAN)
}

fn configure_thread_pool(jobs: usize) {
    if jobs > 0 {
        if let Err(error) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
            tracing::warn!(%error, "could not size thread pool; using defaults");
        }
    }
}
