//! ng-po-gen - page object generator for Angular component templates.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use pogen_batch::BatchRunner;
use pogen_codegen::LineEnding;
use tracing_subscriber::{fmt, EnvFilter};

mod config;

#[derive(Parser)]
#[command(name = "ng-po-gen")]
#[command(about = "Generate page objects from Angular component templates")]
#[command(version)]
pub struct Cli {
    /// Directory scanned for component templates
    source_dir: PathBuf,

    /// Root directory for generated page objects (defaults to SOURCE_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Line endings of generated files: unix or win
    #[arg(long)]
    eol: Option<LineEnding>,

    /// Prefix of marker attributes (default "_")
    #[arg(long)]
    attribute_prefix: Option<String>,

    /// Component tag prefix stripped from inferred class names, e.g. "app-"
    #[arg(long)]
    selector_prefix: Option<String>,

    /// Module exporting PageObject and the builtin page objects
    #[arg(long)]
    lib: Option<String>,

    /// Replace existing page objects instead of merging with them
    #[arg(long)]
    overwrite: bool,

    /// Process templates in parallel
    #[arg(long)]
    parallel: bool,

    /// Path to po-gen.toml config file
    #[arg(short, long, default_value = "po-gen.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let file_config = config::load_config(&cli.config)?;
    let batch_config = config::resolve(&cli, file_config.generator);

    tracing::info!(
        "Generating page objects from {} into {}",
        batch_config.source_dir.display(),
        batch_config.output_dir.display()
    );

    let result = BatchRunner::new(batch_config).run()?;

    tracing::info!(
        "Processed {} templates in {}ms ({} written, {} unchanged)",
        result.reports.len(),
        result.duration_ms,
        result.written,
        result.unchanged
    );

    if !result.is_success() {
        bail!(
            "{} of {} templates failed",
            result.failed,
            result.reports.len()
        );
    }

    Ok(())
}
