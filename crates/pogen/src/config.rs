//! Configuration file (po-gen.toml) and its merge with command line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pogen_batch::BatchConfig;
use pogen_codegen::LineEnding;
use serde::Deserialize;

use crate::Cli;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct GeneratorSettings {
    pub output_dir: Option<PathBuf>,
    pub eol: Option<LineEnding>,
    pub attribute_prefix: Option<String>,
    pub selector_prefix: Option<String>,
    pub lib: Option<String>,
    pub overwrite: Option<bool>,
    pub parallel: Option<bool>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config file at {}", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());

    Ok(config)
}

/// Combine flags, file settings and defaults, in that order of precedence.
pub fn resolve(cli: &Cli, file: GeneratorSettings) -> BatchConfig {
    let defaults = BatchConfig::default();

    BatchConfig {
        output_dir: cli
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| cli.source_dir.clone()),
        eol: cli.eol.or(file.eol).unwrap_or(defaults.eol),
        attribute_prefix: cli
            .attribute_prefix
            .clone()
            .or(file.attribute_prefix)
            .unwrap_or(defaults.attribute_prefix),
        selector_prefix: cli
            .selector_prefix
            .clone()
            .or(file.selector_prefix)
            .unwrap_or(defaults.selector_prefix),
        lib: cli.lib.clone().or(file.lib).unwrap_or(defaults.lib),
        overwrite: cli.overwrite || file.overwrite.unwrap_or(defaults.overwrite),
        parallel: cli.parallel || file.parallel.unwrap_or(defaults.parallel),
        source_dir: cli.source_dir.clone(),
    }
}
