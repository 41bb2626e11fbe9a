//! Run configuration.
//!
//! Every setting resolves as: command-line flag, then environment variable
//! (both handled by clap), then the YAML config file, then the built-in default.
//!
//! ```yaml
//! input_dir: ./downloads
//! output: sflux_air.ww3.nc
//! extension: nc
//! variables:
//!   era5:
//!     uwind: u10
//!     vwind: v10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use wind_archive::{ArchiveSource, MergeJob, VariableOverrides};

/// Contents of a YAML config file. All keys are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub extension: Option<String>,
    #[serde(default)]
    pub variables: ArchiveVariables,
}

/// Per-archive variable-name overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveVariables {
    pub era5: Option<VariableOverrides>,
    pub cfsr: Option<VariableOverrides>,
    pub gfs: Option<VariableOverrides>,
}

impl ArchiveVariables {
    pub fn for_source(&self, source: ArchiveSource) -> Option<&VariableOverrides> {
        match source {
            ArchiveSource::Era5 => self.era5.as_ref(),
            ArchiveSource::Cfsr => self.cfsr.as_ref(),
            ArchiveSource::Gfs => self.gfs.as_ref(),
        }
    }
}

impl FileConfig {
    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Settings given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliSettings {
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub extension: Option<String>,
}

/// Build the merge job for `source` from all configuration layers.
pub fn resolve(source: ArchiveSource, cli: CliSettings, file: Option<FileConfig>) -> MergeJob {
    let file = file.unwrap_or_default();
    let mut job = MergeJob::new(source);

    if let Some(dir) = cli.input_dir.or(file.input_dir) {
        job = job.with_input_dir(dir);
    }
    if let Some(output) = cli.output.or(file.output) {
        job = job.with_output(output);
    }
    if let Some(extension) = cli.extension.or(file.extension) {
        job = job.with_extension(extension.trim_start_matches('.').to_string());
    }
    if let Some(overrides) = file.variables.for_source(source) {
        let variables = source.default_variables().with_overrides(overrides);
        job = job.with_variables(variables);
    }
    job
}
