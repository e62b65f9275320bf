//! Command line arguments and the JSON dashboard configuration.

use crate::data::{MappingOptions, SourceFormat};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Interactive dashboard for Likert-scale questionnaire data (CSV or Excel).
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// (file path, optional) Questionnaire file to load at startup.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Declared format of the questionnaire file. Inferred from the extension when absent.
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,

    /// Number of leading Excel columns holding respondent identifiers.
    #[arg(long)]
    pub identifier_columns: Option<usize>,

    /// Turn on debug logging.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub identifier_columns: usize,
    pub warn_on_dropped_columns: bool,
    pub preview_rows: usize,
    pub default_format: SourceFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            identifier_columns: 1,
            warn_on_dropped_columns: true,
            preview_rows: 5,
            default_format: SourceFormat::Csv,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Defaults, then the config file, then command line flags.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(n) = args.identifier_columns {
            config.identifier_columns = n;
        }
        if let Some(format) = args.format {
            config.default_format = format;
        }
        Ok(config)
    }

    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            identifier_columns: self.identifier_columns,
            warn_on_dropped_columns: self.warn_on_dropped_columns,
        }
    }
}
