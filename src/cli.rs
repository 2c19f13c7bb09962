//! CLI command implementations for Deepfield.

pub(crate) mod catalog;
pub(crate) mod play;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use deepfield::{BodyCatalog, CatalogError, ConfigError, ScenarioError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `catalog` and `play` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load a catalog file, or the stock catalog when none is given.
fn load_catalog(file: Option<&Path>) -> Result<BodyCatalog, CliError> {
    match file {
        Some(path) => BodyCatalog::load(path)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display()))),
        None => Ok(BodyCatalog::standard()),
    }
}
