//! Catalog listing command implementation.

use super::{load_catalog, output, CliError, OutputFormat};
use std::path::PathBuf;

/// Execute the catalog command.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be loaded.
pub(crate) fn execute(file: Option<PathBuf>, format: OutputFormat) -> Result<(), CliError> {
    let catalog = load_catalog(file.as_deref())?;

    match format {
        OutputFormat::Text => print!("{}", output::format_catalog(&catalog)),
        OutputFormat::Json => println!("{}", catalog.to_json_string()?),
    }

    Ok(())
}
