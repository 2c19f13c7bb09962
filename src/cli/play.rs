//! Scenario playback command implementation.

use super::{load_catalog, output, CliError, OutputFormat};
use deepfield::scenario::Scenario;
use deepfield::GameConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if any input file cannot be loaded or the scenario is
/// invalid for its table.
pub(crate) fn execute(
    scenario: &Path,
    config: Option<PathBuf>,
    catalog: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = match config {
        Some(path) => GameConfig::load(&path)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?,
        None => GameConfig::default(),
    };
    let catalog = Arc::new(load_catalog(catalog.as_deref())?);
    let script = Scenario::load(scenario)
        .map_err(|e| CliError::new(format!("{}: {e}", scenario.display())))?;

    info!(
        scenario = %scenario.display(),
        players = script.players,
        actions = script.actions.len(),
        "playing scenario"
    );
    let report = script.run(config, catalog)?;

    match format {
        OutputFormat::Text => print!("{}", output::format_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
