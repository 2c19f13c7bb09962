//! Catalog validation command implementation.

use super::CliError;
use deepfield::config::MAX_DEPTH;
use deepfield::game::{Board, BodyDefinition};
use deepfield::{BodyCatalog, GameConfig};
use std::fs;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a usable catalog.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;

    println!("Validating: {}", path.display());
    println!();

    let parsed = serde_json::from_str::<Vec<BodyDefinition>>(&text);
    print_check("JSON catalog array", parsed.is_ok());
    let definitions = parsed.map_err(|e| CliError::new(format!("Not a catalog: {e}")))?;

    let catalog = BodyCatalog::from_definitions(definitions);
    print_check("Unique types and well-formed shapes", catalog.is_ok());
    let catalog = catalog?;

    // Every body should fit somewhere on the deepest stock board.
    let config = GameConfig::default();
    let board = Board::new(config.width, config.height, MAX_DEPTH)
        .ok_or_else(|| CliError::new("default board has no cells"))?;
    let mut unplaceable = Vec::new();
    for definition in catalog.iter() {
        let fits = board.cells().iter().any(|cell| {
            (0..4).any(|rotation| board.can_place(&definition.shape, cell.coord, rotation))
        });
        if !fits {
            unplaceable.push(definition.name.clone());
        }
    }
    print_check(
        &format!("Fits a {}x{}x{MAX_DEPTH} board", config.width, config.height),
        unplaceable.is_empty(),
    );
    if !unplaceable.is_empty() {
        return Err(CliError::new(format!(
            "Cannot be placed on a default board: {}",
            unplaceable.join(", ")
        )));
    }

    println!();
    println!("Summary:");
    println!("  Entries:      {}", catalog.len());
    println!(
        "  Powers:       {}",
        catalog
            .iter()
            .map(|d| d.placement_powers.len() + d.colonization_powers.len())
            .sum::<usize>()
    );
    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
