//! Output formatting utilities for CLI.

use deepfield::game::{seat_label, PowerTiming};
use deepfield::scenario::ScenarioReport;
use deepfield::BodyCatalog;

const fn timing_label(timing: PowerTiming) -> &'static str {
    match timing {
        PowerTiming::OffensiveFaceUp => "offensive",
        PowerTiming::DefensiveFaceDown => "defensive",
        PowerTiming::PassiveUpkeep => "passive",
    }
}

/// Format a catalog as a human-readable listing.
pub(super) fn format_catalog(catalog: &BodyCatalog) -> String {
    let mut output = String::new();

    output.push_str(&format!("Body Catalog ({} entries)\n\n", catalog.len()));
    for definition in catalog.iter() {
        output.push_str(&format!(
            "  {:<14} price {:>2}  cells {:>2}  capacity {:>2}  near-miss {:?}\n",
            definition.name,
            definition.price,
            definition.shape.len(),
            definition.capacity,
            definition.near_miss
        ));
        if !definition.summary.is_empty() {
            output.push_str(&format!("    {}\n", definition.summary));
        }
        for power in &definition.placement_powers {
            output.push_str(&format!(
                "    on placement: {} ({})\n",
                power.name,
                timing_label(power.timing)
            ));
        }
        for power in &definition.colonization_powers {
            output.push_str(&format!(
                "    on colonization: {} ({})\n",
                power.name,
                timing_label(power.timing)
            ));
        }
    }

    output
}

/// Format a scenario report as human-readable text.
pub(super) fn format_report(report: &ScenarioReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Scenario Result (seed: {})\n", report.seed));
    for step in &report.steps {
        let actor = step.player.map_or('-', seat_label);
        output.push_str(&format!(
            "  {:>3}. [{actor}] {:<18} {}\n",
            step.step + 1,
            step.action,
            step.outcome
        ));
    }
    output.push('\n');

    output.push_str(&format!("  Phase: {}\n", report.phase));
    if let Some(winner) = report.winner {
        output.push_str(&format!("  Winner: Player {}\n", seat_label(winner)));
    } else {
        output.push_str("  Winner: none yet\n");
    }
    output.push('\n');

    for player in &report.players {
        output.push_str(&format!(
            "  Player {}: {} currency, {}/{} bodies colonized, {} false reports",
            player.seat, player.currency, player.colonized, player.bodies, player.false_report_tokens
        ));
        if player.eliminated {
            output.push_str(" [eliminated]");
        }
        output.push('\n');
        if !player.powers.is_empty() {
            output.push_str(&format!("    powers: {}\n", player.powers.join(", ")));
        }
    }

    output
}
