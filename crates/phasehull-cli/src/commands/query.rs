use super::load_entries;
use crate::cli::QueryArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use phasehull::engine::config::AnalysisConfig;
use phasehull::engine::diagram::PhaseDiagram;
use tracing::info;

const DEFAULT_PRECISION: usize = 4;

/// Hull formation energy at the requested composition, or `None` when no part of
/// the envelope covers it.
pub fn hull_energy(args: &QueryArgs) -> Result<Option<f64>> {
    let composition = parser::parse_composition(&args.composition)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let references = load_entries(&args.input)?;

    let diagram = PhaseDiagram::new(&references, &AnalysisConfig::default())?;
    info!(
        "Querying the {}-element hull at {}.",
        diagram.elements().len(),
        composition
    );
    Ok(diagram.hull_energy_at(&composition)?)
}

pub fn run(args: QueryArgs) -> Result<()> {
    let precision = args.precision.unwrap_or(DEFAULT_PRECISION);
    match hull_energy(&args)? {
        Some(energy) => println!(
            "Hull formation energy at {}: {:.*} per atom",
            args.composition, precision, energy
        ),
        None => println!("No hull value available at {}.", args.composition),
    }
    Ok(())
}
