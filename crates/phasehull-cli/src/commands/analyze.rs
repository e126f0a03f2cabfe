use super::load_entries;
use crate::cli::AnalyzeArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use phasehull::{engine::progress::ProgressReporter, workflows};
use std::io;
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let entries = load_entries(&app.input_path)?;
    let references = match &app.references_path {
        Some(path) => load_entries(path)?,
        None => entries.clone(),
    };
    if entries.is_empty() {
        warn!("Entry set {:?} is empty; nothing to analyze.", app.input_path);
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core stability workflow...");
    let stability =
        workflows::stability::run(&entries, &references, &app.core_config, &reporter)?;

    report::write_table(
        io::stdout().lock(),
        &stability,
        app.precision,
        app.stable_only,
    )?;
    println!(
        "{} of {} entries lie on the hull.",
        stability.stable_rows().count(),
        stability.rows.len()
    );

    if let Some(path) = &app.output_path {
        report::write_csv_file(path, &stability, app.precision, app.stable_only)?;
        info!("Report written to {:?}", path);
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}
