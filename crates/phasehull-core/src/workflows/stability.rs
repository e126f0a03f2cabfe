use crate::core::models::entry::Entry;
use crate::engine::config::AnalysisConfig;
use crate::engine::diagram::{EntryStability, PhaseDiagram, system_elements};
use crate::engine::error::HullError;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StabilityReport {
    /// Sorted elements of the chemical system spanned by the references.
    pub elements: Vec<String>,
    /// One row per entry of interest, in input order.
    pub rows: Vec<EntryStability>,
    /// Labels of the reference entries lying on the hull.
    pub stable_references: Vec<String>,
}

impl StabilityReport {
    pub fn stable_rows(&self) -> impl Iterator<Item = &EntryStability> {
        self.rows.iter().filter(|row| row.is_stable)
    }
}

/// Energy above hull per atom for every entry, keyed by entry id (or `#<index>`).
///
/// Values that cannot be determined are `NaN`. An empty `entries` slice yields an
/// empty map without inspecting `references`. Two entries resolving to the same
/// key fail with `DuplicateEntryId`.
pub fn compute_energy_above_hull(
    entries: &[Entry],
    references: &[Entry],
) -> Result<HashMap<String, f64>, HullError> {
    if entries.is_empty() {
        return Ok(HashMap::new());
    }
    check_entries_in_system(entries, &system_elements(references))?;
    check_unique_labels(entries)?;

    let diagram = PhaseDiagram::new(references, &AnalysisConfig::default())?;
    let values = evaluate(&diagram, entries)?;
    Ok(values
        .into_iter()
        .map(|row| (row.id, row.energy_above_hull.unwrap_or(f64::NAN)))
        .collect())
}

#[instrument(skip_all, name = "stability_workflow")]
pub fn run(
    entries: &[Entry],
    references: &[Entry],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<StabilityReport, HullError> {
    let elements = reporter.phase("Resolving references", || system_elements(references));
    check_entries_in_system(entries, &elements)?;
    if references.is_empty() {
        return Ok(StabilityReport::default());
    }
    info!(
        "Analyzing {} entries against {} references in the {}-element system {}.",
        entries.len(),
        references.len(),
        elements.len(),
        elements.join("-")
    );

    let diagram = reporter.phase("Building hull", || PhaseDiagram::new(references, config))?;
    let stable_references: Vec<String> = diagram
        .stable_entries()
        .into_iter()
        .map(|entry| {
            entry
                .id
                .clone()
                .unwrap_or_else(|| entry.composition.to_string())
        })
        .collect();

    let rows = reporter.phase("Evaluating entries", || {
        reporter.report(Progress::TaskStart {
            total_steps: entries.len() as u64,
        });
        let rows = evaluate_with_progress(&diagram, entries, reporter);
        reporter.report(Progress::TaskFinish);
        rows
    })?;

    let stable = rows.iter().filter(|row| row.is_stable).count();
    info!("{} of {} entries are stable.", stable, rows.len());

    Ok(StabilityReport {
        elements,
        rows,
        stable_references,
    })
}

fn check_entries_in_system(entries: &[Entry], elements: &[String]) -> Result<(), HullError> {
    for (index, entry) in entries.iter().enumerate() {
        if let Some(element) = entry.composition.first_element_outside(elements) {
            return Err(HullError::ElementOutsideSystem {
                entry: entry.label(index),
                element: element.to_string(),
            });
        }
    }
    Ok(())
}

fn check_unique_labels(entries: &[Entry]) -> Result<(), HullError> {
    match entries
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.label(index))
        .duplicates()
        .next()
    {
        Some(id) => Err(HullError::DuplicateEntryId { id }),
        None => Ok(()),
    }
}

fn evaluate(diagram: &PhaseDiagram, entries: &[Entry]) -> Result<Vec<EntryStability>, HullError> {
    evaluate_with_progress(diagram, entries, &ProgressReporter::new())
}

fn evaluate_with_progress(
    diagram: &PhaseDiagram,
    entries: &[Entry],
    reporter: &ProgressReporter,
) -> Result<Vec<EntryStability>, HullError> {
    #[cfg(not(feature = "parallel"))]
    let iterator = entries.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = entries.par_iter().enumerate();

    iterator
        .map(|(index, entry)| {
            let row = diagram.analyze(index, entry);
            reporter.report(Progress::TaskIncrement);
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::entries::EntrySet;
    use crate::core::models::composition::Composition;
    use std::sync::Mutex;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn entry(id: &str, pairs: &[(&str, f64)], energy: f64) -> Entry {
        let composition = Composition::new(pairs.iter().map(|&(e, a)| (e, a))).unwrap();
        Entry::new(composition, energy).with_id(id)
    }

    fn al_ni_entries() -> Vec<Entry> {
        vec![
            entry("Al", &[("Al", 1.0)], 0.0),
            entry("Al3Ni", &[("Al", 3.0), ("Ni", 1.0)], -1.0),
            entry("AlNi", &[("Al", 1.0), ("Ni", 1.0)], -1.2),
            entry("AlNi3", &[("Al", 1.0), ("Ni", 3.0)], -0.8),
            entry("Ni", &[("Ni", 1.0)], 0.0),
        ]
    }

    #[test]
    fn binary_map_reports_every_entry() {
        let entries = al_ni_entries();
        let map = compute_energy_above_hull(&entries, &entries).unwrap();
        assert_eq!(map.len(), 5);
        assert!(f64_approx_equal(map["Al"], 0.0));
        assert!(f64_approx_equal(map["Al3Ni"], 0.05));
        assert!(f64_approx_equal(map["AlNi"], 0.0));
        assert!(f64_approx_equal(map["AlNi3"], 0.1));
        assert!(f64_approx_equal(map["Ni"], 0.0));
    }

    #[test]
    fn values_are_never_negative() {
        let references = al_ni_entries();
        let entries = vec![
            entry("deep", &[("Al", 1.0), ("Ni", 1.0)], -3.0),
            entry("Ni-low", &[("Ni", 2.0)], -1.0),
        ];
        let map = compute_energy_above_hull(&entries, &references).unwrap();
        assert!(map.values().all(|&v| v >= 0.0));
        assert_eq!(map["deep"], 0.0);
    }

    #[test]
    fn empty_entries_give_an_empty_map() {
        let too_many: Vec<Entry> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|&el| entry(el, &[(el, 1.0)], 0.0))
            .collect();
        assert!(compute_energy_above_hull(&[], &too_many).unwrap().is_empty());
        assert!(compute_energy_above_hull(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn five_element_reference_set_is_unsupported() {
        let references: Vec<Entry> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|&el| entry(el, &[(el, 1.0)], 0.0))
            .collect();
        let result = compute_energy_above_hull(&references[..1], &references);
        assert_eq!(result, Err(HullError::UnsupportedArity(5)));
    }

    #[test]
    fn entry_outside_reference_system_is_rejected() {
        let references = al_ni_entries();
        let entries = vec![entry("AlCu", &[("Al", 1.0), ("Cu", 1.0)], -1.0)];
        let result = compute_energy_above_hull(&entries, &references);
        assert_eq!(
            result,
            Err(HullError::ElementOutsideSystem {
                entry: "AlCu".into(),
                element: "Cu".into(),
            })
        );

        let result = compute_energy_above_hull(&entries, &[]);
        assert!(matches!(result, Err(HullError::ElementOutsideSystem { .. })));
    }

    #[test]
    fn unavailable_values_are_nan_and_unnamed_entries_use_index() {
        let references = vec![
            entry("Al", &[("Al", 1.0)], 0.0),
            entry("AlNi", &[("Al", 1.0), ("Ni", 1.0)], -1.0),
        ];
        let entries = vec![
            Entry::new(Composition::elemental("Al"), 0.5),
            entry("AlNi3", &[("Al", 1.0), ("Ni", 3.0)], -1.0),
        ];
        let map = compute_energy_above_hull(&entries, &references).unwrap();
        assert!(f64_approx_equal(map["#0"], 0.5));
        assert!(map["AlNi3"].is_nan());
    }

    #[test]
    fn entries_given_only_by_formation_energy_use_that_value() {
        let set = EntrySet::parse(
            r#"
            [[entries]]
            id = "Al"
            energy = -3.0
            composition = { Al = 1 }

            [[entries]]
            id = "Ni"
            energy = -5.0
            composition = { Ni = 1 }

            [[entries]]
            id = "AlNi"
            formation-energy = -0.6
            composition = { Al = 1, Ni = 1 }

            [[entries]]
            id = "Al3Ni"
            formation-energy = -0.25
            composition = { Al = 3, Ni = 1 }
            "#,
            "inline",
        )
        .unwrap();
        let entries = set.into_entries();
        let map = compute_energy_above_hull(&entries, &entries).unwrap();
        assert!(f64_approx_equal(map["Al"], 0.0));
        assert!(f64_approx_equal(map["Ni"], 0.0));
        assert!(f64_approx_equal(map["AlNi"], 0.0));
        assert!(f64_approx_equal(map["Al3Ni"], 0.05));
    }

    #[test]
    fn entries_sharing_an_id_are_rejected() {
        let references = al_ni_entries();
        let entries = vec![
            entry("Fe2O3", &[("Al", 1.0), ("Ni", 1.0)], -1.2),
            entry("Fe2O3", &[("Al", 1.0), ("Ni", 1.0)], -1.0),
        ];
        assert_eq!(
            compute_energy_above_hull(&entries, &references),
            Err(HullError::DuplicateEntryId { id: "Fe2O3".into() })
        );
    }

    #[test]
    fn index_label_colliding_with_an_id_is_rejected() {
        let references = al_ni_entries();
        let entries = vec![
            Entry::new(Composition::elemental("Al"), 0.0),
            entry("#0", &[("Ni", 1.0)], 0.0),
        ];
        assert_eq!(
            compute_energy_above_hull(&entries, &references),
            Err(HullError::DuplicateEntryId { id: "#0".into() })
        );
    }

    #[test]
    fn run_reports_rows_stable_references_and_progress() {
        let references = al_ni_entries();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        let report = run(
            &references,
            &references,
            &AnalysisConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(report.elements, vec!["Al", "Ni"]);
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[1].id, "Al3Ni");
        assert_eq!(report.stable_references, vec!["Al", "AlNi", "Ni"]);
        let stable: Vec<&str> = report.stable_rows().map(|r| r.id.as_str()).collect();
        assert_eq!(stable, vec!["Al", "AlNi", "Ni"]);

        let events = events.into_inner().unwrap();
        let phases: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec!["Resolving references", "Building hull", "Evaluating entries"]
        );
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(increments, 5);
    }

    #[test]
    fn run_with_looser_tolerance_marks_near_hull_entries_stable() {
        let references = al_ni_entries();
        let config = AnalysisConfig {
            stability_tolerance: 0.05 + 1e-6,
            ..AnalysisConfig::default()
        };
        let report = run(&references, &references, &config, &ProgressReporter::new()).unwrap();
        let stable: Vec<&str> = report.stable_rows().map(|r| r.id.as_str()).collect();
        assert_eq!(stable, vec!["Al", "Al3Ni", "AlNi", "Ni"]);
    }

    #[test]
    fn run_without_references_or_entries_is_empty() {
        let report = run(&[], &[], &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(report, StabilityReport::default());
    }
}
