use super::config::AnalysisConfig;
use super::error::HullError;
use super::query::{HullCellModel, HullFaceModel, interpolate_chain, query_hull_energy};
use super::references::{ReferenceTable, resolve_formation_energy, resolve_references};
use crate::core::geometry::barycentric::{
    TETRAHEDRON_VERTICES, TRIANGLE_VERTICES, quaternary_coordinates, ternary_coordinates,
};
use crate::core::hull::facet::lower_hull_faces;
use crate::core::hull::lower2d::build_lower_hull_2d;
use crate::core::hull::quickhull::build_hull;
use crate::core::models::composition::Composition;
use crate::core::models::entry::Entry;
use itertools::Itertools;
use nalgebra::{Point2, Point3, Point4};
use tracing::{debug, instrument, warn};

/// Lower-envelope representation for a chemical system, chosen by its arity.
#[derive(Debug, Clone)]
pub enum HullModel {
    /// One element: the envelope is the zero formation-energy level.
    Unary,
    /// Lower chain of `(fraction of second element, formation energy)` points.
    Binary { chain: Vec<Point2<f64>> },
    Ternary { faces: Vec<HullFaceModel> },
    Quaternary { cells: Vec<HullCellModel> },
}

impl HullModel {
    pub fn arity(&self) -> usize {
        match self {
            HullModel::Unary => 1,
            HullModel::Binary { .. } => 2,
            HullModel::Ternary { .. } => 3,
            HullModel::Quaternary { .. } => 4,
        }
    }

    /// Number of envelope pieces (chain segments, faces or cells).
    pub fn num_pieces(&self) -> usize {
        match self {
            HullModel::Unary => 0,
            HullModel::Binary { chain } => chain.len().saturating_sub(1),
            HullModel::Ternary { faces } => faces.len(),
            HullModel::Quaternary { cells } => cells.len(),
        }
    }
}

/// Stability verdict for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStability {
    pub id: String,
    pub formation_energy: Option<f64>,
    pub energy_above_hull: Option<f64>,
    pub is_stable: bool,
}

/// Sorted, de-duplicated union of the elements of `entries`.
pub fn system_elements(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.composition.elements())
        .sorted()
        .dedup()
        .map(str::to_string)
        .collect()
}

/// The lower convex envelope of one chemical system, built once from its
/// reference entries and queried for any number of entries afterwards.
#[derive(Debug, Clone)]
pub struct PhaseDiagram {
    elements: Vec<String>,
    references: ReferenceTable,
    entries: Vec<Entry>,
    model: HullModel,
    config: AnalysisConfig,
}

impl PhaseDiagram {
    #[instrument(skip_all, name = "phase_diagram", fields(entries = reference_entries.len()))]
    pub fn new(reference_entries: &[Entry], config: &AnalysisConfig) -> Result<Self, HullError> {
        let elements = system_elements(reference_entries);
        if elements.len() > 4 {
            return Err(HullError::UnsupportedArity(elements.len()));
        }

        let references = resolve_references(reference_entries);
        let model = if elements.is_empty() {
            // Every composition lies outside an empty system, so this is never queried.
            HullModel::Unary
        } else {
            build_model(&elements, &references, reference_entries, config)?
        };
        debug!(
            arity = elements.len(),
            pieces = model.num_pieces(),
            "Built phase diagram"
        );

        Ok(Self {
            elements,
            references,
            entries: reference_entries.to_vec(),
            model,
            config: config.clone(),
        })
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }

    pub fn model(&self) -> &HullModel {
        &self.model
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fails with `ElementOutsideSystem` unless every element of `composition`
    /// belongs to this system.
    fn check_in_system(
        &self,
        composition: &Composition,
        label: impl FnOnce() -> String,
    ) -> Result<(), HullError> {
        match composition.first_element_outside(&self.elements) {
            Some(element) => Err(HullError::ElementOutsideSystem {
                entry: label(),
                element: element.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Envelope formation energy at `composition`.
    ///
    /// `Ok(None)` when no envelope piece covers the composition.
    pub fn hull_energy_at(&self, composition: &Composition) -> Result<Option<f64>, HullError> {
        self.check_in_system(composition, || composition.to_string())?;
        self.envelope_energy(composition)
    }

    fn envelope_energy(&self, composition: &Composition) -> Result<Option<f64>, HullError> {
        let energy = match &self.model {
            HullModel::Unary => Some(0.0),
            HullModel::Binary { chain } => {
                interpolate_chain(chain, composition.fraction(&self.elements[1]))
            }
            HullModel::Ternary { faces } => {
                let point = ternary_coordinates(composition, &self.elements)?;
                query_hull_energy(faces, &point)
            }
            HullModel::Quaternary { cells } => {
                let point = quaternary_coordinates(composition, &self.elements)?;
                query_hull_energy(cells, &point)
            }
        };
        Ok(energy)
    }

    /// Energy above the hull per atom, floored at zero.
    ///
    /// `Ok(None)` when either the entry's formation energy or the envelope value at
    /// its composition is unavailable.
    pub fn energy_above_hull(&self, entry: &Entry) -> Result<Option<f64>, HullError> {
        self.check_in_system(&entry.composition, || entry_label(entry))?;
        let Some(formation) = resolve_formation_energy(entry, &self.references) else {
            return Ok(None);
        };
        let Some(hull) = self.envelope_energy(&entry.composition)? else {
            return Ok(None);
        };
        Ok(Some(floor_at_zero(formation - hull)))
    }

    pub fn analyze(&self, index: usize, entry: &Entry) -> Result<EntryStability, HullError> {
        let energy_above_hull = self.energy_above_hull(entry)?;
        Ok(EntryStability {
            id: entry.label(index),
            formation_energy: resolve_formation_energy(entry, &self.references),
            is_stable: energy_above_hull.is_some_and(|e| e <= self.config.stability_tolerance),
            energy_above_hull,
        })
    }

    /// Reference entries lying on the envelope within the stability tolerance.
    pub fn stable_entries(&self) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(
                    self.energy_above_hull(entry),
                    Ok(Some(e)) if e <= self.config.stability_tolerance
                )
            })
            .collect()
    }
}

fn entry_label(entry: &Entry) -> String {
    entry
        .id
        .clone()
        .unwrap_or_else(|| entry.composition.to_string())
}

#[inline]
fn floor_at_zero(value: f64) -> f64 {
    if value < 0.0 { 0.0 } else { value }
}

/// Formation energies of the reference entries, skipping those without one.
fn hull_inputs<'a>(
    entries: &'a [Entry],
    references: &'a ReferenceTable,
) -> impl Iterator<Item = (&'a Entry, f64)> + 'a {
    entries.iter().enumerate().filter_map(move |(index, entry)| {
        match resolve_formation_energy(entry, references) {
            Some(formation) if formation.is_finite() => Some((entry, formation)),
            _ => {
                warn!(
                    entry = %entry.label(index),
                    "No formation energy available, leaving entry out of the hull"
                );
                None
            }
        }
    })
}

/// Energy of the synthetic apex placed above every hull point at the simplex
/// centroid. It closes the point set into a full-dimensional body, so a system
/// whose points all share one plane still has a lower envelope.
fn lid_energy<'a>(energies: impl Iterator<Item = &'a f64>) -> f64 {
    energies.copied().fold(0.0, f64::max) + 1.0
}

fn build_model(
    elements: &[String],
    references: &ReferenceTable,
    entries: &[Entry],
    config: &AnalysisConfig,
) -> Result<HullModel, HullError> {
    let missing: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, el)| !references.contains(el))
        .map(|(i, _)| i)
        .collect();
    if !missing.is_empty() {
        debug!(?missing, "Adding zero-energy corners for elements without a reference");
    }

    let model = match elements.len() {
        1 => HullModel::Unary,
        2 => {
            let mut points: Vec<Point2<f64>> = hull_inputs(entries, references)
                .map(|(entry, formation)| {
                    Point2::new(entry.composition.fraction(&elements[1]), formation)
                })
                .collect();
            points.extend(missing.iter().map(|&i| Point2::new(i as f64, 0.0)));
            HullModel::Binary {
                chain: build_lower_hull_2d(&points),
            }
        }
        3 => {
            let mut points = Vec::new();
            for (entry, formation) in hull_inputs(entries, references) {
                let p = ternary_coordinates(&entry.composition, elements)?;
                points.push(Point3::new(p.x, p.y, formation));
            }
            points.extend(missing.iter().map(|&i| {
                let [x, y] = TRIANGLE_VERTICES[i];
                Point3::new(x, y, 0.0)
            }));
            let lid = lid_energy(points.iter().map(|p| &p.z));
            points.push(Point3::new(0.5, TRIANGLE_VERTICES[1][1] / 3.0, lid));

            let faces = lower_hull_faces(build_hull(&points, config.simplex_sample_threshold));
            HullModel::Ternary {
                faces: faces.iter().filter_map(HullFaceModel::new).collect(),
            }
        }
        4 => {
            let mut points = Vec::new();
            for (entry, formation) in hull_inputs(entries, references) {
                let p = quaternary_coordinates(&entry.composition, elements)?;
                points.push(Point4::new(p.x, p.y, p.z, formation));
            }
            points.extend(missing.iter().map(|&i| {
                let [x, y, z] = TETRAHEDRON_VERTICES[i];
                Point4::new(x, y, z, 0.0)
            }));
            let lid = lid_energy(points.iter().map(|p| &p.w));
            let centroid = tetrahedron_centroid();
            points.push(Point4::new(centroid[0], centroid[1], centroid[2], lid));

            let cells = lower_hull_faces(build_hull(&points, config.simplex_sample_threshold));
            HullModel::Quaternary {
                cells: cells.iter().filter_map(HullCellModel::new).collect(),
            }
        }
        n => return Err(HullError::UnsupportedArity(n)),
    };
    Ok(model)
}

fn tetrahedron_centroid() -> [f64; 3] {
    let mut centroid = [0.0; 3];
    for vertex in &TETRAHEDRON_VERTICES {
        for (c, v) in centroid.iter_mut().zip(vertex) {
            *c += v / 4.0;
        }
    }
    centroid
}
