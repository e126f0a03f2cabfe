use super::composition::Composition;
use serde::Deserialize;

/// A computed (or measured) phase: a composition and its energy.
///
/// `energy` is the raw total energy of the composition as written. When
/// `energy_per_atom` is present it takes precedence over `energy / atoms`. The
/// optional `correction` is additive in total-energy units, so it contributes
/// `correction / atoms` to the energy per atom.
///
/// An entry may carry only a precomputed `formation_energy`; it then has no
/// corrected energy and cannot serve as an elemental reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    pub composition: Composition,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub energy_per_atom: Option<f64>,
    #[serde(default)]
    pub formation_energy: Option<f64>,
    #[serde(default)]
    pub correction: Option<f64>,
}

impl Entry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        Self {
            id: None,
            composition,
            energy: Some(energy),
            energy_per_atom: None,
            formation_energy: None,
            correction: None,
        }
    }

    /// An entry known only by its formation energy per atom.
    pub fn from_formation_energy(composition: Composition, formation_energy: f64) -> Self {
        Self {
            id: None,
            composition,
            energy: None,
            energy_per_atom: None,
            formation_energy: Some(formation_energy),
            correction: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_energy_per_atom(mut self, energy_per_atom: f64) -> Self {
        self.energy_per_atom = Some(energy_per_atom);
        self
    }

    pub fn with_formation_energy(mut self, formation_energy: f64) -> Self {
        self.formation_energy = Some(formation_energy);
        self
    }

    pub fn with_correction(mut self, correction: f64) -> Self {
        self.correction = Some(correction);
        self
    }

    /// Total energy including the correction, `None` without a raw energy.
    pub fn corrected_energy(&self) -> Option<f64> {
        let raw = match self.energy_per_atom {
            Some(per_atom) => per_atom * self.composition.num_atoms(),
            None => self.energy?,
        };
        Some(raw + self.correction.unwrap_or(0.0))
    }

    pub fn corrected_energy_per_atom(&self) -> Option<f64> {
        self.corrected_energy()
            .map(|energy| energy / self.composition.num_atoms())
    }

    /// Whether the entry supplies any energy at all.
    pub fn has_energy(&self) -> bool {
        self.energy.is_some() || self.energy_per_atom.is_some() || self.formation_energy.is_some()
    }

    /// Identifier used in result maps: the entry id, or `#<index>` when absent.
    pub fn label(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("#{index}"))
    }
}
