use crate::core::models::entry::Entry;
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::{debug, trace};

/// Lowest-energy pure-element entry per element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    references: BTreeMap<String, Entry>,
}

impl ReferenceTable {
    pub fn get(&self, element: &str) -> Option<&Entry> {
        self.references.get(element)
    }

    /// Corrected energy per atom of the reference for `element`.
    pub fn energy_per_atom(&self, element: &str) -> Option<f64> {
        self.get(element).and_then(Entry::corrected_energy_per_atom)
    }

    pub fn contains(&self, element: &str) -> bool {
        self.references.contains_key(element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.references.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.references.iter().map(|(el, entry)| (el.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Picks, for every element that has at least one pure-element entry, the entry
/// with the lowest corrected energy per atom.
///
/// Ties keep the entry seen first. Entries without a finite corrected energy per
/// atom are never chosen.
pub fn resolve_references(entries: &[Entry]) -> ReferenceTable {
    let mut references: BTreeMap<String, Entry> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.composition.is_elemental()) {
        let Some(element) = entry.composition.elements().next() else {
            continue;
        };
        let Some(energy) = entry.corrected_energy_per_atom().filter(|e| e.is_finite()) else {
            trace!(element, "Skipping elemental entry without a finite energy");
            continue;
        };

        match references.entry(element.to_string()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry.clone());
            }
            btree_map::Entry::Occupied(mut slot) => {
                if slot
                    .get()
                    .corrected_energy_per_atom()
                    .is_none_or(|current| energy < current)
                {
                    slot.insert(entry.clone());
                }
            }
        }
    }

    debug!(count = references.len(), "Resolved elemental references");
    ReferenceTable { references }
}

/// Formation energy per atom of `entry` relative to `references`.
///
/// `None` when the entry has no finite corrected energy or any constituent
/// element lacks a reference.
pub fn compute_formation_energy(entry: &Entry, references: &ReferenceTable) -> Option<f64> {
    let energy = entry.corrected_energy_per_atom().filter(|e| e.is_finite())?;
    let composition = &entry.composition;
    let mut reference_energy = 0.0;
    for (element, _) in composition.iter() {
        reference_energy += composition.fraction(element) * references.energy_per_atom(element)?;
    }
    Some(energy - reference_energy)
}

/// The computed formation energy, or the entry's precomputed value when it
/// cannot be computed from `references` (including entries given only by their
/// formation energy).
pub fn resolve_formation_energy(entry: &Entry, references: &ReferenceTable) -> Option<f64> {
    compute_formation_energy(entry, references).or(entry.formation_energy)
}
