use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompositionError {
    #[error("Composition must contain at least one element")]
    Empty,
    #[error("Invalid amount {amount} for element '{element}': amounts must be finite and positive")]
    InvalidAmount { element: String, amount: f64 },
}

/// A chemical composition: element symbols mapped to strictly positive amounts.
///
/// Amounts are relative and need not sum to one. Iteration order is always the
/// alphabetical order of the element symbols, so two compositions built from the
/// same pairs in a different order are equal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    /// Builds a composition, rejecting empty input and non-positive or non-finite
    /// amounts. Repeated symbols accumulate.
    pub fn new<I, S>(pairs: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut amounts: BTreeMap<String, f64> = BTreeMap::new();
        for (element, amount) in pairs {
            let element = element.into();
            if !amount.is_finite() || amount <= 0.0 {
                return Err(CompositionError::InvalidAmount { element, amount });
            }
            *amounts.entry(element).or_insert(0.0) += amount;
        }
        if amounts.is_empty() {
            return Err(CompositionError::Empty);
        }
        Ok(Self { amounts })
    }

    /// A single-element composition with one atom.
    pub fn elemental(element: impl Into<String>) -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(element.into(), 1.0);
        Self { amounts }
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(el, &amount)| (el.as_str(), amount))
    }

    pub fn num_elements(&self) -> usize {
        self.amounts.len()
    }

    /// Amount of `element`, or zero when the element is absent.
    pub fn amount(&self, element: &str) -> f64 {
        self.amounts.get(element).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, element: &str) -> bool {
        self.amounts.contains_key(element)
    }

    /// Total number of atoms, i.e. the sum of all amounts.
    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Atomic fraction of `element` relative to the whole composition.
    pub fn fraction(&self, element: &str) -> f64 {
        self.amount(element) / self.num_atoms()
    }

    pub fn is_elemental(&self) -> bool {
        self.amounts.len() == 1
    }

    /// Returns the first element of this composition missing from `elements`.
    pub fn first_element_outside<S: AsRef<str>>(&self, elements: &[S]) -> Option<&str> {
        self.elements()
            .find(|el| !elements.iter().any(|candidate| candidate.as_ref() == *el))
    }

    pub fn is_subset_of<S: AsRef<str>>(&self, elements: &[S]) -> bool {
        self.first_element_outside(elements).is_none()
    }
}

impl TryFrom<BTreeMap<String, f64>> for Composition {
    type Error = CompositionError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, amount) in &self.amounts {
            if (amount - 1.0).abs() < f64::EPSILON {
                write!(f, "{element}")?;
            } else {
                write!(f, "{element}{amount}")?;
            }
        }
        Ok(())
    }
}
