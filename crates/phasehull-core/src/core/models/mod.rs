//! # Core Models Module
//!
//! Data structures describing the chemical input of a stability analysis.
//!
//! - [`composition`] - Element to amount maps with validated, positive amounts
//! - [`entry`] - A composition together with its energies, correction and identifier
//!
//! ```ignore
//! use phasehull::core::models::{composition::Composition, entry::Entry};
//!
//! let composition = Composition::new([("Al", 1.0), ("Ni", 1.0)])?;
//! let entry = Entry::new(composition, -1.2).with_id("AlNi");
//! assert_eq!(entry.corrected_energy_per_atom(), Some(-0.6));
//! ```

pub mod composition;
pub mod entry;
