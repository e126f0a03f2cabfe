//! # phasehull Core Library
//!
//! A phase-stability engine: given chemical-composition entries with energies, it
//! determines which compositions are thermodynamically stable and, for the unstable
//! ones, how far their formation energy lies above the lower convex hull.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Composition`, `Entry`),
//!   simplex coordinate mapping, hyperplane geometry, and the hull builders
//!   (monotone chain for binaries, generalized Quickhull in 3D and 4D).
//!
//! - **[`engine`]: The Logic Core.** Reference resolution, formation energies, hull
//!   interpolation models, and the `PhaseDiagram` that dispatches on the arity of
//!   the chemical system.
//!
//! - **[`workflows`]: The Public API.** End-to-end stability analysis over a set of
//!   entries of interest and a set of reference entries.
//!
//! Every computation is pure and synchronous. A `PhaseDiagram` is read-only once
//! built and can be shared across threads freely.

pub mod core;
pub mod engine;
pub mod workflows;
