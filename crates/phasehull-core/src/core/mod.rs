//! # Core Module
//!
//! Fundamental building blocks of the stability engine.
//!
//! - **Chemical Data** ([`models`]) - Validated compositions and energy entries
//! - **Geometry** ([`geometry`]) - Barycentric simplex mapping and hyperplanes
//! - **Convex Hulls** ([`hull`]) - Monotone-chain lower hull and generalized Quickhull
//! - **File I/O** ([`io`]) - Loading entry sets from TOML
//!
//! Nothing in this layer holds state between calls; every function maps immutable
//! inputs to fresh outputs.

pub mod geometry;
pub mod hull;
pub mod io;
pub mod models;

/// Distance below which two geometric quantities are treated as equal.
///
/// Governs degeneracy detection in the hull builders and the "strictly in front of
/// a face" test. Changing it changes which points are classified as on the hull.
pub const EPSILON: f64 = 1e-9;

/// Lower bound accepted for barycentric weights when testing containment, so that
/// points on a shared face boundary are not lost to round-off.
pub const BARYCENTRIC_SLACK: f64 = -1e-9;
