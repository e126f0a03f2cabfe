//! # Geometry Module
//!
//! Coordinate mapping and hyperplane primitives shared by the hull builders.
//!
//! - [`barycentric`] - Composition to Euclidean coordinates on the reference triangle
//!   (ternary) or regular tetrahedron (quaternary)
//! - [`plane`] - Oriented hyperplanes, generalized normals and affine spans in any
//!   dimension

pub mod barycentric;
pub mod plane;
