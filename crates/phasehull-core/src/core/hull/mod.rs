//! # Convex Hull Module
//!
//! Hull construction for stability envelopes in two to four dimensions.
//!
//! - [`lower2d`] - Exact monotone-chain lower hull for binary systems
//! - [`quickhull`] - Generalized Quickhull for 3D (ternary) and 4D (quaternary) points
//! - [`facet`] - Immutable output faces and the lower-hull filter
//!
//! The binary case is deliberately kept separate from Quickhull: a single
//! composition coordinate needs none of the higher-dimensional machinery.
//!
//! ```ignore
//! use phasehull::core::hull::{facet::lower_hull_faces, quickhull::build_hull_3d};
//!
//! let envelope = lower_hull_faces(build_hull_3d(&points));
//! ```

pub mod facet;
pub mod lower2d;
pub mod quickhull;
