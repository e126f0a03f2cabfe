//! # Workflows Module
//!
//! High-level entry points that take entries of interest plus a reference set
//! and return stability results, hiding the construction of the underlying
//! [`PhaseDiagram`](crate::engine::diagram::PhaseDiagram).
//!
//! - **Stability Workflow** ([`stability`]) - energy above hull for every entry,
//!   either as a plain id → value map or as a full report with progress events.

pub mod stability;
