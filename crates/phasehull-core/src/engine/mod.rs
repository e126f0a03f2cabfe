//! # Engine Module
//!
//! Stability analysis built on the geometric foundation in [`crate::core`].
//!
//! A [`diagram::PhaseDiagram`] is constructed once per chemical system from a set of
//! reference entries. Construction resolves the lowest-energy pure-element
//! references ([`references`]), turns every reference entry into a hull point and
//! builds the lower envelope appropriate for the system size. The resulting
//! envelope models ([`query`]) answer energy-above-hull queries for any entry
//! within the system.
//!
//! - **Configuration** ([`config`]) - stability tolerance and hull-build parameters
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events
//! - **Error Handling** ([`error`]) - the error taxonomy of the analysis

pub mod config;
pub mod diagram;
pub mod error;
pub mod progress;
pub mod query;
pub mod references;
