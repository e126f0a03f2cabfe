//! # I/O Module
//!
//! Loading of entry sets. The engine itself never touches the filesystem; this
//! module exists so front ends can hand it in-memory entries.
//!
//! - [`entries`] - TOML entry-set files (`[[entries]]` tables)

pub mod entries;
