//! # Analyses on the Function Description
//!
//! - `def_catalog`: number the definitions and index them by variable.
//! - `gen_kill`: per-block GEN/KILL sets.
//! - `reaching_defs`: per-block IN/OUT sets.
//! - `rda`: run everything, including dominance and loop detection from
//!   [crate::utils], and bundle the results.

pub mod def_catalog;
pub mod gen_kill;
pub mod rda;
pub mod reaching_defs;
