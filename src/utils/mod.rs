//! # General Utilities
//!
//! Graph algorithms over any control flow graph: the nodes only need to
//! implement [cfg::CfgNode], and the region (a function) [cfg::CfgRegion].

pub mod cfg;
pub mod dfs;
pub mod dominance;
pub mod loop_info;
