//! # Collection of Basic Data Structures
//!
//! - `storage`: Arena-based storage for the entities of a function
//!   description.

pub mod storage;
