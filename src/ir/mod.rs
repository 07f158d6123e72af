//! # Function Description
//!
//! The immutable description of a function handed to the analyses: an ordered
//! list of blocks, each holding an ordered list of instructions. Only two
//! things matter to the analyses: which instructions define a named storage
//! location (see [DefSite]) and which blocks a branch-like instruction may
//! transfer control to.

mod block;
mod context;
mod func;
mod inst;

pub mod passes;
pub mod passman;

pub use block::{Block, BlockData};
pub use context::Context;
pub use func::{Func, FuncData};
pub use inst::{DefSite, Inst, InstData, InstKind, Operand};
