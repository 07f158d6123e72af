use super::{BlockData, Func, FuncData, InstData};
use crate::collections::storage::BaseArena;

/// The context of the IR.
///
/// A context is the container of every block, instruction and function of
/// the described program. Handles ([super::Block], [Func], [super::Inst]) are only
/// meaningful together with the context that allocated them.
///
/// The context holds plain owned data, so one context can be shared by
/// reference across threads that analyze different functions.
#[derive(Default)]
pub struct Context {
    /// The storage of blocks.
    pub(super) blocks: BaseArena<BlockData>,
    /// The storage of instructions.
    pub(super) insts: BaseArena<InstData>,
    /// The storage of functions.
    pub(super) funcs: BaseArena<FuncData>,
}

impl Context {
    pub fn new() -> Self { Self::default() }

    /// All functions, in creation order.
    pub fn funcs(&self) -> Vec<Func> { self.funcs.iter().map(|(_, data)| data.self_ptr()).collect() }
}
