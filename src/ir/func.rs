use std::fmt;

use super::{Block, Context};
use crate::{
    collections::storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    impl_arena,
    utils::cfg::CfgRegion,
};

/// The data of a function.
///
/// A function is an ordered list of blocks; the first block is the entry of
/// the control flow graph.
pub struct FuncData {
    self_ptr: Func,
    /// The name of the function.
    name: String,
    /// The block layout of the function.
    blocks: Vec<Block>,
}

impl FuncData {
    pub fn self_ptr(&self) -> Func { self.self_ptr }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Func(BaseArenaPtr<FuncData>);

impl_arena!(Context, FuncData, Func, funcs);

impl Func {
    pub fn new(ctx: &mut Context, name: impl Into<String>) -> Func {
        ctx.alloc_with(|self_ptr| FuncData {
            self_ptr,
            name: name.into(),
            blocks: Vec::new(),
        })
    }

    pub fn name(self, ctx: &Context) -> &str { &self.deref(ctx).name }

    pub fn blocks(self, ctx: &Context) -> &[Block] { &self.deref(ctx).blocks }

    /// The entry block, `None` if the function has no blocks.
    pub fn entry(self, ctx: &Context) -> Option<Block> { self.blocks(ctx).first().copied() }

    /// Append a block at the end of the layout.
    ///
    /// # Panics
    ///
    /// Panics if the block is already laid out in a function.
    pub fn push_block(self, ctx: &mut Context, block: Block) {
        if block.parent(ctx).is_some() {
            panic!("block is already laid out in a function");
        }
        block.set_parent(ctx, self);
        self.deref_mut(ctx).blocks.push(block);
    }

    pub fn display(self, ctx: &Context) -> DisplayFunc<'_> { DisplayFunc { ctx, func: self } }
}

impl CfgRegion for Func {
    type Node = Block;

    fn entry_node(self, arena: &Self::A) -> Option<Self::Node> { self.entry(arena) }

    fn nodes(self, arena: &Self::A) -> Vec<Self::Node> { self.blocks(arena).to_vec() }
}

pub struct DisplayFunc<'a> {
    ctx: &'a Context,
    func: Func,
}

impl fmt::Display for DisplayFunc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "func @{} {{", self.func.name(self.ctx))?;
        for block in self.func.blocks(self.ctx) {
            write!(f, "{}", block.display(self.ctx))?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::{Block, Context, Func, Inst};

    #[test]
    fn test_display_func() {
        let mut ctx = Context::new();
        let func = Func::new(&mut ctx, "f");
        let entry = Block::new(&mut ctx, "entry");
        let exit = Block::new(&mut ctx, "exit");
        func.push_block(&mut ctx, entry);
        func.push_block(&mut ctx, exit);

        let store = Inst::store(&mut ctx, "x");
        let jump = Inst::jump(&mut ctx, exit);
        let ret = Inst::ret(&mut ctx);
        entry.push_inst(&mut ctx, store);
        entry.push_inst(&mut ctx, jump);
        exit.push_inst(&mut ctx, ret);

        assert_eq!(func.entry(&ctx), Some(entry));
        assert_eq!(
            func.display(&ctx).to_string(),
            "func @f {\n^entry:\n    store %x\n    jump ^exit\n^exit:\n    ret\n}\n"
        );
    }
}
