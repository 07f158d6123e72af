use std::fmt;

use super::{Context, DefSite, Func, Inst};
use crate::{
    collections::storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    impl_arena,
    utils::cfg::CfgNode,
};

/// The data of a block.
pub struct BlockData {
    self_ptr: Block,
    /// The name of the block, used when reporting.
    name: String,
    /// The instructions of the block, in program order.
    insts: Vec<Inst>,
    /// The function the block is laid out in.
    parent: Option<Func>,
}

impl BlockData {
    pub fn self_ptr(&self) -> Block { self.self_ptr }

    pub fn name(&self) -> &str { &self.name }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block(BaseArenaPtr<BlockData>);

impl_arena!(Context, BlockData, Block, blocks);

impl Block {
    /// Create a new, empty block.
    ///
    /// The block is not part of any function until it is pushed with
    /// [Func::push_block].
    pub fn new(ctx: &mut Context, name: impl Into<String>) -> Block {
        ctx.alloc_with(|self_ptr| BlockData {
            self_ptr,
            name: name.into(),
            insts: Vec::new(),
            parent: None,
        })
    }

    pub fn name(self, ctx: &Context) -> &str { self.deref(ctx).name() }

    pub fn insts(self, ctx: &Context) -> &[Inst] { &self.deref(ctx).insts }

    pub fn parent(self, ctx: &Context) -> Option<Func> { self.deref(ctx).parent }

    pub(super) fn set_parent(self, ctx: &mut Context, func: Func) {
        self.deref_mut(ctx).parent = Some(func);
    }

    /// Append an instruction at the end of the block.
    ///
    /// # Panics
    ///
    /// Panics if the instruction already belongs to a block.
    pub fn push_inst(self, ctx: &mut Context, inst: Inst) {
        if inst.parent(ctx).is_some() {
            panic!("instruction is already placed in a block");
        }
        inst.set_parent(ctx, self);
        self.deref_mut(ctx).insts.push(inst);
    }

    /// The definitions of the block in program order.
    ///
    /// Each item is the defining instruction and its target name, `None` for
    /// an unnamed target.
    pub fn defs(self, ctx: &Context) -> impl Iterator<Item = (Inst, Option<&str>)> + '_ {
        self.insts(ctx)
            .iter()
            .copied()
            .filter(move |inst| inst.deref(ctx).is_def())
            .map(move |inst| (inst, inst.deref(ctx).def_target()))
    }

    pub fn display(self, ctx: &Context) -> DisplayBlock<'_> {
        DisplayBlock {
            ctx,
            data: self.deref(ctx),
        }
    }
}

impl CfgNode for Block {
    type Region = Func;

    /// The successors of every branch-like instruction in the block, in
    /// instruction order and without duplicates. A block without any branch
    /// has no successors.
    fn succs(self, arena: &Self::A) -> Vec<Self> {
        let mut succs = Vec::new();
        for inst in self.insts(arena) {
            for succ in inst.succ_blocks(arena) {
                if !succs.contains(&succ) {
                    succs.push(succ);
                }
            }
        }
        succs
    }
}

pub struct DisplayBlock<'a> {
    ctx: &'a Context,
    data: &'a BlockData,
}

impl fmt::Display for DisplayBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "^{}:", self.data.name)?;
        for inst in self.data.insts.iter() {
            writeln!(f, "    {}", inst.display(self.ctx))?;
        }
        Ok(())
    }
}
