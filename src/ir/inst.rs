use std::fmt;

use super::{Block, Context};
use crate::{
    collections::storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    impl_arena,
};

/// The storage location written by a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A named storage location, e.g. a local variable slot.
    Named(String),
    /// An unnamed temporary.
    Temp(u32),
}

impl Operand {
    pub fn named(name: impl Into<String>) -> Self { Operand::Named(name.into()) }

    /// The name of the location, `None` for temporaries.
    pub fn name(&self) -> Option<&str> {
        match self {
            Operand::Named(name) => Some(name.as_str()),
            Operand::Temp(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Named(name) => write!(f, "%{}", name),
            Operand::Temp(idx) => write!(f, "%{}", idx),
        }
    }
}

/// The kind of an instruction.
///
/// Only the shapes the analyses care about are distinguished: stores define
/// storage locations, and branch-like instructions carry successors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstKind {
    /// Write a value to `dst`.
    Store { dst: Operand },
    /// Unconditional jump.
    Jump { dst: Block },
    /// Two-way conditional branch.
    Branch { then_dst: Block, else_dst: Block },
    /// Multi-way branch.
    Switch { default: Block, cases: Vec<Block> },
    /// Return from the function.
    Ret,
    /// Any other instruction, identified by its mnemonic.
    Other(String),
}

/// The capability of being a definition.
///
/// This answers "does this instruction write a storage location, and if so,
/// what is the name of that location".
pub trait DefSite {
    /// Whether the instruction writes a storage location at all.
    fn is_def(&self) -> bool;

    /// The name of the written location.
    ///
    /// `None` if the instruction is not a definition, or if the written
    /// location has no name.
    fn def_target(&self) -> Option<&str>;
}

impl DefSite for InstKind {
    fn is_def(&self) -> bool { matches!(self, InstKind::Store { .. }) }

    fn def_target(&self) -> Option<&str> {
        match self {
            InstKind::Store { dst } => dst.name(),
            InstKind::Jump { .. }
            | InstKind::Branch { .. }
            | InstKind::Switch { .. }
            | InstKind::Ret
            | InstKind::Other(_) => None,
        }
    }
}

/// The data of an instruction.
pub struct InstData {
    self_ptr: Inst,
    kind: InstKind,
    /// The block containing the instruction.
    parent: Option<Block>,
}

impl InstData {
    pub fn self_ptr(&self) -> Inst { self.self_ptr }

    pub fn kind(&self) -> &InstKind { &self.kind }
}

impl DefSite for InstData {
    fn is_def(&self) -> bool { self.kind.is_def() }

    fn def_target(&self) -> Option<&str> { self.kind.def_target() }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Inst(BaseArenaPtr<InstData>);

impl_arena!(Context, InstData, Inst, insts);

impl Inst {
    pub fn new(ctx: &mut Context, kind: InstKind) -> Inst {
        ctx.alloc_with(|self_ptr| InstData {
            self_ptr,
            kind,
            parent: None,
        })
    }

    /// Create a store to a named location.
    pub fn store(ctx: &mut Context, name: impl Into<String>) -> Inst {
        Self::new(
            ctx,
            InstKind::Store {
                dst: Operand::named(name),
            },
        )
    }

    /// Create a store to an unnamed temporary.
    pub fn store_temp(ctx: &mut Context, idx: u32) -> Inst {
        Self::new(
            ctx,
            InstKind::Store {
                dst: Operand::Temp(idx),
            },
        )
    }

    pub fn jump(ctx: &mut Context, dst: Block) -> Inst { Self::new(ctx, InstKind::Jump { dst }) }

    pub fn branch(ctx: &mut Context, then_dst: Block, else_dst: Block) -> Inst {
        Self::new(ctx, InstKind::Branch { then_dst, else_dst })
    }

    pub fn switch(ctx: &mut Context, default: Block, cases: Vec<Block>) -> Inst {
        Self::new(ctx, InstKind::Switch { default, cases })
    }

    pub fn ret(ctx: &mut Context) -> Inst { Self::new(ctx, InstKind::Ret) }

    pub fn other(ctx: &mut Context, mnemonic: impl Into<String>) -> Inst {
        Self::new(ctx, InstKind::Other(mnemonic.into()))
    }

    pub fn kind(self, ctx: &Context) -> &InstKind { self.deref(ctx).kind() }

    pub fn parent(self, ctx: &Context) -> Option<Block> { self.deref(ctx).parent }

    pub(super) fn set_parent(self, ctx: &mut Context, block: Block) {
        self.deref_mut(ctx).parent = Some(block);
    }

    /// Whether the instruction may transfer control to other blocks.
    pub fn is_branch(self, ctx: &Context) -> bool {
        matches!(
            self.kind(ctx),
            InstKind::Jump { .. } | InstKind::Branch { .. } | InstKind::Switch { .. }
        )
    }

    /// The blocks this instruction may transfer control to, empty for
    /// non-branch instructions.
    pub fn succ_blocks(self, ctx: &Context) -> Vec<Block> {
        match self.kind(ctx) {
            InstKind::Jump { dst } => vec![*dst],
            InstKind::Branch { then_dst, else_dst } => vec![*then_dst, *else_dst],
            InstKind::Switch { default, cases } => {
                let mut succs = vec![*default];
                succs.extend(cases.iter().copied());
                succs
            }
            InstKind::Store { .. } | InstKind::Ret | InstKind::Other(_) => Vec::new(),
        }
    }

    pub fn display(self, ctx: &Context) -> DisplayInst<'_> { DisplayInst { ctx, inst: self } }
}

pub struct DisplayInst<'a> {
    ctx: &'a Context,
    inst: Inst,
}

impl fmt::Display for DisplayInst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.ctx;
        match self.inst.kind(ctx) {
            InstKind::Store { dst } => write!(f, "store {}", dst),
            InstKind::Jump { dst } => write!(f, "jump ^{}", dst.name(ctx)),
            InstKind::Branch { then_dst, else_dst } => {
                write!(f, "br ^{}, ^{}", then_dst.name(ctx), else_dst.name(ctx))
            }
            InstKind::Switch { default, cases } => {
                write!(f, "switch ^{} [", default.name(ctx))?;
                for (i, case) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "^{}", case.name(ctx))?;
                }
                write!(f, "]")
            }
            InstKind::Ret => write!(f, "ret"),
            InstKind::Other(mnemonic) => write!(f, "{}", mnemonic),
        }
    }
}
