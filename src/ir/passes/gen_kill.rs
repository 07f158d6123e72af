//! # GEN/KILL Sets
//!
//! For each block, GEN holds the definitions made in the block, and KILL the
//! definitions of the same variables made anywhere else in the function.
//! GEN always wins: an id generated by a block is never in its KILL set.
//!
//! With [GenPolicy::AllDefs] every definition of a block is generated, even
//! when a later definition in the same block overwrites the same variable.
//! [GenPolicy::LastDef] keeps only the last definition of each variable,
//! which is the textbook formulation; it is opt-in because it changes the
//! observable GEN and OUT sets.

use std::{collections::BTreeSet, fmt, str::FromStr};

use rustc_hash::FxHashMap;

use super::def_catalog::{DefCatalog, DefId};
use crate::ir::{passman::UnknownOption, Block, Context, Func};

/// Which definitions of a block are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenPolicy {
    /// Every definition in the block.
    #[default]
    AllDefs,
    /// Only the last definition of each variable in the block.
    LastDef,
}

impl FromStr for GenPolicy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-defs" => Ok(GenPolicy::AllDefs),
            "last-def" => Ok(GenPolicy::LastDef),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

impl fmt::Display for GenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenPolicy::AllDefs => write!(f, "all-defs"),
            GenPolicy::LastDef => write!(f, "last-def"),
        }
    }
}

#[derive(Debug, Default)]
pub struct GenKill {
    gens: FxHashMap<Block, BTreeSet<DefId>>,
    kills: FxHashMap<Block, BTreeSet<DefId>>,
}

impl GenKill {
    pub fn new(ctx: &Context, func: Func, catalog: &DefCatalog, policy: GenPolicy) -> Self {
        let mut gen_kill = GenKill::default();

        for block in func.blocks(ctx).iter().copied() {
            let mut gen = BTreeSet::new();
            let mut kill = BTreeSet::new();

            for (inst, _) in block.defs(ctx) {
                let Some(id) = catalog.id_of(inst) else {
                    // not tracked
                    continue;
                };
                let Some(info) = catalog.def(id) else {
                    continue;
                };
                let var = info.var();

                if policy == GenPolicy::LastDef {
                    gen.retain(|g| !catalog.defs_of(var).contains(g));
                }
                gen.insert(id);

                for other in catalog.defs_of(var).iter().copied() {
                    if !gen.contains(&other) {
                        kill.insert(other);
                    }
                }
            }

            kill.retain(|k| !gen.contains(k));

            log::trace!(
                "gen_kill: ^{}: GEN = {:?}, KILL = {:?}",
                block.name(ctx),
                gen,
                kill
            );

            gen_kill.gens.insert(block, gen);
            gen_kill.kills.insert(block, kill);
        }

        gen_kill
    }

    /// The GEN set of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not laid out in the analyzed function.
    pub fn gen(&self, block: Block) -> &BTreeSet<DefId> { &self.gens[&block] }

    /// The KILL set of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not laid out in the analyzed function.
    pub fn kill(&self, block: Block) -> &BTreeSet<DefId> { &self.kills[&block] }
}
