//! # Reaching Definitions
//!
//! A forward, may-reach data-flow problem over the definition ids:
//!
//! ```text
//! IN(n)  = ⋃ { OUT(p) | p ∈ preds(n) }
//! OUT(n) = GEN(n) ∪ (IN(n) − KILL(n))
//! ```
//!
//! The union is taken for every block, the entry included: IN of the entry is
//! empty unless some block branches back to it, in which case the definitions
//! flowing around that edge reach the entry too.
//!
//! [SolverMode::Fixpoint] iterates until a full pass over all blocks changes
//! nothing. The lattice is finite and the transfer functions are monotonic,
//! so this always terminates at the least fixpoint.
//!
//! [SolverMode::TwoPass] reproduces a fixed two-pass procedure instead: one
//! IN/OUT pass followed by a final IN pass, with self-edges ignored. It may
//! under-approximate OUT on loops that need more passes to propagate, and only
//! exists for comparing against tools that compute it that way.

use std::{collections::BTreeSet, fmt, str::FromStr};

use rustc_hash::FxHashMap;

use super::{def_catalog::DefId, gen_kill::GenKill};
use crate::{
    ir::{passman::UnknownOption, Block, Func},
    utils::cfg::CfgInfo,
};

/// How the IN/OUT sets are solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverMode {
    /// Iterate to the fixpoint.
    #[default]
    Fixpoint,
    /// Exactly two passes.
    TwoPass,
}

impl FromStr for SolverMode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixpoint" => Ok(SolverMode::Fixpoint),
            "two-pass" => Ok(SolverMode::TwoPass),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMode::Fixpoint => write!(f, "fixpoint"),
            SolverMode::TwoPass => write!(f, "two-pass"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReachingDefs {
    ins: FxHashMap<Block, BTreeSet<DefId>>,
    outs: FxHashMap<Block, BTreeSet<DefId>>,
    /// The number of passes over the blocks.
    iterations: usize,
}

impl ReachingDefs {
    pub fn new(cfg: &CfgInfo<Block, Func>, gen_kill: &GenKill, mode: SolverMode) -> Self {
        let mut rd = ReachingDefs::default();

        for block in cfg.nodes().iter().copied() {
            rd.ins.insert(block, BTreeSet::new());
            rd.outs.insert(block, gen_kill.gen(block).clone());
        }

        match mode {
            SolverMode::Fixpoint => rd.solve_fixpoint(cfg, gen_kill),
            SolverMode::TwoPass => rd.solve_two_pass(cfg, gen_kill),
        }

        log::debug!(
            "reaching_defs: {} blocks solved in {} passes ({})",
            cfg.nodes().len(),
            rd.iterations,
            mode
        );
        for block in cfg.nodes() {
            log::trace!(
                "reaching_defs: {:?}: IN = {:?}, OUT = {:?}",
                block,
                rd.ins[block],
                rd.outs[block]
            );
        }

        rd
    }

    fn solve_fixpoint(&mut self, cfg: &CfgInfo<Block, Func>, gen_kill: &GenKill) {
        let order = cfg.rpo();

        let mut changed = true;
        while changed {
            changed = false;
            self.iterations += 1;

            for block in order.iter().copied() {
                let new_in = self.union_of_preds(cfg, block, true);

                let mut new_out = gen_kill.gen(block).clone();
                let kill = gen_kill.kill(block);
                new_out.extend(new_in.iter().copied().filter(|d| !kill.contains(d)));

                if self.ins[&block] != new_in {
                    self.ins.insert(block, new_in);
                    changed = true;
                }
                if self.outs[&block] != new_out {
                    self.outs.insert(block, new_out);
                    changed = true;
                }
            }
        }
    }

    fn solve_two_pass(&mut self, cfg: &CfgInfo<Block, Func>, gen_kill: &GenKill) {
        self.compute_ins(cfg);
        self.iterations += 1;

        for block in cfg.nodes().iter().copied() {
            let kill = gen_kill.kill(block);
            let live_through: Vec<DefId> = self.ins[&block]
                .iter()
                .copied()
                .filter(|d| !kill.contains(d))
                .collect();

            let out = self.outs.entry(block).or_default();
            out.extend(gen_kill.gen(block).iter().copied());
            out.extend(live_through);
        }

        self.compute_ins(cfg);
        self.iterations += 1;
    }

    /// Recompute every IN set from the current OUT sets, ignoring self-edges.
    fn compute_ins(&mut self, cfg: &CfgInfo<Block, Func>) {
        for block in cfg.nodes().iter().copied() {
            let new_in = self.union_of_preds(cfg, block, false);
            self.ins.insert(block, new_in);
        }
    }

    fn union_of_preds(
        &self,
        cfg: &CfgInfo<Block, Func>,
        block: Block,
        include_self: bool,
    ) -> BTreeSet<DefId> {
        let mut new_in = BTreeSet::new();
        for pred in cfg.preds(block).unwrap_or_default() {
            if !include_self && *pred == block {
                continue;
            }
            new_in.extend(self.outs[pred].iter().copied());
        }
        new_in
    }

    /// The definitions reaching the entry of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not laid out in the analyzed function.
    pub fn ins(&self, block: Block) -> &BTreeSet<DefId> { &self.ins[&block] }

    /// The definitions reaching the exit of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not laid out in the analyzed function.
    pub fn outs(&self, block: Block) -> &BTreeSet<DefId> { &self.outs[&block] }

    /// Whether `def` may reach the entry of `block`.
    pub fn reaches(&self, def: DefId, block: Block) -> bool {
        self.ins
            .get(&block)
            .map(|ins| ins.contains(&def))
            .unwrap_or(false)
    }

    /// The number of passes over the blocks. For the fixpoint solver, the
    /// last pass is the one that observed no change.
    pub fn iterations(&self) -> usize { self.iterations }
}
