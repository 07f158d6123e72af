//! # Reaching Definition Analysis
//!
//! Runs every analysis of this crate on one function and bundles the results:
//! the control flow graph, the definition catalog, GEN/KILL, IN/OUT, the
//! dominator sets and the natural loops.
//!
//! Each run owns all of its state. Analyzing several functions concurrently
//! only requires a separate [ReachingDefinitionAnalysis] (or a separate call
//! to [run_analysis]) per function.

use std::collections::BTreeSet;

use thiserror::Error;

use super::{
    def_catalog::{DefCatalog, DefId},
    gen_kill::{GenKill, GenPolicy},
    reaching_defs::{ReachingDefs, SolverMode},
};
use crate::{
    ir::{
        passman::{LocalPass, ParamStorage, PassError, PassResult},
        Block,
        Context,
        Func,
    },
    utils::{
        cfg::{CfgInfo, CfgRegion},
        dominance::Dominance,
        loop_info::LoopInfo,
    },
};

pub const RDA: &str = "reaching-definition-analysis";

/// Parameter selecting the [SolverMode].
pub const PARAM_SOLVER: &str = "rda-solver";
/// Parameter selecting the [GenPolicy].
pub const PARAM_GEN_POLICY: &str = "rda-gen-policy";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("function @{0} has no blocks")]
    EmptyFunction(String),

    #[error("block ^{block} branches to ^{succ}, which is not laid out in the function")]
    UnknownSuccessor { block: String, succ: String },
}

impl From<AnalysisError> for PassError {
    fn from(err: AnalysisError) -> Self { PassError::analysis_error(RDA, Box::new(err)) }
}

/// The options of the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub solver: SolverMode,
    pub gen_policy: GenPolicy,
}

impl AnalysisConfig {
    /// Read the options from `params`, absent or unknown values keep the
    /// default.
    pub fn from_params(params: &ParamStorage) -> Self {
        let default = Self::default();
        Self {
            solver: params.get(PARAM_SOLVER).unwrap_or(default.solver),
            gen_policy: params.get(PARAM_GEN_POLICY).unwrap_or(default.gen_policy),
        }
    }
}

/// The results of the analysis of one function.
pub struct AnalysisResult {
    func: Func,
    cfg: CfgInfo<Block, Func>,
    catalog: DefCatalog,
    gen_kill: GenKill,
    reaching: ReachingDefs,
    dominance: Dominance<Block>,
    loops: LoopInfo<Block>,
}

impl AnalysisResult {
    pub fn func(&self) -> Func { self.func }

    pub fn cfg(&self) -> &CfgInfo<Block, Func> { &self.cfg }

    pub fn catalog(&self) -> &DefCatalog { &self.catalog }

    pub fn gen_kill(&self) -> &GenKill { &self.gen_kill }

    pub fn reaching(&self) -> &ReachingDefs { &self.reaching }

    pub fn dominance(&self) -> &Dominance<Block> { &self.dominance }

    pub fn loops(&self) -> &LoopInfo<Block> { &self.loops }

    pub fn gen(&self, block: Block) -> &BTreeSet<DefId> { self.gen_kill.gen(block) }

    pub fn kill(&self, block: Block) -> &BTreeSet<DefId> { self.gen_kill.kill(block) }

    pub fn ins(&self, block: Block) -> &BTreeSet<DefId> { self.reaching.ins(block) }

    pub fn outs(&self, block: Block) -> &BTreeSet<DefId> { self.reaching.outs(block) }

    pub fn doms(&self, block: Block) -> Option<&BTreeSet<Block>> { self.dominance.doms(block) }

    /// The back edges `(latch, header)` paired with their loop bodies.
    pub fn natural_loops(&self) -> Vec<((Block, Block), &BTreeSet<Block>)> {
        self.loops
            .loops()
            .iter()
            .map(|lp| ((lp.latch(), lp.header()), lp.body()))
            .collect()
    }

    /// Resolve a definition id to the defined variable and its block.
    pub fn resolve(&self, def: DefId) -> Option<(&str, Block)> {
        self.catalog.def(def).map(|info| (info.var(), info.block()))
    }

    /// The id of the definition of `var` made by the `nth` store to it in
    /// `block`, counting from zero in program order.
    pub fn def_in(&self, var: &str, block: Block, nth: usize) -> Option<DefId> {
        self.catalog
            .defs_of(var)
            .iter()
            .copied()
            .filter(|id| self.resolve(*id).map(|(_, b)| b) == Some(block))
            .nth(nth)
    }
}

#[derive(Default)]
pub struct ReachingDefinitionAnalysis {
    config: AnalysisConfig,
}

impl ReachingDefinitionAnalysis {
    pub fn new(config: AnalysisConfig) -> Self { Self { config } }

    pub fn config(&self) -> AnalysisConfig { self.config }
}

impl LocalPass for ReachingDefinitionAnalysis {
    type Output = AnalysisResult;

    fn run(&mut self, ctx: &Context, func: Func) -> PassResult<Self::Output> {
        log::debug!(
            "{}: analyzing @{} ({} blocks, solver {}, gen policy {})",
            RDA,
            func.name(ctx),
            func.blocks(ctx).len(),
            self.config.solver,
            self.config.gen_policy
        );

        let cfg = func.cfg_info(ctx);
        if cfg.entry().is_none() {
            return Err(AnalysisError::EmptyFunction(func.name(ctx).to_string()).into());
        }
        if let Some((block, succ)) = cfg.dangling_edge() {
            return Err(AnalysisError::UnknownSuccessor {
                block: block.name(ctx).to_string(),
                succ: succ.name(ctx).to_string(),
            }
            .into());
        }

        let catalog = DefCatalog::new(ctx, func);
        let gen_kill = GenKill::new(ctx, func, &catalog, self.config.gen_policy);
        let reaching = ReachingDefs::new(&cfg, &gen_kill, self.config.solver);
        let dominance = Dominance::new(&cfg);
        let loops = LoopInfo::new(&cfg, &dominance);

        Ok(AnalysisResult {
            func,
            cfg,
            catalog,
            gen_kill,
            reaching,
            dominance,
            loops,
        })
    }

    fn fetch_params(&mut self, params: &ParamStorage) {
        self.config = AnalysisConfig::from_params(params);
    }
}

/// Analyze `func` with the default configuration.
pub fn run_analysis(ctx: &Context, func: Func) -> PassResult<AnalysisResult> {
    ReachingDefinitionAnalysis::default().run(ctx, func)
}
