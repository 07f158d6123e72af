//! # Dominance Analysis
//!
//! Dominator sets computed by the classic iterative data-flow formulation:
//!
//! ```text
//! Dom(entry) = {entry}
//! Dom(n)     = {n} ∪ ⋂ { Dom(p) | p ∈ preds(n) }
//! ```
//!
//! Every non-entry node starts at the top element (the set of all nodes) and
//! the sets shrink monotonically until a full pass changes nothing.
//!
//! Nodes that cannot be reached from the entry keep whatever the iteration
//! leaves them with. A node without predecessors keeps the top element, so
//! queries on unreachable nodes are not meaningful; [Dominance::is_reliable]
//! tells them apart.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use super::cfg::{CfgInfo, CfgNode, CfgRegion};

pub struct Dominance<N>
where
    N: CfgNode,
{
    /// The dominator set of each node.
    doms: FxHashMap<N, BTreeSet<N>>,
    /// The nodes reachable from the entry.
    reachable: FxHashSet<N>,
    /// The number of full passes until nothing changed.
    iterations: usize,
}

impl<N> Default for Dominance<N>
where
    N: CfgNode,
{
    fn default() -> Self {
        Self {
            doms: FxHashMap::default(),
            reachable: FxHashSet::default(),
            iterations: 0,
        }
    }
}

impl<N> Dominance<N>
where
    N: CfgNode,
{
    /// Solve the dominator sets of every node in `cfg`.
    pub fn new<R>(cfg: &CfgInfo<N, R>) -> Self
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        let Some(entry) = cfg.entry() else {
            return Self::default();
        };

        let reachable = cfg.reachable_nodes();
        let all: BTreeSet<N> = cfg.nodes().iter().copied().collect();

        let mut doms: FxHashMap<N, BTreeSet<N>> = FxHashMap::default();
        for node in cfg.nodes().iter().copied() {
            if node == entry {
                doms.insert(node, BTreeSet::from([entry]));
            } else {
                doms.insert(node, all.clone());
            }
        }

        for node in cfg.nodes().iter().copied() {
            if !reachable.contains(&node) {
                log::warn!(
                    "dominance: node {:?} is unreachable, its dominators are not meaningful",
                    node
                );
            }
        }

        let order = cfg.rpo();
        let mut iterations = 0;

        let mut changed = true;
        while changed {
            changed = false;
            iterations += 1;

            for node in order.iter().copied() {
                if node == entry {
                    continue;
                }

                let preds = cfg.preds(node).unwrap_or_default();
                let Some((first, rest)) = preds.split_first() else {
                    // no predecessor, nothing to intersect
                    continue;
                };

                let mut new_doms = doms[first].clone();
                for pred in rest {
                    let pred_doms = &doms[pred];
                    new_doms.retain(|d| pred_doms.contains(d));
                }
                new_doms.insert(node);

                if doms[&node] != new_doms {
                    doms.insert(node, new_doms);
                    changed = true;
                }
            }
        }

        log::debug!(
            "dominance: solved {} nodes in {} iterations",
            doms.len(),
            iterations
        );
        for node in cfg.nodes() {
            log::trace!("dominance: DOM({:?}) = {:?}", node, doms[node]);
        }

        Self {
            doms,
            reachable,
            iterations,
        }
    }

    /// Returns the dominator set of `node`, including `node` itself.
    ///
    /// Returns `None` if the node is not part of the analyzed region.
    pub fn doms(&self, node: N) -> Option<&BTreeSet<N>> { self.doms.get(&node) }

    /// Returns true if `n1` dominates `n2`.
    pub fn dominates(&self, n1: N, n2: N) -> bool {
        self.doms
            .get(&n2)
            .map(|doms| doms.contains(&n1))
            .unwrap_or(false)
    }

    /// Returns true if `n1` dominates `n2` and they are different nodes.
    pub fn strictly_dominates(&self, n1: N, n2: N) -> bool { n1 != n2 && self.dominates(n1, n2) }

    /// Returns the immediate dominator of `node`.
    ///
    /// The strict dominators of a reachable node form a chain, the immediate
    /// dominator is the last one on it, i.e. the strict dominator with the
    /// largest dominator set. The entry and unreachable nodes have none.
    pub fn idom(&self, node: N) -> Option<N> {
        if !self.is_reliable(node) {
            return None;
        }
        self.doms[&node]
            .iter()
            .copied()
            .filter(|d| *d != node)
            .max_by_key(|d| self.doms[d].len())
    }

    /// Whether the dominance information of `node` is meaningful, i.e. the
    /// node is reachable from the entry.
    pub fn is_reliable(&self, node: N) -> bool { self.reachable.contains(&node) }

    /// The number of full passes the solver took, the last one being the
    /// pass that observed no change.
    pub fn iterations(&self) -> usize { self.iterations }
}
