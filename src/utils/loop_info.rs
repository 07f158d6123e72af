use std::collections::{BTreeMap, BTreeSet};

use super::{
    cfg::{CfgInfo, CfgNode, CfgRegion},
    dominance::Dominance,
};

/// A natural loop in the control flow graph.
///
/// Each back edge `latch -> header` produces one loop, whose body is the
/// header plus every node that reaches the latch without passing through the
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalLoop<N> {
    /// The target of the back edge.
    header: N,
    /// The source of the back edge.
    latch: N,
    /// The nodes of the loop, header and latch included.
    body: BTreeSet<N>,
}

impl<N> NaturalLoop<N>
where
    N: CfgNode,
{
    pub fn header(&self) -> N { self.header }

    pub fn latch(&self) -> N { self.latch }

    pub fn body(&self) -> &BTreeSet<N> { &self.body }

    pub fn contains(&self, node: N) -> bool { self.body.contains(&node) }
}

/// The natural loops of a region, one per back edge.
///
/// Loops sharing a header are not merged and no nesting is computed, see
/// [LoopInfo::merged_by_header] for the merged view.
pub struct LoopInfo<N> {
    back_edges: Vec<(N, N)>,
    loops: Vec<NaturalLoop<N>>,
}

impl<N> Default for LoopInfo<N> {
    fn default() -> Self {
        Self {
            back_edges: Vec::new(),
            loops: Vec::new(),
        }
    }
}

impl<N> LoopInfo<N>
where
    N: CfgNode,
{
    pub fn new<R>(cfg: &CfgInfo<N, R>, dominance: &Dominance<N>) -> Self
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        let mut info = LoopInfo::default();
        info.detect_loops(cfg, dominance);
        info
    }

    /// The back edges `(latch, header)`, in edge order of the graph.
    pub fn back_edges(&self) -> &[(N, N)] { &self.back_edges }

    /// The loops, in the same order as [LoopInfo::back_edges].
    pub fn loops(&self) -> &[NaturalLoop<N>] { &self.loops }

    /// The union of the bodies of all loops sharing a header.
    pub fn merged_by_header(&self) -> BTreeMap<N, BTreeSet<N>> {
        let mut merged: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();
        for lp in self.loops.iter() {
            merged
                .entry(lp.header)
                .or_default()
                .extend(lp.body.iter().copied());
        }
        merged
    }

    /// Check if `node` is in any loop headed by `header`.
    pub fn is_in_loop(&self, node: N, header: N) -> bool {
        self.loops
            .iter()
            .any(|lp| lp.header == header && lp.contains(node))
    }

    fn detect_loops<R>(&mut self, cfg: &CfgInfo<N, R>, dominance: &Dominance<N>)
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        // an edge is a back edge if its target dominates its source. an
        // unreachable source keeps every node as a dominator, so all of its
        // edges are back edges too.
        for (src, dst) in cfg.edges() {
            if dominance.dominates(dst, src) {
                self.back_edges.push((src, dst));
            }
        }

        for (latch, header) in self.back_edges.iter().copied() {
            let mut body = BTreeSet::from([header]);
            let mut stack = vec![latch];

            // walk backwards from the latch, the header is already in the body
            // so the walk never leaves the loop through it.
            while let Some(node) = stack.pop() {
                if body.insert(node) {
                    stack.extend_from_slice(cfg.preds(node).unwrap_or_default());
                }
            }

            log::trace!(
                "loop_info: back edge {:?} -> {:?}, body {:?}",
                latch,
                header,
                body
            );

            self.loops.push(NaturalLoop {
                header,
                latch,
                body,
            });
        }

        log::debug!("loop_info: found {} natural loops", self.loops.len());
    }
}
