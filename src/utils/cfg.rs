use std::{fmt, hash::Hash};

use rustc_hash::{FxHashMap, FxHashSet};

use super::dfs::DfsContext;
use crate::collections::storage::ArenaPtr;

/// A node in a control flow graph.
pub trait CfgNode: ArenaPtr + Hash + Ord + fmt::Debug {
    /// The region type associated with the node.
    type Region: CfgRegion<A = Self::A, Node = Self>;

    /// Get the successors of the node.
    ///
    /// Successors are easy to get from the branch instructions. But for
    /// predecessors, we need to traverse the whole control flow graph.
    fn succs(self, arena: &Self::A) -> Vec<Self>;
}

/// A trait defining a region that contains control flow graph information.
///
/// A function is the only region the analyses deal with: a flat, ordered list
/// of nodes whose first node is the entry.
pub trait CfgRegion: ArenaPtr {
    /// The node type associated with the region.
    type Node: CfgNode<A = Self::A, Region = Self>;

    /// Get the entry node of the region, `None` if the region is empty.
    fn entry_node(self, arena: &Self::A) -> Option<Self::Node>;

    /// Get all the nodes of the region in layout order.
    fn nodes(self, arena: &Self::A) -> Vec<Self::Node>;

    /// Generate the control flow information for the region.
    fn cfg_info(self, arena: &Self::A) -> CfgInfo<Self::Node, Self> { CfgInfo::new(arena, self) }
}

/// Control flow graph information.
///
/// Every node of the region is a key of both maps, including nodes without
/// any outgoing edge and nodes unreachable from the entry.
pub struct CfgInfo<N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    /// The region associated with the control flow graph.
    region: R,
    /// The entry node of the region.
    entry: Option<N>,
    /// The nodes of the region, in layout order.
    nodes: Vec<N>,
    /// The successors of each node.
    succs: FxHashMap<N, Vec<N>>,
    /// The predecessors of each node.
    preds: FxHashMap<N, Vec<N>>,
}

impl<N, R> CfgInfo<N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    /// Derive the control flow graph information from the region.
    pub fn new(arena: &N::A, region: R) -> Self {
        let nodes = region.nodes(arena);
        let entry = region.entry_node(arena);

        let mut succs: FxHashMap<N, Vec<N>> = FxHashMap::default();
        let mut preds: FxHashMap<N, Vec<N>> = FxHashMap::default();

        for node in nodes.iter().copied() {
            succs.entry(node).or_default();
            preds.entry(node).or_default();
        }

        for node in nodes.iter().copied() {
            for succ in node.succs(arena) {
                let node_succs = succs.entry(node).or_default();
                if node_succs.contains(&succ) {
                    continue;
                }
                node_succs.push(succ);
                // a successor outside the region gets no predecessor entry,
                // see `dangling_edge`.
                if let Some(succ_preds) = preds.get_mut(&succ) {
                    succ_preds.push(node);
                }
            }
        }

        Self {
            region,
            entry,
            nodes,
            succs,
            preds,
        }
    }

    /// Get the successors of a node.
    ///
    /// The successors keep the order they appear in the node's branch
    /// instructions, without duplicates.
    ///
    /// # Returns
    ///
    /// - `Some(succs)`: The successors of the node.
    /// - `None`: The node is not part of the region.
    pub fn succs(&self, node: N) -> Option<&[N]> { self.succs.get(&node).map(|v| v.as_slice()) }

    /// Get the predecessors of a node.
    ///
    /// The predecessors are ordered by the layout position of the source.
    ///
    /// # Returns
    ///
    /// - `Some(preds)`: The predecessors of the node.
    /// - `None`: The node is not part of the region.
    pub fn preds(&self, node: N) -> Option<&[N]> { self.preds.get(&node).map(|v| v.as_slice()) }

    /// Get the region associated with the control flow graph.
    pub fn region(&self) -> R { self.region }

    /// Get the entry node.
    pub fn entry(&self) -> Option<N> { self.entry }

    /// All nodes in layout order.
    pub fn nodes(&self) -> &[N] { &self.nodes }

    pub fn contains(&self, node: N) -> bool { self.succs.contains_key(&node) }

    /// All edges `(src, dst)`, ordered by the layout position of `src` and
    /// then by successor order.
    pub fn edges(&self) -> Vec<(N, N)> {
        self.nodes
            .iter()
            .flat_map(|&src| self.succs[&src].iter().map(move |&dst| (src, dst)))
            .collect()
    }

    /// The first edge whose target is not a node of the region.
    pub fn dangling_edge(&self) -> Option<(N, N)> {
        self.edges()
            .into_iter()
            .find(|(_, dst)| !self.contains(*dst))
    }

    /// Get the reachable nodes in the control flow graph.
    pub fn reachable_nodes(&self) -> FxHashSet<N> {
        let mut reachables = FxHashSet::default();
        let Some(entry) = self.entry else {
            return reachables;
        };

        let mut worklist = vec![entry];
        while let Some(node) = worklist.pop() {
            if !reachables.insert(node) {
                continue;
            }

            if let Some(succs) = self.succs(node) {
                worklist.extend_from_slice(succs);
            }
        }

        reachables
    }

    /// The visiting order used by the iterative solvers.
    ///
    /// This is the reverse postorder of the nodes reachable from the entry,
    /// followed by the unreachable nodes in layout order. The order has no
    /// influence on the fixpoint, only on how fast it is reached.
    pub fn rpo(&self) -> Vec<N> {
        let mut dfs = DfsContext::default();
        let mut order: Vec<N> = dfs.post_order_iter(self).collect();
        order.reverse();

        let visited: FxHashSet<N> = order.iter().copied().collect();
        order.extend(self.nodes.iter().copied().filter(|n| !visited.contains(n)));
        order
    }
}
