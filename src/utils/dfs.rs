//! # Depth-First Search on Control Flow Graph
//!
//! A low-level DFS interface and iterators over a [CfgInfo], used to derive
//! the visiting order of the iterative solvers.

use rustc_hash::FxHashSet;

use super::cfg::{CfgInfo, CfgNode, CfgRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Enter,
    Leave,
}

pub struct DfsContext<N>
where
    N: CfgNode,
{
    stack: Vec<(Event, N)>,
    visited: FxHashSet<N>,
}

impl<N> Default for DfsContext<N>
where
    N: CfgNode,
{
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            visited: FxHashSet::default(),
        }
    }
}

impl<N> DfsContext<N>
where
    N: CfgNode,
{
    /// Start a traversal from the entry of `cfg`.
    ///
    /// An empty region yields nothing.
    pub fn iter<'a, R>(&'a mut self, cfg: &'a CfgInfo<N, R>) -> DfsIterator<'a, N, R>
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        self.stack.clear();
        self.visited.clear();
        if let Some(entry) = cfg.entry() {
            self.stack.push((Event::Enter, entry));
        }
        DfsIterator { cfg, dfs: self }
    }

    pub fn pre_order_iter<'a, R>(&'a mut self, cfg: &'a CfgInfo<N, R>) -> DfsPreOrderIterator<'a, N, R>
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        DfsPreOrderIterator(self.iter(cfg))
    }

    pub fn post_order_iter<'a, R>(
        &'a mut self,
        cfg: &'a CfgInfo<N, R>,
    ) -> DfsPostOrderIterator<'a, N, R>
    where
        R: CfgRegion<A = N::A, Node = N>,
    {
        DfsPostOrderIterator(self.iter(cfg))
    }
}

pub struct DfsIterator<'a, N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    cfg: &'a CfgInfo<N, R>,
    dfs: &'a mut DfsContext<N>,
}

impl<'a, N, R> Iterator for DfsIterator<'a, N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    type Item = (Event, N);

    fn next(&mut self) -> Option<Self::Item> {
        let mut event_node = None;

        while let Some((event, node)) = self.dfs.stack.pop() {
            if event == Event::Enter && self.dfs.visited.contains(&node) {
                continue;
            }
            event_node = Some((event, node));
            break;
        }

        let (event, node) = event_node?;

        if event == Event::Enter && self.dfs.visited.insert(node) {
            self.dfs.stack.push((Event::Leave, node));

            let cfg = self.cfg;
            let succs = cfg.succs(node).unwrap_or_default();

            self.dfs.stack.extend(
                succs
                    .iter()
                    // this is a stack, reversing the list visits the first
                    // successor of the node first.
                    .rev()
                    .filter(|succ| !self.dfs.visited.contains(*succ))
                    .map(|succ| (Event::Enter, *succ)),
            );
        }

        Some((event, node))
    }
}

pub struct DfsPreOrderIterator<'a, N, R>(DfsIterator<'a, N, R>)
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>;

impl<'a, N, R> Iterator for DfsPreOrderIterator<'a, N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next()? {
                (Event::Enter, node) => return Some(node),
                (Event::Leave, _) => continue,
            }
        }
    }
}

pub struct DfsPostOrderIterator<'a, N, R>(DfsIterator<'a, N, R>)
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>;

impl<'a, N, R> Iterator for DfsPostOrderIterator<'a, N, R>
where
    N: CfgNode,
    R: CfgRegion<A = N::A, Node = N>,
{
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next()? {
                (Event::Leave, node) => return Some(node),
                (Event::Enter, _) => continue,
            }
        }
    }
}
