//! Hop-count shortest paths over the navigation graph.
//!
//! Every search keeps its bookkeeping in buffers it owns, indexed by [`NodeId`], so a
//! [`NavMesh`] can be searched from several places at once without any of them stepping on
//! each other's state.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{NavMesh, NodeId};

/// Dijkstra over the adjacency graph where every edge costs one hop.
pub(crate) struct HopSearch {
    hops: Vec<u32>,
    predecessors: Vec<Option<NodeId>>,
}

impl HopSearch {
    const UNREACHED: u32 = u32::MAX;

    /// Searches outwards from `source`. Stops as soon as `stop_at` is settled,
    /// or runs over the whole connected component if there is nothing to stop at.
    pub(crate) fn run(mesh: &NavMesh, source: NodeId, stop_at: Option<NodeId>) -> Self {
        let node_count = mesh.len();
        let mut search = Self {
            hops: vec![Self::UNREACHED; node_count],
            predecessors: vec![None; node_count],
        };
        let mut settled = vec![false; node_count];
        let mut open = BinaryHeap::new();

        search.hops[source.index()] = 0;
        open.push(Reverse((0_u32, source)));

        while let Some(Reverse((hops, current))) = open.pop() {
            if settled[current.index()] {
                continue;
            }
            settled[current.index()] = true;
            if Some(current) == stop_at {
                break;
            }

            for &neighbour in mesh.node(current).neighbours() {
                if settled[neighbour.index()] {
                    continue;
                }
                let candidate = hops + 1;
                if candidate < search.hops[neighbour.index()] {
                    search.hops[neighbour.index()] = candidate;
                    search.predecessors[neighbour.index()] = Some(current);
                    open.push(Reverse((candidate, neighbour)));
                }
            }
        }
        search
    }

    pub(crate) fn hops(&self, node: NodeId) -> Option<u32> {
        let hops = self.hops[node.index()];
        (hops != Self::UNREACHED).then_some(hops)
    }

    /// Walks the predecessor links back from `end` to `source`.
    /// Returns `None` if `end` was never reached.
    pub(crate) fn path_to(&self, source: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
        let hops = self.hops(end)?;
        let mut path = Vec::with_capacity(hops as usize + 1);
        let mut current = end;
        path.push(current);
        while current != source {
            current = self.predecessors[current.index()]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

impl NavMesh {
    /// Finds a path from `start` to `end` with the fewest triangle-to-triangle hops.
    ///
    /// The returned path begins with `start` and ends with `end`; `find_node_path(a, a)` is `[a]`.
    /// Returns `None` if the two nodes lie on disconnected parts of the mesh, or if either id
    /// does not belong to this mesh.
    pub fn find_node_path(&self, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
        if start.index() >= self.len() || end.index() >= self.len() {
            return None;
        }
        HopSearch::run(self, start, Some(end)).path_to(start, end)
    }

    /// Computes the hop distance from every node to `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` does not belong to this mesh.
    pub fn distance_field(&self, target: NodeId) -> DistanceField {
        let search = HopSearch::run(self, target, None);
        DistanceField {
            target,
            steps: (0..self.len())
                .map(|i| search.hops(NodeId::from(i)))
                .collect(),
        }
    }
}

/// The number of hops from every node of a [`NavMesh`] to one target node.
///
/// Useful for heat-map style debug views, and for steering many agents towards the same target
/// by following the gradient with [`DistanceField::descend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    target: NodeId,
    steps: Vec<Option<u32>>,
}

impl DistanceField {
    /// The node the distances are measured to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Hops from `node` to the target, `None` if the target cannot be reached from `node`.
    pub fn steps(&self, node: NodeId) -> Option<u32> {
        self.steps.get(node.index()).copied().flatten()
    }

    /// The largest finite distance in the field.
    pub fn max_steps(&self) -> u32 {
        self.steps.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Iterates over all nodes and their distance to the target.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Option<u32>)> + '_ {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, steps)| (NodeId::from(i), *steps))
    }

    /// Follows the steepest descent from `start` to the target, always stepping onto the
    /// neighbour closest to the target.
    ///
    /// The result has the same number of hops as [`NavMesh::find_node_path`] from `start` to the
    /// target. Returns `None` if the target is not reachable from `start`.
    pub fn descend(&self, mesh: &NavMesh, start: NodeId) -> Option<Vec<NodeId>> {
        let mut steps = self.steps(start)?;
        let mut path = Vec::with_capacity(steps as usize + 1);
        let mut current = start;
        path.push(current);
        while steps != 0 {
            let (next, next_steps) = mesh
                .node(current)
                .neighbours()
                .iter()
                .filter_map(|&neighbour| Some((neighbour, self.steps(neighbour)?)))
                .min_by_key(|(_, steps)| *steps)?;
            current = next;
            steps = next_steps;
            path.push(current);
        }
        Some(path)
    }
}
