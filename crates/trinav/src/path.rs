use glam::Vec3A;

use crate::{NodeId, smoother::Portal};

/// A planned route: the corridor of nodes, the way points through it and the portals
/// the way points were pulled through.
///
/// Filled in place by [`NavMesh::make_path`](crate::NavMesh::make_path), so an agent can keep
/// one around and reuse its allocations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavPath {
    nodes: Vec<NodeId>,
    points: Vec<Vec3A>,
    portals: Vec<Portal>,
}

impl NavPath {
    /// The nodes from the agent's node to the target's node.
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The way points, starting at the agent and ending at the target.
    #[inline]
    pub fn points(&self) -> &[Vec3A] {
        &self.points
    }

    /// The portals of the corridor, bracketed by a zero-width portal at either end.
    #[inline]
    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    /// Whether there is nothing to follow.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forgets the route while keeping the allocations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.points.clear();
        self.portals.clear();
    }

    pub(crate) fn replace(&mut self, nodes: Vec<NodeId>, points: Vec<Vec3A>, portals: Vec<Portal>) {
        self.nodes = nodes;
        self.points = points;
        self.portals = portals;
    }
}

/// What [`NavMesh::make_path`](crate::NavMesh::make_path) did to the path it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathUpdate {
    /// The target is still close to the end of the path, nothing changed.
    Unchanged,
    /// The path was planned again from the agent's current position.
    Rebuilt,
    /// There is no route to the target. The path was cleared.
    Unreachable,
}
