//! Following a path one way point at a time.

use glam::Vec3A;

use crate::{
    NavConfig, NavMesh, NodeId,
    path::{NavPath, PathUpdate},
    smoother::{Portal, SmoothingError},
};

/// The navigation state of a single agent: its current path and the way point it is heading to.
///
/// The actor does not know where the agent is, the position is passed in on every query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavActor {
    path: NavPath,
    way_point_index: usize,
}

impl NavActor {
    /// Creates an actor without a path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the point the agent at `agent` should steer towards to reach `target`.
    ///
    /// Keeps the path up to date via [`NavMesh::make_path`]. A freshly planned path is followed
    /// from its second way point, the first being the agent's own position. On an unchanged path,
    /// the agent moves on to the next way point once it is within
    /// [`NavConfig::way_point_radius`] of the current one. The final way point is never skipped.
    ///
    /// If the target cannot be reached, the agent is told to stay where it is.
    pub fn way_point(
        &mut self,
        mesh: &NavMesh,
        config: &NavConfig,
        agent: Vec3A,
        target: Vec3A,
    ) -> Result<Vec3A, SmoothingError> {
        match mesh.make_path(agent, target, config, &mut self.path)? {
            PathUpdate::Rebuilt => self.way_point_index = 1,
            PathUpdate::Unreachable => {
                self.way_point_index = 0;
                return Ok(agent);
            }
            PathUpdate::Unchanged => {
                let points = self.path.points();
                let index = self.way_point_index;
                if index + 1 < points.len() && points[index].distance(agent) < config.way_point_radius
                {
                    self.way_point_index += 1;
                }
            }
        }
        Ok(self.current_way_point().unwrap_or(agent))
    }

    /// The way point the agent is heading to, if it has a path.
    pub fn current_way_point(&self) -> Option<Vec3A> {
        self.path.points().get(self.way_point_index).copied()
    }

    /// Height of the current way point above the previous one.
    ///
    /// Positive while climbing, negative while descending. `None` until a path was planned.
    pub fn slope(&self) -> Option<f32> {
        let previous = self.way_point_index.checked_sub(1)?;
        let points = self.path.points();
        Some(points.get(self.way_point_index)?.y - points.get(previous)?.y)
    }

    /// Whether the current way point is more than `climb_threshold` above the previous one.
    pub fn is_climbing(&self, climb_threshold: f32) -> bool {
        self.slope().is_some_and(|slope| slope > climb_threshold)
    }

    /// The current path.
    #[inline]
    pub fn path(&self) -> &NavPath {
        &self.path
    }

    /// The nodes of the current path.
    #[inline]
    pub fn node_path(&self) -> &[NodeId] {
        self.path.nodes()
    }

    /// The way points of the current path, the first one being where the agent was when the
    /// path was planned.
    #[inline]
    pub fn point_path(&self) -> &[Vec3A] {
        self.path.points()
    }

    /// The portals the current path was pulled through.
    #[inline]
    pub fn portals(&self) -> &[Portal] {
        self.path.portals()
    }

    /// Index into [`Self::point_path`] of the current way point.
    #[inline]
    pub fn way_point_index(&self) -> usize {
        self.way_point_index
    }

    /// Drops the path, so that the next query plans from scratch.
    pub fn reset(&mut self) {
        self.path.clear();
        self.way_point_index = 0;
    }
}
