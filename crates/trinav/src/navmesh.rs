//! The navigation graph: building it from a [`TriMesh`], localizing points on it and
//! keeping a [`NavPath`] up to date while its target moves.

use glam::Vec3A;
use thiserror::Error;

use crate::{
    NavConfig, NavNode, NodeId, PathStyle, TriMesh,
    math::{Aabb3d, TriangleVertices as _},
    path::{NavPath, PathUpdate},
    smoother::{self, SmoothingError},
    trimesh::MeshInputError,
};

/// A graph of walkable triangles where two triangles are linked iff they share an edge.
///
/// The topology is fixed once built. All queries take `&self`, searches keep their state
/// to themselves.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMesh {
    nodes: Vec<NavNode>,
    link_count: usize,
    aabb: Aabb3d,
}

/// Where a query point ended up on a [`NavMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Localized {
    /// The node the point was assigned to.
    pub node: NodeId,
    /// The point itself if it stands on [`Self::node`], otherwise the node's centroid.
    pub point: Vec3A,
    /// Whether the point was found standing on the mesh.
    pub on_mesh: bool,
}

impl NavMesh {
    /// Builds the navigation graph for a walkable surface.
    ///
    /// Triangles with coincident corners or no area are skipped. Every other triangle becomes a
    /// [`NavNode`] with an id counting up from zero in input order, so the ids only match the
    /// triangle indices of `trimesh` if nothing was skipped.
    ///
    /// Linking compares every pair of triangles, which is quadratic in the triangle count.
    /// This is meant to run once while loading a level.
    ///
    /// # Errors
    ///
    /// - [`NavMeshBuildError::DuplicateTriangle`] if two triangles share all three corners.
    /// - [`NavMeshBuildError::MeshInput`] if an index points past the vertex buffer.
    pub fn build(trimesh: &TriMesh) -> Result<Self, NavMeshBuildError> {
        let mut nodes: Vec<NavNode> = Vec::with_capacity(trimesh.triangle_count());
        // Input triangle index of every node, for error reporting
        let mut sources = Vec::with_capacity(trimesh.triangle_count());
        let mut skipped = 0_usize;

        for index in 0..trimesh.triangle_count() {
            let corners = trimesh.triangle(index)?;
            if corners.is_degenerate() {
                tracing::debug!("Skipping degenerate triangle {index}: {corners:?}");
                skipped += 1;
                continue;
            }
            let [a, b, c] = corners;
            nodes.push(NavNode::new(NodeId::from(nodes.len()), a, b, c));
            sources.push(index);
        }
        if skipped > 0 {
            tracing::warn!(
                "Skipped {skipped} degenerate triangles out of {}",
                trimesh.triangle_count()
            );
        }

        let mut link_count = 0;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                match nodes[i].shared_corner_count(&nodes[j]) {
                    3 => {
                        return Err(NavMeshBuildError::DuplicateTriangle {
                            first: sources[i],
                            second: sources[j],
                        });
                    }
                    2 => {
                        let (a, b) = (nodes[i].id(), nodes[j].id());
                        nodes[i].add_neighbour(b);
                        nodes[j].add_neighbour(a);
                        link_count += 1;
                    }
                    _ => {}
                }
            }
        }

        let corners: Vec<Vec3A> = nodes.iter().flat_map(NavNode::corners).collect();
        let aabb = Aabb3d::from_verts(&corners).unwrap_or_default();
        tracing::info!(
            "Built navigation mesh with {} nodes and {link_count} links",
            nodes.len()
        );

        Ok(Self {
            nodes,
            link_count,
            aabb,
        })
    }

    /// All nodes, indexed by [`NodeId::index`].
    #[inline]
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// The node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this mesh.
    #[inline]
    pub fn node(&self, id: NodeId) -> &NavNode {
        &self.nodes[id.index()]
    }

    /// The node with the given id, or `None` if there is no such node.
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&NavNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the mesh has no walkable triangles at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected links between nodes.
    #[inline]
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// The bounds of all nodes. Zero-sized at the origin for an empty mesh.
    #[inline]
    pub fn aabb(&self) -> Aabb3d {
        self.aabb
    }

    /// Finds the first node `point` is standing on, see [`NavNode::contains_point`].
    pub fn find_node(&self, point: Vec3A, max_distance: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.contains_point(point, max_distance))
            .map(NavNode::id)
    }

    /// Finds the node whose centroid is closest to `point`.
    /// Only returns `None` if the mesh is empty.
    pub fn find_closest_node(&self, point: Vec3A) -> Option<NodeId> {
        self.nodes
            .iter()
            .min_by(|a, b| {
                a.centroid()
                    .distance_squared(point)
                    .total_cmp(&b.centroid().distance_squared(point))
            })
            .map(NavNode::id)
    }

    /// Puts `point` onto the mesh.
    ///
    /// Points not standing on any node are moved to the centroid of the closest node, height
    /// included. Only returns `None` if the mesh is empty.
    pub fn localize(&self, point: Vec3A, max_distance: f32) -> Option<Localized> {
        if let Some(node) = self.find_node(point, max_distance) {
            return Some(Localized {
                node,
                point,
                on_mesh: true,
            });
        }
        let node = self.find_closest_node(point)?;
        let centroid = self.node(node).centroid();
        tracing::debug!("{point} is not on the navigation mesh, using centroid {centroid} of {node}");
        Some(Localized {
            node,
            point: centroid,
            on_mesh: false,
        })
    }

    /// Keeps `path` leading from `agent` to `target`.
    ///
    /// The path is only planned again if it is empty or if `target` has moved more than
    /// [`NavConfig::replan_margin`] away from the end of the path. The agent moving along the path
    /// never causes planning. On [`PathUpdate::Unchanged`] the path is left untouched, on
    /// [`PathUpdate::Unreachable`] it is cleared.
    ///
    /// # Errors
    ///
    /// Returns a [`SmoothingError`] if two consecutive nodes of the planned route do not share an
    /// edge, which means the graph is corrupt.
    pub fn make_path(
        &self,
        agent: Vec3A,
        target: Vec3A,
        config: &NavConfig,
        path: &mut NavPath,
    ) -> Result<PathUpdate, SmoothingError> {
        let (Some(start), Some(end)) = (
            self.localize(agent, config.max_ground_distance),
            self.localize(target, config.max_ground_distance),
        ) else {
            path.clear();
            return Ok(PathUpdate::Unreachable);
        };

        let target_moved = path
            .points()
            .last()
            .is_none_or(|last| last.distance(end.point) > config.replan_margin);
        if !path.nodes().is_empty() && !target_moved {
            return Ok(PathUpdate::Unchanged);
        }

        let Some(nodes) = self.find_node_path(start.node, end.node) else {
            tracing::debug!(
                "No route from {} to {}, the nodes are not connected",
                start.node,
                end.node
            );
            path.clear();
            return Ok(PathUpdate::Unreachable);
        };

        let portals =
            smoother::build_portals(self, &nodes, start.point, end.point, config.slope_threshold)?;
        let points = match config.path_style {
            PathStyle::Funnel => smoother::string_pull(&portals),
            PathStyle::EdgeMidpoints => smoother::edge_midpoints(&portals),
            PathStyle::NodeCentroids => {
                smoother::node_centroids(self, &nodes, start.point, end.point)
            }
        };
        tracing::debug!(
            "Planned {} way points across {} nodes",
            points.len(),
            nodes.len()
        );
        path.replace(nodes, points, portals);
        Ok(PathUpdate::Rebuilt)
    }
}

/// Errors that can occur when building a [`NavMesh`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavMeshBuildError {
    /// Happens when two triangles share all three corners.
    #[error("Triangles {first} and {second} are duplicates of each other")]
    DuplicateTriangle {
        /// Index of the first triangle in the input mesh
        first: usize,
        /// Index of the second triangle in the input mesh
        second: usize,
    },
    /// Happens when the input mesh is malformed.
    #[error(transparent)]
    MeshInput(#[from] MeshInputError),
}
