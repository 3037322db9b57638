//! A single triangle of the walkable surface and the point-on-triangle test.

use glam::Vec3A;

use crate::math::{TriangleVertices as _, approx_eq};

/// Identifies a [`NavNode`] within its [`NavMesh`](crate::NavMesh).
///
/// Ids are assigned sequentially while building, starting at zero, so they double as indices
/// into [`NavMesh::nodes`](crate::NavMesh::nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as an index into [`NavMesh::nodes`](crate::NavMesh::nodes).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value as u32)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A triangle of the navigation mesh, i.e. a node of the navigation graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavNode {
    id: NodeId,
    corners: [Vec3A; 3],
    centroid: Vec3A,
    /// Unit normal derived from the corner winding.
    normal: Vec3A,
    /// `d` of the plane equation `normal · p + d = 0`.
    plane_offset: f32,
    neighbours: Vec<NodeId>,
    degenerate: bool,
}

impl NavNode {
    /// Creates a node from three corners in winding order.
    ///
    /// The node is flagged as degenerate if two corners coincide or the corners are collinear,
    /// in which case it never contains any point.
    pub fn new(id: NodeId, a: Vec3A, b: Vec3A, c: Vec3A) -> Self {
        let corners = [a, b, c];
        let normal = corners.normal();
        Self {
            id,
            corners,
            centroid: corners.centroid(),
            normal,
            plane_offset: -normal.dot(a),
            neighbours: Vec::with_capacity(3),
            degenerate: corners.is_degenerate(),
        }
    }

    /// The id of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The three corners in winding order.
    #[inline]
    pub fn corners(&self) -> [Vec3A; 3] {
        self.corners
    }

    /// The average of the three corners.
    #[inline]
    pub fn centroid(&self) -> Vec3A {
        self.centroid
    }

    /// The unit normal of the triangle's plane.
    #[inline]
    pub fn normal(&self) -> Vec3A {
        self.normal
    }

    /// The offset `d` of the plane equation `normal · p + d = 0`.
    #[inline]
    pub fn plane_offset(&self) -> f32 {
        self.plane_offset
    }

    /// The nodes sharing an edge with this one.
    #[inline]
    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    /// Whether two corners of the triangle coincide or all three lie on a line.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Appends `neighbour` to the adjacency list.
    /// Keeping the adjacency symmetric is up to the caller.
    pub fn add_neighbour(&mut self, neighbour: NodeId) {
        self.neighbours.push(neighbour);
    }

    /// Signed distance from `point` to the plane of the triangle, positive on the side the normal points to.
    #[inline]
    pub fn signed_distance(&self, point: Vec3A) -> f32 {
        self.normal.dot(point) + self.plane_offset
    }

    /// Whether `point` is standing on this triangle.
    ///
    /// The point has to be above the triangle's plane, at most `max_distance` away from it,
    /// and its projection onto the plane has to fall inside the triangle. Points exactly on an
    /// edge count as inside.
    pub fn contains_point(&self, point: Vec3A, max_distance: f32) -> bool {
        if self.degenerate {
            return false;
        }
        let distance = self.signed_distance(point);
        // Allow for the point lying exactly on the plane.
        if distance < -crate::math::POINT_EPSILON || distance > max_distance {
            return false;
        }
        let projected = point - self.normal * distance;

        (0..3).all(|i| {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 3];
            (b - a).cross(projected - a).dot(self.normal) >= -crate::math::POINT_EPSILON
        })
    }

    /// Counts how many of this node's corners coincide with a corner of `other`.
    pub fn shared_corner_count(&self, other: &NavNode) -> usize {
        self.corner_matches(other).iter().filter(|m| **m).count()
    }

    /// Returns the edge shared with `other` as `(start, end)` in this node's winding order,
    /// or `None` if the two triangles do not share two corners.
    pub fn shared_edge(&self, other: &NavNode) -> Option<(Vec3A, Vec3A)> {
        let matches = self.corner_matches(other);
        [(0, 1), (1, 2), (2, 0)]
            .into_iter()
            .find(|(i, j)| matches[*i] && matches[*j])
            .map(|(i, j)| (self.corners[i], self.corners[j]))
    }

    fn corner_matches(&self, other: &NavNode) -> [bool; 3] {
        self.corners.map(|corner| {
            other
                .corners
                .iter()
                .any(|other_corner| approx_eq(corner, *other_corner))
        })
    }
}
