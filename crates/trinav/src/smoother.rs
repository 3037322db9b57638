//! Turns a corridor of nodes into way points.
//!
//! The main strategy is a funnel (string pulling) over the portals between consecutive nodes,
//! extended so that every portal where the ground changes slope gets a way point of its own.
//! Without that, a path over a ramp would be pulled straight through the bend in the ground.

use glam::Vec3A;
use thiserror::Error;

use crate::{
    NavMesh, NodeId,
    math::{approx_eq, ground_area},
};

/// The edge crossed when stepping from one node of a path to the next.
///
/// `left` and `right` are as seen when walking along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    /// Left end of the edge.
    pub left: Vec3A,
    /// Right end of the edge.
    pub right: Vec3A,
    /// Whether the two nodes meet at an angle, see [`NavConfig::slope_threshold`](crate::NavConfig::slope_threshold).
    pub slope_change: bool,
}

impl Portal {
    /// A zero-width portal, used for the start and end of a path.
    pub fn point(point: Vec3A) -> Self {
        Self {
            left: point,
            right: point,
            slope_change: false,
        }
    }

    /// The middle of the edge.
    #[inline]
    pub fn midpoint(&self) -> Vec3A {
        (self.left + self.right) * 0.5
    }
}

/// Errors that can occur while smoothing a node path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmoothingError {
    /// Happens when two consecutive nodes of a path are not neighbours.
    /// A path found on a [`NavMesh`] never contains such a pair unless the graph is corrupt.
    #[error("Nodes {from} and {to} follow each other on a path but share no edge")]
    NoSharedEdge {
        /// The node the edge was looked up from
        from: NodeId,
        /// The node that was expected to border `from`
        to: NodeId,
    },
}

/// Collects the portals crossed along `nodes`, bracketed by a zero-width portal at `start` and
/// one at `target`.
///
/// # Errors
///
/// Returns [`SmoothingError::NoSharedEdge`] if two consecutive nodes do not share an edge.
pub fn build_portals(
    mesh: &NavMesh,
    nodes: &[NodeId],
    start: Vec3A,
    target: Vec3A,
    slope_threshold: f32,
) -> Result<Vec<Portal>, SmoothingError> {
    let mut portals = Vec::with_capacity(nodes.len() + 1);
    portals.push(Portal::point(start));
    for pair in nodes.windows(2) {
        let (from, to) = (mesh.node(pair[0]), mesh.node(pair[1]));
        let (edge_start, edge_end) =
            from.shared_edge(to)
                .ok_or(SmoothingError::NoSharedEdge {
                    from: from.id(),
                    to: to.id(),
                })?;
        portals.push(Portal {
            left: edge_end,
            right: edge_start,
            slope_change: from.normal().dot(to.normal()) < slope_threshold,
        });
    }
    portals.push(Portal::point(target));
    Ok(portals)
}

/// Pulls a string through `portals`, from the first portal to the last.
///
/// Way points are only placed at portal corners the string bends around, plus the midpoint of
/// every portal marked as a slope change. The funnel is restarted at each of those midpoints.
/// All side tests are done on the ground (xz) plane.
pub fn string_pull(portals: &[Portal]) -> Vec<Vec3A> {
    let (Some(first), Some(last)) = (portals.first(), portals.last()) else {
        return Vec::new();
    };
    let target = last.left;
    let mut points = vec![first.left];

    let mut apex = first.left;
    let mut left = first.left;
    let mut right = first.right;
    let mut left_index = 0;
    let mut right_index = 0;

    let mut i = 1;
    while i < portals.len() {
        let portal = &portals[i];

        // Right leg
        if ground_area(apex, right, portal.right) <= 0.0 {
            if approx_eq(apex, right) || ground_area(apex, left, portal.right) > 0.0 {
                right = portal.right;
                right_index = i;
            } else {
                // The right leg crossed the left one, the left foot becomes a corner.
                push_way_point(&mut points, left);
                apex = left;
                right = apex;
                right_index = left_index;
                i = left_index + 1;
                continue;
            }
        }

        // Left leg
        if ground_area(apex, left, portal.left) >= 0.0 {
            if approx_eq(apex, left) || ground_area(apex, right, portal.left) < 0.0 {
                left = portal.left;
                left_index = i;
            } else {
                push_way_point(&mut points, right);
                apex = right;
                left = apex;
                left_index = right_index;
                i = right_index + 1;
                continue;
            }
        }

        if portal.slope_change {
            apex = portal.midpoint();
            push_way_point(&mut points, apex);
            left = apex;
            right = apex;
            left_index = i;
            right_index = i;
        }
        i += 1;
    }

    if points.len() == 1 || points.last().is_some_and(|last| !approx_eq(*last, target)) {
        points.push(target);
    }
    points
}

/// A path through the middle of every portal.
pub fn edge_midpoints(portals: &[Portal]) -> Vec<Vec3A> {
    let (Some(first), Some(last)) = (portals.first(), portals.last()) else {
        return Vec::new();
    };
    let mut points = vec![first.left];
    for portal in &portals[1..portals.len() - 1] {
        push_way_point(&mut points, portal.midpoint());
    }
    finish(&mut points, last.left);
    points
}

/// A path from `start` through the centroids of the nodes strictly between the first and the
/// last one, to `target`.
pub fn node_centroids(mesh: &NavMesh, nodes: &[NodeId], start: Vec3A, target: Vec3A) -> Vec<Vec3A> {
    let mut points = vec![start];
    if nodes.len() > 2 {
        for &node in &nodes[1..nodes.len() - 1] {
            push_way_point(&mut points, mesh.node(node).centroid());
        }
    }
    finish(&mut points, target);
    points
}

fn push_way_point(points: &mut Vec<Vec3A>, point: Vec3A) {
    if points.last().is_none_or(|last| !approx_eq(*last, point)) {
        points.push(point);
    }
}

/// Appends `target`, keeping at least two points even if start and target coincide.
fn finish(points: &mut Vec<Vec3A>, target: Vec3A) {
    if points.len() == 1 {
        points.push(target);
    } else {
        push_way_point(points, target);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::vec3a;

    use super::*;
    use crate::test_meshes::{l_corridor, ramp, square, strip};

    const SLOPE_THRESHOLD: f32 = 0.99;

    /// Localizes both points, finds the node path and pulls the string through it.
    #[track_caller]
    fn pull(mesh: &NavMesh, start: Vec3A, target: Vec3A) -> (Vec<NodeId>, Vec<Vec3A>) {
        let from = mesh.find_node(start, 1.2).unwrap();
        let to = mesh.find_node(target, 1.2).unwrap();
        let nodes = mesh.find_node_path(from, to).unwrap();
        let portals = build_portals(mesh, &nodes, start, target, SLOPE_THRESHOLD).unwrap();
        (nodes, string_pull(&portals))
    }

    #[track_caller]
    fn assert_points_eq(actual: &[Vec3A], expected: &[Vec3A]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-4);
        }
    }

    #[test]
    fn portals_are_bracketed_by_endpoints() {
        let mesh = NavMesh::build(&square(0.0)).unwrap();
        let start = vec3a(0.2, 0.0, 0.2);
        let target = vec3a(1.8, 0.0, 1.8);
        let portals =
            build_portals(&mesh, &[NodeId(0), NodeId(1)], start, target, SLOPE_THRESHOLD).unwrap();
        assert_eq!(
            portals,
            vec![
                Portal::point(start),
                Portal {
                    left: vec3a(2.0, 0.0, 0.0),
                    right: vec3a(0.0, 0.0, 2.0),
                    slope_change: false,
                },
                Portal::point(target),
            ]
        );
    }

    #[test]
    fn missing_edge_is_an_error() {
        let mesh = NavMesh::build(&strip(2)).unwrap();
        let err = build_portals(
            &mesh,
            &[NodeId(0), NodeId(3)],
            Vec3A::ZERO,
            Vec3A::X,
            SLOPE_THRESHOLD,
        );
        assert_eq!(
            err,
            Err(SmoothingError::NoSharedEdge {
                from: NodeId(0),
                to: NodeId(3)
            })
        );
    }

    #[test]
    fn same_node_gives_straight_line() {
        let mesh = NavMesh::build(&square(0.0)).unwrap();
        let start = vec3a(0.2, 0.0, 0.2);
        let target = vec3a(0.4, 0.0, 0.9);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(nodes, vec![NodeId(0)]);
        assert_eq!(points, vec![start, target]);
    }

    #[test]
    fn start_equal_to_target_still_has_two_points() {
        let point = vec3a(0.2, 0.0, 0.2);
        let portals = [Portal::point(point), Portal::point(point)];
        assert_eq!(string_pull(&portals), vec![point, point]);
        assert_eq!(edge_midpoints(&portals), vec![point, point]);
        assert!(string_pull(&[]).is_empty());
    }

    #[test]
    fn flat_neighbours_give_straight_line() {
        let mesh = NavMesh::build(&square(0.0)).unwrap();
        let start = vec3a(0.2, 0.0, 0.2);
        let target = vec3a(1.8, 0.0, 1.8);
        let (_, points) = pull(&mesh, start, target);
        assert_eq!(points, vec![start, target]);
    }

    #[test]
    fn slope_change_forces_way_point_at_edge_midpoint() {
        let mesh = NavMesh::build(&square(1.0)).unwrap();
        let start = vec3a(0.2, 0.0, 0.2);
        let target = vec3a(1.8, 0.8, 1.8);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(nodes, vec![NodeId(0), NodeId(1)]);
        assert_points_eq(&points, &[start, vec3a(1.0, 0.0, 1.0), target]);
    }

    #[test]
    fn straight_corridor_needs_no_corners() {
        let mesh = NavMesh::build(&strip(4)).unwrap();
        let start = vec3a(0.2, 0.0, 0.5);
        let target = vec3a(3.8, 0.0, 0.6);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(nodes, (0..8).map(NodeId).collect::<Vec<_>>());
        assert_eq!(points, vec![start, target]);
    }

    #[test]
    fn bends_around_inner_corner() {
        let mesh = NavMesh::build(&l_corridor(false)).unwrap();
        let start = vec3a(0.5, 0.0, 0.5);
        let target = vec3a(2.5, 0.0, 2.5);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(nodes, (0..9).map(NodeId).collect::<Vec<_>>());
        assert_points_eq(&points, &[start, vec3a(2.0, 0.0, 1.0), target]);
    }

    #[test]
    fn bends_around_mirrored_inner_corner() {
        let mesh = NavMesh::build(&l_corridor(true)).unwrap();
        let start = vec3a(0.5, 0.0, 0.5);
        let target = vec3a(2.5, 0.0, -1.5);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(
            nodes,
            [0, 1, 2, 3, 4, 7, 6, 9, 8].map(NodeId).to_vec()
        );
        assert_points_eq(&points, &[start, vec3a(2.0, 0.0, 0.0), target]);
    }

    #[test]
    fn follows_the_ramp() {
        let mesh = NavMesh::build(&ramp()).unwrap();
        let start = vec3a(0.5, 0.0, 0.5);
        let target = vec3a(4.5, 1.0, 0.5);
        let (nodes, points) = pull(&mesh, start, target);
        assert_eq!(nodes, (0..9).map(NodeId).collect::<Vec<_>>());
        assert_points_eq(
            &points,
            &[start, vec3a(2.0, 0.0, 0.5), vec3a(3.0, 1.0, 0.5), target],
        );
    }

    #[test]
    fn way_points_stay_inside_the_corridor() {
        let mesh = NavMesh::build(&l_corridor(false)).unwrap();
        let (nodes, points) = pull(&mesh, vec3a(0.3, 0.0, 0.2), vec3a(2.8, 0.0, 2.3));
        for point in points {
            assert!(
                nodes
                    .iter()
                    .any(|node| mesh.node(*node).contains_point(point, 0.1)),
                "{point} left the corridor"
            );
        }
    }

    #[test]
    fn midpoints_and_centroids() {
        let mesh = NavMesh::build(&strip(2)).unwrap();
        let start = vec3a(0.2, 0.0, 0.5);
        let target = vec3a(1.8, 0.0, 0.5);
        let nodes: Vec<_> = (0..4).map(NodeId).collect();
        let portals = build_portals(&mesh, &nodes, start, target, SLOPE_THRESHOLD).unwrap();

        assert_points_eq(
            &edge_midpoints(&portals),
            &[
                start,
                vec3a(0.5, 0.0, 0.5),
                vec3a(1.0, 0.0, 0.5),
                vec3a(1.5, 0.0, 0.5),
                target,
            ],
        );
        assert_points_eq(
            &node_centroids(&mesh, &nodes, start, target),
            &[
                start,
                vec3a(2.0 / 3.0, 0.0, 2.0 / 3.0),
                vec3a(4.0 / 3.0, 0.0, 1.0 / 3.0),
                target,
            ],
        );
    }
}
