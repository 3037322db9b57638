//! Geometric helpers shared by node construction, path search and path smoothing.

use glam::Vec3A;
#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// The tolerance used whenever two points are compared for equality.
///
/// Corners shared between triangles are matched by position rather than by vertex index,
/// since exported meshes routinely duplicate vertices along seams and those copies are not
/// guaranteed to be bit-identical. The same tolerance is used for degeneracy checks, portal
/// construction and for deciding whether a way point was already emitted.
pub const POINT_EPSILON: f32 = 1.0e-5;

/// Returns `true` if `a` and `b` are equal within [`POINT_EPSILON`] on every axis.
#[inline]
pub fn approx_eq(a: Vec3A, b: Vec3A) -> bool {
    (a - b).abs().max_element() <= POINT_EPSILON
}

/// Twice the signed area of the triangle `a, b, c` projected onto the ground (xz) plane.
///
/// The sign tells on which side of the leg `a -> b` the point `c` lies.
/// Every funnel decision has to go through this one function, flipping the sign in a single
/// place swaps "inside" and "outside" of the funnel.
#[inline]
pub(crate) fn ground_area(a: Vec3A, b: Vec3A, c: Vec3A) -> f32 {
    -((c.x - a.x) * (b.z - a.z) - (b.x - a.x) * (c.z - a.z))
}

pub(crate) trait TriangleVertices {
    /// The unit normal of the triangle, or zero if the triangle has no area.
    /// The direction depends on the winding order.
    fn normal(&self) -> Vec3A;
    fn centroid(&self) -> Vec3A;
    /// Whether two of the corners coincide.
    fn has_coincident_corners(&self) -> bool;
    /// Whether the triangle has coincident corners or no area at all.
    fn is_degenerate(&self) -> bool {
        self.has_coincident_corners() || self.normal() == Vec3A::ZERO
    }
}

impl TriangleVertices for [Vec3A; 3] {
    #[inline]
    fn normal(&self) -> Vec3A {
        let [a, b, c] = *self;
        (c - b).cross(a - b).normalize_or_zero()
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        (self[0] + self[1] + self[2]) / 3.0
    }

    #[inline]
    fn has_coincident_corners(&self) -> bool {
        let [a, b, c] = *self;
        approx_eq(a, b) || approx_eq(b, c) || approx_eq(c, a)
    }
}

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct Aabb3d {
    /// The minimum corner
    pub min: Vec3A,
    /// The maximum corner
    pub max: Vec3A,
}

impl Aabb3d {
    /// Creates a new AABB from its two corners.
    pub fn new(min: impl Into<Vec3A>, max: impl Into<Vec3A>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Computes the bounds of a set of points.
    /// Returns `None` if `verts` is empty.
    pub fn from_verts(verts: &[Vec3A]) -> Option<Self> {
        let mut iter = verts.iter();

        let first = iter.next()?;

        let (min, max) = iter.fold((*first, *first), |(prev_min, prev_max), point| {
            (point.min(prev_min), point.max(prev_max))
        });

        Some(Self { min, max })
    }

    /// Whether the point lies inside the box, borders included.
    pub fn contains(&self, point: Vec3A) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::vec3a;

    use super::*;

    #[test]
    fn approx_eq_tolerates_tiny_offsets() {
        let a = vec3a(1.0, 2.0, 3.0);
        assert!(approx_eq(a, a + Vec3A::splat(POINT_EPSILON * 0.5)));
        assert!(!approx_eq(a, a + Vec3A::X * 0.01));
    }

    #[test]
    fn counter_clockwise_from_above_points_up() {
        let triangle = [
            vec3a(0.0, 0.0, 0.0),
            vec3a(0.0, 0.0, 2.0),
            vec3a(2.0, 0.0, 0.0),
        ];
        assert_abs_diff_eq!(triangle.normal(), Vec3A::Y, epsilon = 1e-6);
        assert_abs_diff_eq!(
            triangle.centroid(),
            vec3a(2.0 / 3.0, 0.0, 2.0 / 3.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn collinear_triangle_has_zero_normal() {
        let triangle = [
            vec3a(0.0, 0.0, 0.0),
            vec3a(1.0, 0.0, 0.0),
            vec3a(2.0, 0.0, 0.0),
        ];
        assert_eq!(triangle.normal(), Vec3A::ZERO);
        assert!(!triangle.has_coincident_corners());
        assert!(triangle.is_degenerate());
    }

    #[test]
    fn ground_area_sign_depends_on_side() {
        let apex = Vec3A::ZERO;
        let ahead = vec3a(0.0, 0.0, 1.0);
        let side_a = vec3a(1.0, 5.0, 0.5);
        let side_b = vec3a(-1.0, -5.0, 0.5);
        assert!(ground_area(apex, ahead, side_a) < 0.0);
        assert!(ground_area(apex, ahead, side_b) > 0.0);
        assert_eq!(ground_area(apex, ahead, ahead * 3.0), 0.0);
    }

    #[test]
    fn aabb_from_verts() {
        assert_eq!(Aabb3d::from_verts(&[]), None);
        let aabb = Aabb3d::from_verts(&[
            vec3a(1.0, -1.0, 0.0),
            vec3a(-2.0, 3.0, 1.0),
            vec3a(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(aabb, Aabb3d::new([-2.0, -1.0, 0.0], [1.0, 3.0, 5.0]));
        assert!(aabb.contains(vec3a(0.0, 0.0, 0.0)));
        assert!(!aabb.contains(vec3a(0.0, 4.0, 0.0)));
    }
}
