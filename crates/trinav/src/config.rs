#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// The tuning parameters of path planning and path following.
///
/// All distances are in world units. The defaults are chosen for a human-sized agent in a world
/// measured in meters; meshes of a very different scale will want to scale the distances along.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct NavConfig {
    /// How far above a triangle a point may be and still count as standing on it. `[Limit: >= 0] [Units: wu]`
    ///
    /// Measured along the triangle's normal. Should be a bit more than the distance between the
    /// agent's origin and its feet.
    pub max_ground_distance: f32,

    /// How far the target has to move away from the end of the current path before the path is
    /// planned again. `[Limit: >= 0] [Units: wu]`
    ///
    /// Movement of the agent itself never triggers planning.
    pub replan_margin: f32,

    /// Two adjacent triangles whose normals have a dot product below this value are considered
    /// to meet at a slope change. `[Limits: -1 <= value <= 1]`
    ///
    /// The funnel forces a way point at every slope change, so that paths follow ramps and
    /// stairs instead of cutting straight through them.
    pub slope_threshold: f32,

    /// An agent closer than this to its current way point moves on to the next one. `[Limit: > 0] [Units: wu]`
    pub way_point_radius: f32,

    /// Rise towards the next way point above which the agent is considered to be climbing. `[Limit: >= 0] [Units: wu]`
    pub climb_threshold: f32,

    /// How the node path is turned into way points.
    pub path_style: PathStyle,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_ground_distance: 1.2,
            replan_margin: 1.0,
            slope_threshold: 0.99,
            way_point_radius: 1.0,
            climb_threshold: 0.1,
            path_style: PathStyle::Funnel,
        }
    }
}

/// The strategies for turning a corridor of triangles into way points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub enum PathStyle {
    /// Pull the path tight along the corridor, with extra way points where the slope changes.
    #[default]
    Funnel,
    /// Go through the middle of every edge crossed.
    EdgeMidpoints,
    /// Go through the centroid of every triangle visited.
    NodeCentroids,
}
