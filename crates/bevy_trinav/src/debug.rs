//! Gizmo overlays for the navigation mesh and the paths of agents.

use std::marker::PhantomData;

use bevy_app::prelude::*;
use bevy_color::{Color, palettes::tailwind};
use bevy_ecs::prelude::*;
use bevy_gizmos::prelude::*;
use bevy_reflect::prelude::*;
use glam::Vec3;
use trinav::{NavNode, NodeId};

use crate::{HasNavActor, NavAgent, Navigation};

/// Draws the [`Navigation`] mesh and the paths of all `T`s with gizmos.
///
/// Any component implementing [`HasNavActor`] can be drawn, so agents driven by custom AI
/// code show up as well. What is drawn is controlled by [`NavGizmoConfig`].
///
/// Needs the gizmo plugin, which is part of Bevy's `DefaultPlugins`. Adding the plugin for
/// several component types draws the mesh only once.
pub struct NavDebugPlugin<T: HasNavActor = NavAgent>(PhantomData<T>);

impl<T: HasNavActor> Default for NavDebugPlugin<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: HasNavActor> Plugin for NavDebugPlugin<T> {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<NavGizmoConfig>() {
            app.register_type::<NavGizmoConfig>()
                .init_resource::<NavGizmoConfig>();
            app.add_systems(
                PostUpdate,
                draw_nav_mesh.run_if(|config: Res<NavGizmoConfig>| config.triangles),
            );
        }
        app.add_systems(PostUpdate, draw_agent_paths::<T>);
    }
}

/// Toggles the overlays of [`NavDebugPlugin`].
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource, Default)]
pub struct NavGizmoConfig {
    /// Outline every triangle of the mesh.
    pub triangles: bool,
    /// Outline the triangles an agent walks through, coloured by how many steps they are away
    /// from the target.
    pub node_path: bool,
    /// Draw the way points an agent follows.
    pub point_path: bool,
    /// Draw the edges an agent's path was pulled through.
    pub portals: bool,
}

impl Default for NavGizmoConfig {
    fn default() -> Self {
        Self {
            triangles: true,
            node_path: true,
            point_path: true,
            portals: false,
        }
    }
}

const NODE_PATH_LIFT: f32 = 0.05;
const PORTAL_LIFT: f32 = 0.1;
const POINT_PATH_LIFT: f32 = 0.2;

fn draw_nav_mesh(navigation: Res<Navigation>, mut gizmos: Gizmos) {
    let Some(mesh) = navigation.0.as_ref() else {
        return;
    };
    for node in mesh.nodes() {
        gizmos.linestrip(outline(node, 0.0), tailwind::ORANGE_700);
    }
}

fn draw_agent_paths<T: HasNavActor>(
    navigation: Res<Navigation>,
    config: Res<NavGizmoConfig>,
    agents: Query<&T>,
    mut gizmos: Gizmos,
) {
    let Some(mesh) = navigation.0.as_ref() else {
        return;
    };
    for agent in &agents {
        let actor = agent.nav_actor();

        if config.node_path
            && let Some(&target) = actor.node_path().last()
        {
            let field = mesh.distance_field(target);
            let max_steps = field.max_steps().max(1) as f32;
            for &id in actor.node_path() {
                let Some(node) = mesh.get_node(id) else {
                    continue;
                };
                let steps = field.steps(id).unwrap_or_default() as f32;
                gizmos.linestrip(outline(node, NODE_PATH_LIFT), heat(steps / max_steps));
            }
            draw_node_links(&mut gizmos, mesh, actor.node_path());
        }

        if config.portals {
            for portal in actor.portals() {
                let color = if portal.slope_change {
                    tailwind::RED_500
                } else {
                    tailwind::CYAN_400
                };
                gizmos.line(
                    lift(portal.left.into(), PORTAL_LIFT),
                    lift(portal.right.into(), PORTAL_LIFT),
                    color,
                );
            }
        }

        if config.point_path {
            gizmos.linestrip(
                actor
                    .point_path()
                    .iter()
                    .map(|point| lift((*point).into(), POINT_PATH_LIFT)),
                tailwind::YELLOW_300,
            );
        }
    }
}

/// Connects the centroids of consecutive nodes.
fn draw_node_links(gizmos: &mut Gizmos, mesh: &trinav::NavMesh, nodes: &[NodeId]) {
    gizmos.linestrip(
        nodes
            .iter()
            .filter_map(|id| mesh.get_node(*id))
            .map(|node| lift(node.centroid().into(), NODE_PATH_LIFT)),
        tailwind::SLATE_400,
    );
}

/// The corners of `node` lifted by `height`, closed back to the first corner.
fn outline(node: &NavNode, height: f32) -> impl Iterator<Item = Vec3> {
    let [a, b, c] = node.corners();
    [a, b, c, a]
        .into_iter()
        .map(move |corner| lift(corner.into(), height))
}

fn lift(point: Vec3, height: f32) -> Vec3 {
    point + Vec3::Y * height
}

/// Blue at the target, red far away from it.
fn heat(fraction: f32) -> Color {
    Color::hsl(240.0 * (1.0 - fraction.clamp(0.0, 1.0)), 1.0, 0.5)
}
