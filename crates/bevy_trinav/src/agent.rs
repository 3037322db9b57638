//! Agents following a target entity over the [`Navigation`] mesh.

use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use bevy_transform::components::GlobalTransform;
use glam::Vec3;
use trinav::NavActor;

use crate::{NavSettings, Navigation};

/// Steers its entity towards the entity in [`NavAgent::target`].
///
/// The way point to head for is written to [`NavSteering`] every frame. Moving the entity is
/// left to the user, who can read the steering after [`NavSystems::Steer`](crate::NavSystems::Steer).
#[derive(Component, Debug, Clone)]
#[require(NavSteering)]
pub struct NavAgent {
    /// The entity to walk to. Needs a [`GlobalTransform`].
    pub target: Entity,
    actor: NavActor,
}

impl NavAgent {
    /// Creates an agent walking to `target`.
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            actor: NavActor::new(),
        }
    }

    /// The path following state of this agent.
    pub fn actor(&self) -> &NavActor {
        &self.actor
    }

    /// Forgets the current path, e.g. after teleporting the agent.
    pub fn reset(&mut self) {
        self.actor.reset();
    }
}

/// Where a [`NavAgent`] should go next.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component, Default)]
pub struct NavSteering {
    /// The way point to head for. `None` if there is no navigation mesh or no target.
    pub way_point: Option<Vec3>,
    /// Height of the current way point above the previous one.
    pub slope: f32,
    /// Whether the agent is walking up a slope steeper than
    /// [`NavConfig::climb_threshold`](trinav::NavConfig::climb_threshold).
    /// Useful for turning off gravity or adding a climbing force.
    pub climbing: bool,
}

/// Gives access to the [`NavActor`] of a component, for debug drawing.
pub trait HasNavActor: Component {
    /// The navigation state to draw.
    fn nav_actor(&self) -> &NavActor;
}

impl HasNavActor for NavAgent {
    fn nav_actor(&self) -> &NavActor {
        &self.actor
    }
}

pub(crate) fn update_nav_agents(
    navigation: Res<Navigation>,
    settings: Res<NavSettings>,
    mut agents: Query<(Entity, &GlobalTransform, &mut NavAgent, &mut NavSteering)>,
    targets: Query<&GlobalTransform>,
) {
    let Some(mesh) = navigation.0.as_ref() else {
        return;
    };
    for (entity, transform, mut agent, mut steering) in &mut agents {
        let Ok(target) = targets.get(agent.target) else {
            *steering = NavSteering::default();
            continue;
        };
        match agent.actor.way_point(
            mesh,
            &settings.0,
            transform.translation_vec3a(),
            target.translation_vec3a(),
        ) {
            Ok(way_point) => {
                *steering = NavSteering {
                    way_point: Some(way_point.into()),
                    slope: agent.actor.slope().unwrap_or_default(),
                    climbing: agent.actor.is_climbing(settings.climb_threshold),
                };
            }
            Err(err) => {
                tracing::error!("Failed to steer agent {entity}: {err}");
                agent.actor.reset();
                *steering = NavSteering::default();
            }
        }
    }
}
