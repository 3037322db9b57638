#![doc = include_str!("../../../readme.md")]

use bevy_app::prelude::*;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use trinav::{NavConfig, NavMesh, NavMeshBuildError, TriMesh};

mod agent;
#[cfg(feature = "debug_plugin")]
pub mod debug;
#[cfg(feature = "bevy_mesh")]
mod mesh;

pub use agent::{HasNavActor, NavAgent, NavSteering};
#[cfg(feature = "bevy_mesh")]
pub use mesh::{MeshConversionError, TriMeshFromBevyMesh};
pub use trinav;

/// Everything you need to get started with navigation.
pub mod prelude {
    #[cfg(feature = "bevy_mesh")]
    pub use crate::TriMeshFromBevyMesh as _;
    #[cfg(feature = "debug_plugin")]
    pub use crate::debug::{NavDebugPlugin, NavGizmoConfig};
    pub use crate::{
        NavAgent, NavSettings, NavSteering, NavSystems, Navigation, TrinavPlugin,
    };
}

/// The main plugin of the crate. Steers every [`NavAgent`] over the [`Navigation`] mesh.
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct TrinavPlugin;

impl Plugin for TrinavPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NavSettings>()
            .register_type::<NavSteering>()
            .init_resource::<NavSettings>()
            .init_resource::<Navigation>();
        app.add_systems(
            Update,
            agent::update_nav_agents.in_set(NavSystems::Steer),
        );
    }
}

/// System sets of [`TrinavPlugin`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavSystems {
    /// Updates [`NavSteering`] of all agents. Move agents after this set.
    Steer,
}

/// The tuning parameters used by all agents.
#[derive(Resource, Debug, Clone, PartialEq, Default, Deref, DerefMut, Reflect)]
#[reflect(Resource, Default)]
pub struct NavSettings(pub NavConfig);

/// The navigation mesh agents walk on. Agents stand still while this is `None`.
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct Navigation(pub Option<NavMesh>);

impl Navigation {
    /// Builds the navigation mesh for a walkable surface, see [`NavMesh::build`].
    pub fn build(trimesh: &TriMesh) -> Result<Self, NavMeshBuildError> {
        Ok(Self(Some(NavMesh::build(trimesh)?)))
    }
}
