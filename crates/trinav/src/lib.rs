#![doc = include_str!("../../../readme.md")]

mod actor;
mod config;
pub(crate) mod math;
mod navmesh;
mod node;
mod path;
mod search;
mod smoother;
#[cfg(test)]
mod test_meshes;
mod trimesh;

pub use actor::NavActor;
pub use config::{NavConfig, PathStyle};
pub use math::{Aabb3d, POINT_EPSILON, approx_eq};
pub use navmesh::{Localized, NavMesh, NavMeshBuildError};
pub use node::{NavNode, NodeId};
pub use path::{NavPath, PathUpdate};
pub use search::DistanceField;
pub use smoother::{Portal, SmoothingError, build_portals, edge_midpoints, node_centroids, string_pull};
pub use trimesh::{MeshInputError, PrimitiveTopology, TriMesh, VertexLayout};
