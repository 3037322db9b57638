use bevy_mesh::{Mesh, PrimitiveTopology};
use bevy_transform::components::GlobalTransform;
use thiserror::Error;
use trinav::{MeshInputError, TriMesh, VertexLayout};

/// Used to add [`TriMeshFromBevyMesh::from_mesh`] to [`TriMesh`].
pub trait TriMeshFromBevyMesh: Sized {
    /// Converts a [`Mesh`] into a [`TriMesh`] in the mesh's local space.
    ///
    /// Meshes without an index buffer are read as a plain triangle list.
    fn from_mesh(mesh: &Mesh) -> Result<Self, MeshConversionError>;

    /// Converts a [`Mesh`] into a [`TriMesh`] and moves its vertices into world space.
    fn from_mesh_with_transform(
        mesh: &Mesh,
        transform: &GlobalTransform,
    ) -> Result<Self, MeshConversionError>;
}

impl TriMeshFromBevyMesh for TriMesh {
    fn from_mesh(mesh: &Mesh) -> Result<TriMesh, MeshConversionError> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return Err(MeshConversionError::UnsupportedTopology(
                mesh.primitive_topology(),
            ));
        }
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .ok_or(MeshConversionError::MissingPositions)?
            .as_float3()
            .ok_or(MeshConversionError::PositionsNotFloat3)?;

        let indices: Vec<u32> = match mesh.indices() {
            Some(indices) => indices.iter().map(|i| i as u32).collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let trimesh = TriMesh::from_interleaved(
            positions.as_flattened(),
            VertexLayout::POSITIONS_ONLY,
            &indices,
            trinav::PrimitiveTopology::TriangleList,
        )?;
        Ok(trimesh)
    }

    fn from_mesh_with_transform(
        mesh: &Mesh,
        transform: &GlobalTransform,
    ) -> Result<TriMesh, MeshConversionError> {
        let mut trimesh = TriMesh::from_mesh(mesh)?;
        let affine = transform.affine();
        for vertex in &mut trimesh.vertices {
            *vertex = affine.transform_point3a(*vertex);
        }
        Ok(trimesh)
    }
}

/// Errors that can occur when converting a [`Mesh`] into a [`TriMesh`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshConversionError {
    /// Happens when the mesh is not a triangle list.
    #[error("Navigation meshes must be built from a triangle list, got {0:?}")]
    UnsupportedTopology(PrimitiveTopology),
    /// Happens when the mesh has no [`Mesh::ATTRIBUTE_POSITION`].
    #[error("Mesh has no vertex positions")]
    MissingPositions,
    /// Happens when the positions are not stored as three floats per vertex.
    #[error("Mesh vertex positions are not stored as `[f32; 3]`")]
    PositionsNotFloat3,
    /// Happens when the index buffer does not fit the vertices.
    #[error(transparent)]
    Input(#[from] MeshInputError),
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use bevy_asset::RenderAssetUsages;
    use bevy_mesh::Indices;
    use bevy_transform::components::Transform;
    use glam::{UVec3, Vec3A};

    use super::*;

    #[test]
    fn converts_star() {
        let mesh = star();
        let trimesh = TriMesh::from_mesh(&mesh).unwrap();

        let expected_pos = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .unwrap()
            .as_float3()
            .unwrap();
        assert_eq!(expected_pos.len(), trimesh.vertices.len(), "vertex len");

        let Some(Indices::U32(expected_indices)) = mesh.indices() else {
            panic!("Expected U32 indices");
        };
        assert_eq!(
            expected_indices.len() / 3,
            trimesh.indices.len(),
            "index len"
        );

        for (expected_vert, vert) in expected_pos.iter().zip(trimesh.vertices.iter()) {
            assert_eq!(expected_vert, &vert.to_array());
        }
        for (expected_index, index) in expected_indices.chunks(3).zip(trimesh.indices.iter()) {
            assert_eq!(expected_index, index.to_array());
        }
    }

    #[test]
    fn rejects_triangle_strip() {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleStrip, RenderAssetUsages::all());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0_f32; 3]; 4]);
        assert_eq!(
            TriMesh::from_mesh(&mesh),
            Err(MeshConversionError::UnsupportedTopology(
                PrimitiveTopology::TriangleStrip
            ))
        );
    }

    #[test]
    fn rejects_mesh_without_positions() {
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::all());
        assert_eq!(
            TriMesh::from_mesh(&mesh),
            Err(MeshConversionError::MissingPositions)
        );
    }

    #[test]
    fn reads_unindexed_mesh_in_world_space() {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::all());
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[0.0_f32, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
        );
        let transform = GlobalTransform::from(Transform::from_xyz(10.0, 2.0, 0.0));
        let trimesh = TriMesh::from_mesh_with_transform(&mesh, &transform).unwrap();

        assert_eq!(trimesh.indices, vec![UVec3::new(0, 1, 2)]);
        assert_eq!(
            trimesh.vertices,
            vec![
                Vec3A::new(10.0, 2.0, 0.0),
                Vec3A::new(10.0, 2.0, 1.0),
                Vec3A::new(11.0, 2.0, 0.0),
            ]
        );
    }

    /// Taken from <https://bevy.org/examples/2d-rendering/mesh2d-manual/>
    fn star() -> Mesh {
        let mut star = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::all());

        let mut v_pos = vec![[0.0, 0.0, 0.0]];
        for i in 0..10 {
            let a = i as f32 * PI / 5.0;
            let r = (1 - i % 2) as f32 * 100.0 + 100.0;
            v_pos.push([r * a.sin(), r * a.cos(), 0.0]);
        }
        star.insert_attribute(Mesh::ATTRIBUTE_POSITION, v_pos);

        let mut indices = vec![0, 1, 10];
        for i in 2..=10 {
            indices.extend_from_slice(&[0, i, i - 1]);
        }
        star.insert_indices(Indices::U32(indices));
        star
    }
}
