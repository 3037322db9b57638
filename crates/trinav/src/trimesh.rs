//! Contains the [`TriMesh`] used as input for [`NavMesh::build`](crate::NavMesh::build)
//! and the conversion from interleaved vertex buffers.

use glam::{UVec3, Vec3A};
use thiserror::Error;

use crate::math::Aabb3d;

/// A mesh used as input for [`NavMesh::build`](crate::NavMesh::build).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TriMesh {
    /// The vertices composing the walkable surface.
    /// Follows the convention of a triangle list.
    pub vertices: Vec<Vec3A>,

    /// The indices composing the walkable surface.
    /// Follows the convention of a triangle list.
    pub indices: Vec<UVec3>,
}

impl TriMesh {
    /// Extends the trimesh with the vertices and indices of another trimesh.
    /// The indices of `other` will be offset by the number of vertices in `self`.
    pub fn extend(&mut self, other: TriMesh) {
        if self.vertices.len() > u32::MAX as usize {
            panic!("Cannot extend a trimesh with more than 2^32 vertices");
        }
        let next_vertex_index = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices
            .extend(other.indices.iter().map(|i| i + next_vertex_index));
    }

    /// Computes the AABB of the trimesh.
    /// Returns `None` if the trimesh is empty.
    pub fn compute_aabb(&self) -> Option<Aabb3d> {
        Aabb3d::from_verts(&self.vertices)
    }

    /// Number of triangles in the trimesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the three corners of the triangle at `index`, in winding order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than [`Self::triangle_count`].
    pub fn triangle(&self, index: usize) -> Result<[Vec3A; 3], MeshInputError> {
        let triangle = self.indices[index];
        let corner = |i: u32| {
            self.vertices
                .get(i as usize)
                .copied()
                .ok_or(MeshInputError::IndexOutOfBounds {
                    index: i,
                    vertex_count: self.vertices.len(),
                })
        };
        Ok([corner(triangle.x)?, corner(triangle.y)?, corner(triangle.z)?])
    }

    /// Reads a [`TriMesh`] out of an interleaved vertex buffer, e.g. one handed over by a renderer.
    ///
    /// # Arguments
    ///
    /// - `vertices` - The raw vertex data. Every vertex occupies `layout.stride` floats.
    /// - `layout` - Where the position attribute lives inside each vertex.
    /// - `indices` - The index buffer.
    /// - `topology` - How the indices are to be assembled into primitives. Only
    ///   [`PrimitiveTopology::TriangleList`] is accepted.
    pub fn from_interleaved(
        vertices: &[f32],
        layout: VertexLayout,
        indices: &[u32],
        topology: PrimitiveTopology,
    ) -> Result<Self, MeshInputError> {
        if topology != PrimitiveTopology::TriangleList {
            return Err(MeshInputError::UnsupportedTopology(topology));
        }
        if layout.position_offset + 3 > layout.stride {
            return Err(MeshInputError::PositionOutsideVertex {
                stride: layout.stride,
                position_offset: layout.position_offset,
            });
        }
        if !vertices.len().is_multiple_of(layout.stride) {
            return Err(MeshInputError::TruncatedVertexBuffer {
                len: vertices.len(),
                stride: layout.stride,
            });
        }
        if !indices.len().is_multiple_of(3) {
            return Err(MeshInputError::IndexCountNotMultipleOfThree(indices.len()));
        }

        let positions: Vec<Vec3A> = vertices
            .chunks_exact(layout.stride)
            .map(|vertex| {
                let offset = layout.position_offset;
                Vec3A::from_slice(&vertex[offset..offset + 3])
            })
            .collect();
        if let Some(&index) = indices.iter().find(|i| **i as usize >= positions.len()) {
            return Err(MeshInputError::IndexOutOfBounds {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(TriMesh {
            vertices: positions,
            indices: indices
                .chunks_exact(3)
                .map(UVec3::from_slice)
                .collect(),
        })
    }
}

/// Describes where the position attribute is stored inside an interleaved vertex.
/// Both values are counted in floats, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Number of floats per vertex, e.g. 8 for position + normal + uv.
    pub stride: usize,
    /// Offset of the x component of the position within a vertex.
    pub position_offset: usize,
}

impl VertexLayout {
    /// A buffer that contains nothing but tightly packed positions.
    pub const POSITIONS_ONLY: Self = Self {
        stride: 3,
        position_offset: 0,
    };
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::POSITIONS_ONLY
    }
}

/// How an index buffer is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Every index is a point.
    PointList,
    /// Every pair of indices is a line.
    LineList,
    /// Consecutive indices form a connected line.
    LineStrip,
    /// Every triple of indices is a triangle.
    TriangleList,
    /// Every index after the second forms a triangle with the previous two.
    TriangleStrip,
}

/// Errors that can occur when reading mesh data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshInputError {
    /// Happens when the mesh is not made of a plain triangle list.
    #[error("Navigation meshes must be built from a triangle list, got {0:?}")]
    UnsupportedTopology(PrimitiveTopology),
    /// Happens when the index buffer cannot be split into triangles.
    #[error("Index count must be a multiple of 3, got {0}")]
    IndexCountNotMultipleOfThree(usize),
    /// Happens when an index points past the end of the vertex buffer.
    #[error("Index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// The offending index
        index: u32,
        /// The number of vertices in the mesh
        vertex_count: usize,
    },
    /// Happens when the position attribute does not fit into a single vertex.
    #[error("Position at offset {position_offset} does not fit into a vertex of {stride} floats")]
    PositionOutsideVertex {
        /// Floats per vertex
        stride: usize,
        /// Offset of the position attribute
        position_offset: usize,
    },
    /// Happens when the vertex buffer ends in the middle of a vertex.
    #[error("Vertex buffer of {len} floats is not a multiple of the stride {stride}")]
    TruncatedVertexBuffer {
        /// Length of the vertex buffer in floats
        len: usize,
        /// Floats per vertex
        stride: usize,
    },
}
