//! Small hand-made meshes shared by the unit tests.
//!
//! Every cell of a grid is split into two triangles along the diagonal from `(x + 1, z)` to
//! `(x, z + 1)`, so cell `n` of a mesh yields the nodes `2n` and `2n + 1`. Cells do not share
//! vertices, which also exercises corner matching by position.

use glam::{UVec3, Vec3A, vec3a};

use crate::TriMesh;

/// A unit cell at `(x, z)` with the corner heights `[y00, y10, y01, y11]`.
pub(crate) struct Cell {
    pub x: f32,
    pub z: f32,
    pub heights: [f32; 4],
}

pub(crate) fn flat(x: i32, z: i32) -> Cell {
    raised(x, z, [0.0; 4])
}

pub(crate) fn raised(x: i32, z: i32, heights: [f32; 4]) -> Cell {
    Cell {
        x: x as f32,
        z: z as f32,
        heights,
    }
}

pub(crate) fn grid(cells: impl IntoIterator<Item = Cell>) -> TriMesh {
    let mut trimesh = TriMesh::default();
    for Cell { x, z, heights } in cells {
        let [y00, y10, y01, y11] = heights;
        let base = trimesh.vertices.len() as u32;
        trimesh.vertices.extend([
            vec3a(x, y00, z),
            vec3a(x + 1.0, y10, z),
            vec3a(x, y01, z + 1.0),
            vec3a(x + 1.0, y11, z + 1.0),
        ]);
        trimesh.indices.extend([
            UVec3::new(base, base + 2, base + 1),
            UVec3::new(base + 1, base + 2, base + 3),
        ]);
    }
    trimesh
}

/// A chain of `cells` unit squares along +x where every triangle has at most two neighbours.
/// Node `i` always borders nodes `i - 1` and `i + 1`.
pub(crate) fn strip(cells: u32) -> TriMesh {
    let vertices = (0..=cells)
        .flat_map(|x| [vec3a(x as f32, 0.0, 0.0), vec3a(x as f32, 0.0, 1.0)])
        .collect();
    let indices = (0..cells)
        .flat_map(|x| {
            let i = 2 * x;
            [UVec3::new(i, i + 1, i + 2), UVec3::new(i + 2, i + 1, i + 3)]
        })
        .collect();
    TriMesh { vertices, indices }
}

/// A 2x2 square made of two triangles. With `rise` the far corner of the second triangle is
/// lifted, folding the square along its diagonal.
pub(crate) fn square(rise: f32) -> TriMesh {
    TriMesh {
        vertices: vec![
            Vec3A::ZERO,
            vec3a(0.0, 0.0, 2.0),
            vec3a(2.0, 0.0, 0.0),
            vec3a(2.0, rise, 2.0),
        ],
        indices: vec![UVec3::new(0, 1, 2), UVec3::new(2, 1, 3)],
    }
}

/// Three cells along +x, then two more turning towards +z (or -z when `mirrored`).
pub(crate) fn l_corridor(mirrored: bool) -> TriMesh {
    let turn = if mirrored { -1 } else { 1 };
    grid([
        flat(0, 0),
        flat(1, 0),
        flat(2, 0),
        flat(2, turn),
        flat(2, 2 * turn),
    ])
}

/// Two flat cells at height 0, a ramp cell rising to height 1 along +x and two flat cells
/// at height 1.
pub(crate) fn ramp() -> TriMesh {
    grid([
        flat(0, 0),
        flat(1, 0),
        raised(2, 0, [0.0, 1.0, 0.0, 1.0]),
        raised(3, 0, [1.0; 4]),
        raised(4, 0, [1.0; 4]),
    ])
}
