/// Per-vertex barycentric coordinates for wireframe shading
///
/// A fragment stage can detect triangle edges when every triangle sees the
/// three unit coordinates `(1,0,0)`, `(0,1,0)` and `(0,0,1)` on its corners.
/// With shared vertices that cannot be guaranteed, so two modes exist:
/// `FirstWriteWins` keeps the mesh as is and gives each vertex the corner it
/// was first seen as, while `DuplicateVertices` unshares the mesh first.
use tracing::debug;

use crate::error::Result;
use crate::geometry::MeshData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BarycentricMode {
    /// Keep shared vertices; a vertex used by several triangles keeps the
    /// coordinate of the first triangle that referenced it
    #[default]
    FirstWriteWins,
    /// Give every triangle its own three vertices so each corner gets the
    /// right coordinate
    DuplicateVertices,
}

/// Mesh plus matching barycentric buffer (3 floats per vertex)
#[derive(Debug, Clone, PartialEq)]
pub struct BarycentricMesh {
    pub mesh: MeshData,
    pub coordinates: Vec<f32>,
}

/// Barycentric coordinates using first-write-wins assignment.
///
/// Indexed meshes walk the index list: index `i` offers corner `i % 3` to
/// the vertex it names, and only the first offer sticks. Vertices no
/// triangle references stay `(0,0,0)`. Non-indexed meshes hand out corners
/// cyclically by vertex position.
pub fn barycentric_coordinates(mesh: &MeshData) -> Vec<f32> {
    let count = mesh.vertex_count();
    match mesh.indices() {
        Some(indices) => {
            let mut assigned: Vec<Option<[f32; 3]>> = vec![None; count];
            for (i, &vertex) in indices.iter().enumerate() {
                let slot = &mut assigned[usize::from(vertex)];
                if slot.is_none() {
                    *slot = Some(CORNERS[i % 3]);
                }
            }
            assigned
                .into_iter()
                .flat_map(|corner| corner.unwrap_or([0.0; 3]))
                .collect()
        }
        None => (0..count).flat_map(|k| CORNERS[k % 3]).collect(),
    }
}

/// Attach barycentric coordinates to `mesh` in the requested mode
pub fn assign_barycentric(mesh: &MeshData, mode: BarycentricMode) -> Result<BarycentricMesh> {
    let mesh = match mode {
        BarycentricMode::FirstWriteWins => mesh.clone(),
        BarycentricMode::DuplicateVertices => unshare_vertices(mesh)?,
    };
    let coordinates = barycentric_coordinates(&mesh);
    debug!(?mode, vertices = mesh.vertex_count(), "assigned barycentric coordinates");
    Ok(BarycentricMesh { mesh, coordinates })
}

/// Expand an indexed mesh into a triangle soup, copying every per-vertex
/// attribute along. Non-indexed meshes are returned unchanged.
pub fn unshare_vertices(mesh: &MeshData) -> Result<MeshData> {
    let Some(indices) = mesh.indices() else {
        return Ok(mesh.clone());
    };

    let components = mesh.dimension().components();
    let gather = |source: &[f32], width: usize| -> Vec<f32> {
        indices
            .iter()
            .flat_map(|&i| {
                let start = usize::from(i) * width;
                source[start..start + width].iter().copied()
            })
            .collect()
    };

    let vertices = gather(mesh.vertices(), components);
    let normals = mesh.normals().map(|n| gather(n, 3));
    let uvs = mesh.texture_coordinates().map(|t| gather(t, 2));

    MeshData::with_texture_coordinates(mesh.dimension(), vertices, None, normals, uvs)
}
