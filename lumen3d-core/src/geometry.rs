/// Mesh buffers ready for GPU upload
///
/// `MeshData` holds flat `f32` vertex data plus optional `u16` triangle
/// indices, normals and texture coordinates. The validating constructor is
/// the only way to build one, so the layout invariants hold for every value
/// handed to a renderer.
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Components per vertex position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    pub const fn components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

/// Vertex, index, normal and texture coordinate buffers of a triangle mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MeshData {
    dimension: Dimension,
    vertices: Vec<f32>,
    indices: Option<Vec<u16>>,
    normals: Option<Vec<f32>>,
    texture_coordinates: Option<Vec<f32>>,
}

impl MeshData {
    /// Validate and assemble mesh buffers.
    ///
    /// Fails with `InvalidMesh` if the vertex buffer is not a whole number
    /// of vertices, the index list is not a whole number of triangles, an
    /// index points past the last vertex, or the normal/texture buffers do
    /// not hold exactly one entry per vertex.
    pub fn new(
        dimension: Dimension,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        normals: Option<Vec<f32>>,
    ) -> Result<Self> {
        Self::with_texture_coordinates(dimension, vertices, indices, normals, None)
    }

    pub fn with_texture_coordinates(
        dimension: Dimension,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        normals: Option<Vec<f32>>,
        texture_coordinates: Option<Vec<f32>>,
    ) -> Result<Self> {
        let components = dimension.components();
        if vertices.len() % components != 0 {
            return Err(Error::invalid_mesh(format!(
                "{} vertex floats is not a multiple of {components}",
                vertices.len()
            )));
        }
        let vertex_count = vertices.len() / components;

        if let Some(indices) = &indices {
            if indices.len() % 3 != 0 {
                return Err(Error::invalid_mesh(format!(
                    "{} indices is not a whole number of triangles",
                    indices.len()
                )));
            }
            if let Some(bad) = indices.iter().find(|&&i| usize::from(i) >= vertex_count) {
                return Err(Error::invalid_mesh(format!(
                    "index {bad} out of range for {vertex_count} vertices"
                )));
            }
        }

        if let Some(normals) = &normals {
            if normals.len() != 3 * vertex_count {
                return Err(Error::invalid_mesh(format!(
                    "{} normal floats for {vertex_count} vertices, expected {}",
                    normals.len(),
                    3 * vertex_count
                )));
            }
        }

        if let Some(uvs) = &texture_coordinates {
            if uvs.len() != 2 * vertex_count {
                return Err(Error::invalid_mesh(format!(
                    "{} texture coordinate floats for {vertex_count} vertices, expected {}",
                    uvs.len(),
                    2 * vertex_count
                )));
            }
        }

        Ok(Self {
            dimension,
            vertices,
            indices,
            normals,
            texture_coordinates,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    pub fn texture_coordinates(&self) -> Option<&[f32]> {
        self.texture_coordinates.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.dimension.components()
    }

    /// Zero for non-indexed meshes
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    /// Indexed meshes count index triples, others vertex triples
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Position of vertex `i` (z is 0 for 2D meshes)
    pub fn position(&self, i: usize) -> [f32; 3] {
        let components = self.dimension.components();
        let v = &self.vertices[i * components..(i + 1) * components];
        match self.dimension {
            Dimension::Two => [v[0], v[1], 0.0],
            Dimension::Three => [v[0], v[1], v[2]],
        }
    }

    /// Vertex index triples in draw order. Non-indexed meshes yield
    /// consecutive vertices; a trailing partial triangle is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(indices) => [
                usize::from(indices[3 * t]),
                usize::from(indices[3 * t + 1]),
                usize::from(indices[3 * t + 2]),
            ],
            None => [3 * t, 3 * t + 1, 3 * t + 2],
        })
    }

    /// Byte length of the vertex buffer
    pub fn vertex_size(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice())
    }

    /// Byte length of the index buffer, zero when there is none
    pub fn index_size(&self) -> usize {
        self.indices
            .as_deref()
            .map_or(0, |indices| std::mem::size_of_val(indices))
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_deref().map(bytemuck::cast_slice)
    }

    pub fn normal_bytes(&self) -> Option<&[u8]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }

    pub fn into_parts(
        self,
    ) -> (
        Dimension,
        Vec<f32>,
        Option<Vec<u16>>,
        Option<Vec<f32>>,
        Option<Vec<f32>>,
    ) {
        (
            self.dimension,
            self.vertices,
            self.indices,
            self.normals,
            self.texture_coordinates,
        )
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for MeshData {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            dimension: Dimension,
            vertices: Vec<f32>,
            indices: Option<Vec<u16>>,
            normals: Option<Vec<f32>>,
            texture_coordinates: Option<Vec<f32>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        MeshData::with_texture_coordinates(
            raw.dimension,
            raw.vertices,
            raw.indices,
            raw.normals,
            raw.texture_coordinates,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData::new(
            Dimension::Three,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            Some(vec![0, 1, 2]),
            Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_counts_and_sizes() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_size(), 36);
        assert_eq!(mesh.index_size(), 6);
        assert_eq!(mesh.vertex_bytes().len(), 36);
        assert_eq!(mesh.index_bytes().map(<[u8]>::len), Some(6));
        assert_eq!(mesh.normal_bytes().map(<[u8]>::len), Some(36));
    }

    #[test]
    fn test_two_dimensional_vertex_count() {
        let mesh = MeshData::new(Dimension::Two, vec![0.0; 8], None, None).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(mesh.index_size(), 0);
        assert_eq!(mesh.position(3), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rejects_partial_vertex() {
        let err = MeshData::new(Dimension::Three, vec![0.0; 7], None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidMesh(_)));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err =
            MeshData::new(Dimension::Two, vec![0.0; 6], Some(vec![0, 1, 3]), None).unwrap_err();
        assert_eq!(err, Error::InvalidMesh("index 3 out of range for 3 vertices".to_string()));
    }

    #[test]
    fn test_rejects_partial_triangle() {
        assert!(MeshData::new(Dimension::Two, vec![0.0; 6], Some(vec![0, 1]), None).is_err());
    }

    #[test]
    fn test_rejects_normal_length_mismatch() {
        assert!(MeshData::new(Dimension::Two, vec![0.0; 6], None, Some(vec![0.0; 6])).is_err());
        assert!(MeshData::new(Dimension::Two, vec![0.0; 6], None, Some(vec![0.0; 9])).is_ok());
    }

    #[test]
    fn test_texture_coordinates_checked() {
        let ok = MeshData::with_texture_coordinates(
            Dimension::Two,
            vec![0.0; 6],
            None,
            None,
            Some(vec![0.0; 6]),
        );
        assert_eq!(ok.unwrap().texture_coordinates().map(<[f32]>::len), Some(6));

        let bad = MeshData::with_texture_coordinates(
            Dimension::Two,
            vec![0.0; 6],
            None,
            None,
            Some(vec![0.0; 4]),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_triangles_iterator() {
        let indexed = triangle();
        assert_eq!(indexed.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);

        let flat = MeshData::new(Dimension::Two, vec![0.0; 12], None, None).unwrap();
        assert_eq!(flat.triangles().collect::<Vec<_>>(), vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_triangles_skips_partial_triangle() {
        let mesh = MeshData::new(Dimension::Three, vec![0.0; 12], None, None).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::to_string(&triangle()).unwrap();
        let back: MeshData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triangle());

        let broken = r#"{"dimension":"Two","vertices":[0,0,1,1],"indices":[0,1,5],
            "normals":null,"texture_coordinates":null}"#;
        assert!(serde_json::from_str::<MeshData>(broken).is_err());
    }
}
