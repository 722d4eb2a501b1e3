/// Lumen3D Core Library - vector math, transforms and procedural meshes
///
/// This library provides the stateless numeric core of a small 3D toolkit:
/// 2D/3D vectors, 2x2/3x3/4x4 matrices with cofactor inversion, model and
/// camera matrix builders, and generators that emit GPU-ready mesh buffers.

pub mod barycentric;
pub mod error;
pub mod geometry;
pub mod interop;
pub mod matrix;
pub mod projection;
pub mod scalar;
pub mod shapes;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use barycentric::{
    assign_barycentric, barycentric_coordinates, BarycentricMesh, BarycentricMode,
};
pub use error::{Error, Result};
pub use geometry::{Dimension, MeshData};
pub use matrix::{Matrix, Matrix2, Matrix3, Matrix4};
pub use projection::{Camera, FovAxis, ProjectionMode};
pub use shapes::{circle, cuboid, rectangle, sphere};
pub use transform::{ScaleFactor, Transform};
pub use vector::{Vector2, Vector3};
