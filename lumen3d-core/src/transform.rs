/// Model transforms: scale, axis-angle rotation, translation
///
/// Matrices are row-major and act on column vectors for translation, so the
/// translation lives in column 3 of rows 0-2.
use crate::matrix::Matrix4;
use crate::vector::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scale given either uniformly or per axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScaleFactor {
    Uniform(f64),
    PerAxis(Vector3),
}

impl ScaleFactor {
    pub fn to_vector(self) -> Vector3 {
        match self {
            ScaleFactor::Uniform(s) => Vector3::new(s, s, s),
            ScaleFactor::PerAxis(v) => v,
        }
    }
}

impl From<f64> for ScaleFactor {
    fn from(s: f64) -> Self {
        ScaleFactor::Uniform(s)
    }
}

impl From<Vector3> for ScaleFactor {
    fn from(v: Vector3) -> Self {
        ScaleFactor::PerAxis(v)
    }
}

impl Matrix4 {
    /// Diagonal matrix `(sx, sy, sz, 1)`
    pub fn create_scale(scale: Vector3) -> Matrix4 {
        Matrix4::new([
            scale.x, 0.0, 0.0, 0.0, //
            0.0, scale.y, 0.0, 0.0, //
            0.0, 0.0, scale.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Add `translation` into column 3 of rows 0-2. Nothing else changes.
    pub fn translate(&self, translation: Vector3) -> Matrix4 {
        let mut rows = *self.rows();
        rows[0][3] += translation.x;
        rows[1][3] += translation.y;
        rows[2][3] += translation.z;
        Matrix4::from_rows(rows)
    }

    /// Right-multiply an axis-angle rotation onto `self`.
    ///
    /// The rotation is the Rodrigues matrix built from the axis components
    /// as given, transposed before the product (`self * R^T`). The axis is
    /// not normalized, so only a unit axis yields a pure rotation. A
    /// zero-length axis returns `self` unchanged.
    pub fn rotate(&self, angle: f64, axis: Vector3) -> Matrix4 {
        if axis.length() <= 0.0 {
            return *self;
        }

        let Vector3 { x, y, z } = axis;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let rotation = Matrix4::new([
            t * x * x + c,
            t * x * y - z * s,
            t * z * x + y * s,
            0.0,
            t * x * y + z * s,
            t * y * y + c,
            t * y * z - x * s,
            0.0,
            t * z * x - y * s,
            t * y * z + x * s,
            t * z * z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
        .transpose();

        self.multiply(&rotation)
    }

    /// Scale, then rotate about Z, X and Y (in that order), then translate
    pub fn create_srt(
        scale: impl Into<ScaleFactor>,
        rotation: Vector3,
        translation: Vector3,
    ) -> Matrix4 {
        Matrix4::create_scale(scale.into().to_vector())
            .rotate(rotation.z, Vector3::FORWARD)
            .rotate(rotation.x, Vector3::RIGHT)
            .rotate(rotation.y, Vector3::UP)
            .translate(translation)
    }
}

/// Scale, euler rotation (radians) and translation of a model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    pub scale: Vector3,
    pub rotation: Vector3,
    pub translation: Vector3,
}

impl Transform {
    pub fn new(scale: impl Into<ScaleFactor>, rotation: Vector3, translation: Vector3) -> Self {
        Self {
            scale: scale.into().to_vector(),
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self {
            scale: Vector3::UNIT,
            rotation: Vector3::ZERO,
            translation: Vector3::ZERO,
        }
    }

    pub fn from_translation(translation: Vector3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Copy with the rotation advanced by the given deltas (radians)
    pub fn rotated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            rotation: self.rotation + Vector3::new(dx, dy, dz),
            ..*self
        }
    }

    /// Model matrix, see [`Matrix4::create_srt`]
    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::create_srt(self.scale, self.rotation, self.translation)
    }

    /// `projection * view * model`
    pub fn model_view_projection(
        model: &Matrix4,
        view: &Matrix4,
        projection: &Matrix4,
    ) -> Matrix4 {
        projection.multiply(view).multiply(model)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
