/// Camera and projection utilities
use crate::error::{Error, Result};
use crate::matrix::Matrix4;
use crate::scalar::degrees_to_radians;
use crate::vector::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

impl Matrix4 {
    /// Off-axis perspective frustum.
    ///
    /// Requires `right > left`, `top > bottom`, `far > near`, `near > 0`
    /// and `far > 0`; anything else is an `InvalidArgument` error.
    pub fn create_frustum(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Result<Matrix4> {
        let delta_x = right - left;
        let delta_y = top - bottom;
        let delta_z = far - near;

        // Written as negated comparisons so NaN bounds are rejected too
        if !(delta_x > 0.0) {
            return Err(Error::invalid_argument(format!(
                "frustum right - left = {delta_x}, must be > 0"
            )));
        }
        if !(delta_y > 0.0) {
            return Err(Error::invalid_argument(format!(
                "frustum top - bottom = {delta_y}, must be > 0"
            )));
        }
        if !(delta_z > 0.0) {
            return Err(Error::invalid_argument(format!(
                "frustum far - near = {delta_z}, must be > 0"
            )));
        }
        if !(near > 0.0) {
            return Err(Error::invalid_argument(format!("frustum near = {near}, must be > 0")));
        }
        if !(far > 0.0) {
            return Err(Error::invalid_argument(format!("frustum far = {far}, must be > 0")));
        }

        Ok(Matrix4::new([
            2.0 * near / delta_x,
            0.0,
            (right + left) / delta_x,
            0.0,
            0.0,
            2.0 * near / delta_y,
            (top + bottom) / delta_y,
            0.0,
            0.0,
            0.0,
            -(near + far) / delta_z,
            -2.0 * near * far / delta_z,
            0.0,
            0.0,
            -1.0,
            0.0,
        ]))
    }

    /// Symmetric frustum from a vertical field of view in degrees
    pub fn create_perspective_vertical_fov(
        vertical_fov_degrees: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Result<Matrix4> {
        let top = (degrees_to_radians(vertical_fov_degrees) / 2.0).tan() * near;
        let right = top * aspect;
        Matrix4::create_frustum(-right, right, -top, top, near, far)
    }

    /// Symmetric frustum from a horizontal field of view in degrees
    pub fn create_perspective_horizontal_fov(
        horizontal_fov_degrees: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Result<Matrix4> {
        let right = (degrees_to_radians(horizontal_fov_degrees) / 2.0).tan() * near;
        let top = right / aspect;
        Matrix4::create_frustum(-right, right, -top, top, near, far)
    }

    /// Orthographic projection. Fails if any of the three extents is zero.
    pub fn create_orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Result<Matrix4> {
        let delta_x = right - left;
        let delta_y = top - bottom;
        let delta_z = far - near;

        if delta_x == 0.0 {
            return Err(Error::invalid_argument("orthographic right - left == 0"));
        }
        if delta_y == 0.0 {
            return Err(Error::invalid_argument("orthographic top - bottom == 0"));
        }
        if delta_z == 0.0 {
            return Err(Error::invalid_argument("orthographic far - near == 0"));
        }

        Ok(Matrix4::new([
            2.0 / delta_x,
            0.0,
            0.0,
            -(right + left) / delta_x,
            0.0,
            2.0 / delta_y,
            0.0,
            -(top + bottom) / delta_y,
            0.0,
            0.0,
            -2.0 / delta_z,
            -(far + near) / delta_z,
            0.0,
            0.0,
            0.0,
            1.0,
        ]))
    }

    /// Right-handed look-at matrix.
    ///
    /// When `eye == target`, or `up` is parallel to the viewing direction,
    /// the basis is degenerate and the result is full of NaN. Callers
    /// validate their camera placement.
    pub fn create_view(eye: Vector3, up: Vector3, target: Vector3) -> Matrix4 {
        let z_axis = eye.subtract(target).normalize();
        let x_axis = up.cross_product(z_axis).normalize();
        let y_axis = z_axis.cross_product(x_axis);

        Matrix4::new([
            x_axis.x,
            x_axis.y,
            x_axis.z,
            x_axis.inverse().dot_product(eye),
            y_axis.x,
            y_axis.y,
            y_axis.z,
            y_axis.inverse().dot_product(eye),
            z_axis.x,
            z_axis.y,
            z_axis.z,
            z_axis.inverse().dot_product(eye),
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

/// Which extent of the viewport the field of view spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FovAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    pub fov_degrees: f64,
    pub fov_axis: FovAxis,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Perspective camera eight units behind the origin, looking at it
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -8.0),
            target: Vector3::ZERO,
            up: Vector3::UP,
            fov_degrees: 45.0,
            fov_axis: FovAxis::Horizontal,
            aspect: width as f64 / height as f64,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::create_view(self.position, self.up, self.target)
    }

    /// Create the projection matrix.
    ///
    /// The orthographic box is sized so the target plane keeps the same
    /// extent it has under the perspective projection.
    pub fn projection_matrix(&self) -> Result<Matrix4> {
        match (self.mode, self.fov_axis) {
            (ProjectionMode::Perspective, FovAxis::Horizontal) => {
                Matrix4::create_perspective_horizontal_fov(
                    self.fov_degrees,
                    self.aspect,
                    self.near,
                    self.far,
                )
            }
            (ProjectionMode::Perspective, FovAxis::Vertical) => {
                Matrix4::create_perspective_vertical_fov(
                    self.fov_degrees,
                    self.aspect,
                    self.near,
                    self.far,
                )
            }
            (ProjectionMode::Orthographic, axis) => {
                let distance = self.position.subtract(self.target).length();
                let half_fov = (degrees_to_radians(self.fov_degrees) / 2.0).tan() * distance;
                let (half_width, half_height) = match axis {
                    FovAxis::Horizontal => (half_fov, half_fov / self.aspect),
                    FovAxis::Vertical => (half_fov * self.aspect, half_fov),
                };
                Matrix4::create_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`
    pub fn view_projection(&self) -> Result<Matrix4> {
        Ok(self.projection_matrix()?.multiply(&self.view_matrix()))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
