/// Two and three component vectors
///
/// Both types are immutable `Copy` values: every operation returns a new
/// vector. The named operations mirror the `std::ops` impls so callers can
/// use whichever reads better.
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const UNIT: Self = Self::new(1.0, 1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0);
    pub const DOWN: Self = Self::new(0.0, -1.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when every component differs from `other` by at most `tolerance`
    pub fn equals(self, other: Vector2, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    pub fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }

    /// Negate every component
    pub fn inverse(self) -> Vector2 {
        self.scale(-1.0)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length. A zero vector yields NaN components.
    pub fn normalize(self) -> Vector2 {
        self.scale(1.0 / self.length())
    }

    pub fn dot_product(self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product of the two vectors
    /// extended with z = 0.
    pub fn cross_product(self, other: Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Lift into 3D with the given z component
    pub fn extend(self, z: f64) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn to_f32_array(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x={}, y={}}}", self.x, self.y)
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UNIT: Self = Self::new(1.0, 1.0, 1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACKWARD: Self = Self::new(0.0, 0.0, -1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when every component differs from `other` by at most `tolerance`
    pub fn equals(self, other: Vector3, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    pub fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn subtract(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, scalar: f64) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Negate every component
    pub fn inverse(self) -> Vector3 {
        self.scale(-1.0)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length. A zero vector yields NaN components.
    pub fn normalize(self) -> Vector3 {
        self.scale(1.0 / self.length())
    }

    pub fn dot_product(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross_product(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x={}, y={}, z={}}}", self.x, self.y, self.z)
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = $ty;

            fn add(self, rhs: $ty) -> $ty {
                $ty::add(self, rhs)
            }
        }

        impl Sub for $ty {
            type Output = $ty;

            fn sub(self, rhs: $ty) -> $ty {
                self.subtract(rhs)
            }
        }

        impl Mul<f64> for $ty {
            type Output = $ty;

            fn mul(self, rhs: f64) -> $ty {
                self.scale(rhs)
            }
        }

        impl Neg for $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                self.inverse()
            }
        }
    };
}

impl_vector_ops!(Vector2);
impl_vector_ops!(Vector3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector2_fields() {
        let v = Vector2::new(1.0, 2.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_vector2_add_subtract() {
        let sum = Vector2::new(1.0, 2.0).add(Vector2::new(3.0, 4.0));
        assert!(sum.equals(Vector2::new(4.0, 6.0), 0.0));

        let diff = Vector2::new(3.0, 4.0) - Vector2::new(1.0, 2.0);
        assert!(diff.equals(Vector2::new(2.0, 2.0), 0.0));
    }

    #[test]
    fn test_vector2_cross_is_scalar() {
        assert_eq!(Vector2::RIGHT.cross_product(Vector2::UP), 1.0);
        assert_eq!(Vector2::UP.cross_product(Vector2::RIGHT), -1.0);
    }

    #[test]
    fn test_vector3_add_subtract() {
        let sum = Vector3::new(1.0, 2.0, 3.0) + Vector3::new(4.0, 5.0, 6.0);
        assert!(sum.equals(Vector3::new(5.0, 7.0, 9.0), 0.0));

        let diff = Vector3::new(4.0, 5.0, 6.0).subtract(Vector3::new(1.0, 2.0, 3.0));
        assert!(diff.equals(Vector3::new(3.0, 3.0, 3.0), 0.0));
    }

    #[test]
    fn test_equals_tolerance() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        let b = Vector3::new(1.05, 0.95, 1.0);
        assert!(!a.equals(b, 0.0));
        assert!(!a.equals(b, 0.01));
        assert!(a.equals(b, 0.1));
    }

    #[test]
    fn test_inverse_negates() {
        assert_eq!(Vector3::new(1.0, -2.0, 3.0).inverse(), Vector3::new(-1.0, 2.0, -3.0));
        assert_eq!(-Vector2::new(1.0, -2.0), Vector2::new(-1.0, 2.0));
    }

    #[test]
    fn test_length_and_normalize() {
        let v = Vector3::new(3.0, 4.0, 12.0);
        assert_eq!(v.length_squared(), 169.0);
        assert_eq!(v.length(), 13.0);
        assert!((v.normalize().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = Vector3::ZERO.normalize();
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
    }

    #[test]
    fn test_cross_product_basis() {
        assert_eq!(Vector3::RIGHT.cross_product(Vector3::UP), Vector3::FORWARD);
        assert_eq!(Vector3::UP.cross_product(Vector3::FORWARD), Vector3::RIGHT);
        assert_eq!(Vector3::FORWARD.cross_product(Vector3::RIGHT), Vector3::UP);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "{x=1, y=2.5, z=-3}");
    }
}
