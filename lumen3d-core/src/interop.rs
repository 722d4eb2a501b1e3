/// Conversions to and from nalgebra types
use nalgebra::SMatrix;

use crate::matrix::Matrix;
use crate::vector::{Vector2, Vector3};

impl From<Vector2> for nalgebra::Vector2<f64> {
    fn from(v: Vector2) -> Self {
        nalgebra::Vector2::new(v.x, v.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Vector2 {
    fn from(v: nalgebra::Vector2<f64>) -> Self {
        Vector2::new(v.x, v.y)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl<const N: usize> From<Matrix<N>> for SMatrix<f64, N, N> {
    fn from(m: Matrix<N>) -> Self {
        SMatrix::from_fn(|r, c| m.get(r, c))
    }
}

impl<const N: usize> From<SMatrix<f64, N, N>> for Matrix<N> {
    fn from(m: SMatrix<f64, N, N>) -> Self {
        let mut rows = [[0.0; N]; N];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[(r, c)];
            }
        }
        Matrix::from_rows(rows)
    }
}
