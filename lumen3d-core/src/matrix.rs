/// Square matrices stored row-major
///
/// `Matrix<N>` is a fixed-size `Copy` value; the dimension is part of the
/// type so a 3x3 can never be multiplied with a 4x4. Operations common to
/// every size live on the generic impl, while determinants, minors and
/// inverses are spelled out per dimension below.
use std::fmt;
use std::ops::Mul;

use tracing::trace;

use crate::error::{Error, Result};

/// N x N matrix of `f64` in row-major order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const N: usize> {
    rows: [[f64; N]; N],
}

pub type Matrix2 = Matrix<2>;
pub type Matrix3 = Matrix<3>;
pub type Matrix4 = Matrix<4>;

impl<const N: usize> Matrix<N> {
    pub const ZERO: Self = Self {
        rows: [[0.0; N]; N],
    };

    pub const fn from_rows(rows: [[f64; N]; N]) -> Self {
        Self { rows }
    }

    pub fn identity() -> Self {
        let mut rows = [[0.0; N]; N];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { rows }
    }

    /// Build from a flat row-major slice of exactly `N * N` values
    pub fn from_row_major(values: &[f64]) -> Result<Self> {
        if values.len() != N * N {
            return Err(Error::invalid_argument(format!(
                "expected {} values for a {N}x{N} matrix, got {}",
                N * N,
                values.len()
            )));
        }

        let mut rows = [[0.0; N]; N];
        for (i, value) in values.iter().enumerate() {
            rows[i / N][i % N] = *value;
        }
        Ok(Self { rows })
    }

    pub const fn dimension(&self) -> usize {
        N
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }

    pub fn rows(&self) -> &[[f64; N]; N] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> [f64; N] {
        self.rows[i]
    }

    pub fn column(&self, j: usize) -> [f64; N] {
        let mut column = [0.0; N];
        for (i, row) in self.rows.iter().enumerate() {
            column[i] = row[j];
        }
        column
    }

    /// Elements in storage order
    pub fn values_row_major(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Elements in column-major order, as OpenGL style uniforms expect.
    /// Reads through a transpose; the matrix itself is untouched.
    pub fn values_column_major(&self) -> Vec<f64> {
        self.transpose().values_row_major()
    }

    /// Column-major elements narrowed to `f32` for GPU upload
    pub fn column_major_f32(&self) -> Vec<f32> {
        self.values_column_major()
            .into_iter()
            .map(|value| value as f32)
            .collect()
    }

    /// Row-by-column product `self * other`. Not commutative.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut rows = [[0.0; N]; N];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..N).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        Self { rows }
    }

    pub fn transpose(&self) -> Self {
        let mut rows = [[0.0; N]; N];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                rows[j][i] = *value;
            }
        }
        Self { rows }
    }

    /// Multiply every element by `scalar`
    pub fn scale(&self, scalar: f64) -> Self {
        let mut rows = self.rows;
        for value in rows.iter_mut().flatten() {
            *value *= scalar;
        }
        Self { rows }
    }

    /// Element-wise comparison; a tolerance of 0 means exact equality
    pub fn equals(&self, other: &Self, tolerance: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> Mul for Matrix<N> {
    type Output = Matrix<N>;

    fn mul(self, rhs: Matrix<N>) -> Matrix<N> {
        self.multiply(&rhs)
    }
}

impl<const N: usize> fmt::Display for Matrix<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "|")?;
            for value in row {
                write!(f, " {value}")?;
            }
            writeln!(f, " |")?;
        }
        Ok(())
    }
}

/// Copy `rows` without the given row and column, keeping the order of
/// everything else. `M` must be `N - 1`.
fn submatrix<const N: usize, const M: usize>(
    rows: &[[f64; N]; N],
    row: usize,
    column: usize,
) -> [[f64; M]; M] {
    debug_assert_eq!(M + 1, N);
    assert!(
        row < N && column < N,
        "minor ({row}, {column}) out of range for a {N}x{N} matrix"
    );

    let mut out = [[0.0; M]; M];
    let kept_rows = rows.iter().enumerate().filter(|(i, _)| *i != row);
    for (r, (_, source)) in kept_rows.enumerate() {
        let kept = source.iter().enumerate().filter(|(j, _)| *j != column);
        for (c, (_, value)) in kept.enumerate() {
            out[r][c] = *value;
        }
    }
    out
}

fn cofactor_sign(row: usize, column: usize) -> f64 {
    if (row + column) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// `adjugate / determinant`, or `None` when the determinant is exactly zero.
/// Nearly singular matrices still invert and may hold very large values.
fn invert<const N: usize>(determinant: f64, adjugate: Matrix<N>) -> Option<Matrix<N>> {
    if determinant == 0.0 {
        trace!(dimension = N, "matrix is singular, no inverse");
        return None;
    }
    Some(adjugate.scale(1.0 / determinant))
}

impl Matrix<2> {
    pub const fn new(v: [f64; 4]) -> Self {
        Self::from_rows([[v[0], v[1]], [v[2], v[3]]])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Signed 1x1 minors
    pub fn cofactor(&self) -> Self {
        let m = &self.rows;
        Self::from_rows([[m[1][1], -m[1][0]], [-m[0][1], m[0][0]]])
    }

    pub fn adjugate(&self) -> Self {
        self.cofactor().transpose()
    }

    pub fn inverse(&self) -> Option<Self> {
        invert(self.determinant(), self.adjugate())
    }
}

impl Matrix<3> {
    /// Identity with the z row zeroed: flattens onto the xy plane
    pub const ORTHOGRAPHIC: Self = Self::new([
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0,
    ]);

    pub const fn new(v: [f64; 9]) -> Self {
        Self::from_rows([[v[0], v[1], v[2]], [v[3], v[4], v[5]], [v[6], v[7], v[8]]])
    }

    /// The 2x2 matrix left after deleting `row` and `column`.
    ///
    /// # Panics
    /// If `row` or `column` is not below 3.
    pub fn minor(&self, row: usize, column: usize) -> Matrix2 {
        Matrix2::from_rows(submatrix(&self.rows, row, column))
    }

    /// Cofactor expansion along the first row
    pub fn determinant(&self) -> f64 {
        (0..3)
            .map(|j| cofactor_sign(0, j) * self.rows[0][j] * self.minor(0, j).determinant())
            .sum()
    }

    pub fn cofactor(&self) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = cofactor_sign(i, j) * self.minor(i, j).determinant();
            }
        }
        Self::from_rows(rows)
    }

    pub fn adjugate(&self) -> Self {
        self.cofactor().transpose()
    }

    pub fn inverse(&self) -> Option<Self> {
        invert(self.determinant(), self.adjugate())
    }
}

impl Matrix<4> {
    /// Identity with the z row zeroed: flattens onto the xy plane
    pub const ORTHOGRAPHIC: Self = Self::new([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const fn new(v: [f64; 16]) -> Self {
        Self::from_rows([
            [v[0], v[1], v[2], v[3]],
            [v[4], v[5], v[6], v[7]],
            [v[8], v[9], v[10], v[11]],
            [v[12], v[13], v[14], v[15]],
        ])
    }

    /// The 3x3 matrix left after deleting `row` and `column`.
    ///
    /// # Panics
    /// If `row` or `column` is not below 4.
    pub fn minor(&self, row: usize, column: usize) -> Matrix3 {
        Matrix3::from_rows(submatrix(&self.rows, row, column))
    }

    /// Cofactor expansion along the first row, each minor going through
    /// the 3x3 determinant
    pub fn determinant(&self) -> f64 {
        (0..4)
            .map(|j| cofactor_sign(0, j) * self.rows[0][j] * self.minor(0, j).determinant())
            .sum()
    }

    /// Matrix of signed minors: `(-1)^(i+j) * minor(i, j).determinant()`
    pub fn cofactor(&self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = cofactor_sign(i, j) * self.minor(i, j).determinant();
            }
        }
        Self::from_rows(rows)
    }

    pub fn adjugate(&self) -> Self {
        self.cofactor().transpose()
    }

    /// `adjugate / determinant`; `None` only when the determinant is
    /// exactly zero. There is no epsilon: a nearly singular matrix inverts
    /// to very large values.
    pub fn inverse(&self) -> Option<Self> {
        invert(self.determinant(), self.adjugate())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{self, SeqAccess, Visitor};
    use serde::ser::SerializeTuple;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Matrix;

    /// Serialized as a flat row-major sequence of `N * N` numbers
    impl<const N: usize> Serialize for Matrix<N> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut tuple = serializer.serialize_tuple(N * N)?;
            for value in self.rows.iter().flatten() {
                tuple.serialize_element(value)?;
            }
            tuple.end()
        }
    }

    struct MatrixVisitor<const N: usize>(PhantomData<Matrix<N>>);

    impl<'de, const N: usize> Visitor<'de> for MatrixVisitor<N> {
        type Value = Matrix<N>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a sequence of {} numbers", N * N)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Matrix<N>, A::Error> {
            let mut rows = [[0.0; N]; N];
            for i in 0..N * N {
                rows[i / N][i % N] = seq
                    .next_element::<f64>()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
            }
            Ok(Matrix::from_rows(rows))
        }
    }

    impl<'de, const N: usize> Deserialize<'de> for Matrix<N> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_tuple(N * N, MatrixVisitor(PhantomData))
        }
    }
}
