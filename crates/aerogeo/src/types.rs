use serde::Serialize;

use crate::linalg;

/// A pixel observation and the ground-plane point it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrespondencePair {
    /// Pixel coordinates (column, row).
    pub pixel: [f64; 2],
    /// Planar ground coordinates (x, y).
    pub ground: [f64; 2],
}

impl CorrespondencePair {
    /// Creates a new correspondence pair.
    pub fn new(pixel: [f64; 2], ground: [f64; 2]) -> Self {
        Self { pixel, ground }
    }
}

/// A 3x3 planar projective transformation in row-major order.
///
/// The matrix maps homogeneous pixel coordinates `(x, y, 1)` to homogeneous
/// ground coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransformationMatrix([[f64; 3]; 3]);

impl TransformationMatrix {
    /// Creates a transformation from a row-major 3x3 array.
    pub fn new(mat: [[f64; 3]; 3]) -> Self {
        Self(mat)
    }

    /// The identity transformation.
    pub fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Returns the underlying row-major array.
    pub fn as_array(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Applies the transformation to a single point.
    ///
    /// Returns `(+inf, +inf)` when the homogeneous scale is exactly zero, i.e.
    /// the point is projected to infinity.
    pub fn project(&self, point: &[f64; 2]) -> [f64; 2] {
        let mut dst = [0.0; 3];
        linalg::mat33_mul_vec3(&self.0, &[point[0], point[1], 1.0], &mut dst);
        if dst[2] == 0.0 {
            return [f64::INFINITY, f64::INFINITY];
        }
        [dst[0] / dst[2], dst[1] / dst[2]]
    }
}

impl From<[[f64; 3]; 3]> for TransformationMatrix {
    fn from(mat: [[f64; 3]; 3]) -> Self {
        Self(mat)
    }
}

impl From<TransformationMatrix> for [[f64; 3]; 3] {
    fn from(mat: TransformationMatrix) -> Self {
        mat.0
    }
}
