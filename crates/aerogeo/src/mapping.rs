use crate::types::{CorrespondencePair, TransformationMatrix};

/// Map pixel coordinates to ground coordinates.
///
/// Each pixel `(x, y)` is lifted to `(x, y, 1)`, multiplied by `matrix` and
/// dehomogenized. Pixels projected to infinity (zero homogeneous scale) map to
/// `(+inf, +inf)`.
///
/// # Arguments
///
/// * `matrix` - The pixel to ground transformation.
/// * `pixels` - The pixel coordinates to map.
///
/// # Returns
///
/// One ground coordinate per input pixel, in the same order.
///
/// Example:
///
/// ```
/// use aerogeo::{map_location_from_pixel, TransformationMatrix};
///
/// let matrix = TransformationMatrix::new([[2.0, 0.0, 1.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]]);
/// let ground = map_location_from_pixel(&matrix, &[[1.0, 1.0], [0.0, 3.0]]);
/// assert_eq!(ground, vec![[3.0, 1.0], [1.0, 5.0]]);
/// ```
pub fn map_location_from_pixel(
    matrix: &TransformationMatrix,
    pixels: &[[f64; 2]],
) -> Vec<[f64; 2]> {
    pixels.iter().map(|p| matrix.project(p)).collect()
}

/// Root mean square distance between the mapped pixels and their ground points.
///
/// Returns `None` for an empty set or when any pixel maps to infinity.
pub fn reprojection_rmse(
    matrix: &TransformationMatrix,
    pairs: &[CorrespondencePair],
) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }

    let mut sum_sq = 0.0;
    for pair in pairs {
        let mapped = matrix.project(&pair.pixel);
        if !mapped.iter().all(|v| v.is_finite()) {
            return None;
        }
        sum_sq += (mapped[0] - pair.ground[0]).powi(2) + (mapped[1] - pair.ground[1]).powi(2);
    }

    Some((sum_sq / pairs.len() as f64).sqrt())
}
