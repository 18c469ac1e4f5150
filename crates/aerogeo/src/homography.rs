use crate::error::GeolocationError;
use crate::linalg;
use crate::types::{CorrespondencePair, TransformationMatrix};

/// Minimum number of correspondences needed to fix the 8 degrees of freedom.
pub const MIN_CORRESPONDENCES: usize = 4;

const IDENTITY33: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Parameters of the pixel to ground homography estimator.
#[derive(Debug, Clone)]
pub struct HomographyParams {
    /// Condition both point sets (zero mean, mean distance sqrt(2)) before
    /// assembling the linear system.
    pub normalize_points: bool,
    /// Relative singular value threshold under which the linear system is
    /// considered rank deficient. `None` selects `eps * max(m, n)`.
    pub rank_tolerance: Option<f64>,
}

impl Default for HomographyParams {
    fn default() -> Self {
        Self {
            normalize_points: true,
            rank_tolerance: None,
        }
    }
}

/// Estimate the homography mapping pixel coordinates to ground coordinates.
///
/// Uses the Direct Linear Transform with the bottom right entry fixed to one
/// and solves the stacked system in the least squares sense, so that more than
/// four correspondences give a noise minimizing fit.
///
/// # Arguments
///
/// * `pairs` - The pixel to ground correspondences, at least 4.
///
/// # Returns
///
/// The 3x3 transformation, scaled so that `h33 = 1` whenever possible.
///
/// # Errors
///
/// * [`GeolocationError::InsufficientData`] with fewer than 4 pairs.
/// * [`GeolocationError::SingularSystem`] when the correspondences do not
///   determine a unique transformation (e.g. collinear or repeated pixels).
pub fn calculate_pixel_to_geo_mapping(
    pairs: &[CorrespondencePair],
) -> Result<TransformationMatrix, GeolocationError> {
    calculate_pixel_to_geo_mapping_with(pairs, &HomographyParams::default())
}

/// Same as [`calculate_pixel_to_geo_mapping`] with explicit parameters.
pub fn calculate_pixel_to_geo_mapping_with(
    pairs: &[CorrespondencePair],
    params: &HomographyParams,
) -> Result<TransformationMatrix, GeolocationError> {
    if pairs.len() < MIN_CORRESPONDENCES {
        return Err(GeolocationError::InsufficientData {
            required: MIN_CORRESPONDENCES,
            actual: pairs.len(),
        });
    }

    let pixels = pairs.iter().map(|p| p.pixel).collect::<Vec<_>>();
    let ground = pairs.iter().map(|p| p.ground).collect::<Vec<_>>();

    let (pixels_n, t_pixel, _) = condition(&pixels, params.normalize_points);
    let (ground_n, _, t_ground_inv) = condition(&ground, params.normalize_points);

    let (mat_a, vec_b) = dlt_system(&pixels_n, &ground_n);
    let h = linalg::solve_least_squares_with_tol(&mat_a, &vec_b, params.rank_tolerance)?;

    let homo_n = [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], 1.0]];

    // undo the conditioning: H = T_ground^-1 * Hn * T_pixel
    let mut tmp = [[0.0; 3]; 3];
    linalg::mat33_mul_mat33(&homo_n, &t_pixel, &mut tmp);
    let mut homo = [[0.0; 3]; 3];
    linalg::mat33_mul_mat33(&t_ground_inv, &tmp, &mut homo);

    if !linalg::normalize_mat33_inplace(&mut homo) {
        log::warn!("pixel origin maps to infinity, homography scaled to unit norm instead");
        linalg::normalize_mat33_frobenius_inplace(&mut homo);
    }

    log::debug!(
        "estimated pixel to ground homography from {} correspondences",
        pairs.len()
    );

    Ok(TransformationMatrix::new(homo))
}

/// Build the `2n x 8` linear system of the DLT with `h33 = 1`.
///
/// Each correspondence `(x, y) -> (x', y')` contributes the rows
///
/// ```text
/// h11 x + h12 y + h13 - x' h31 x - x' h32 y = x'
/// h21 x + h22 y + h23 - y' h31 x - y' h32 y = y'
/// ```
fn dlt_system(src: &[[f64; 2]], dst: &[[f64; 2]]) -> (faer::Mat<f64>, Vec<f64>) {
    let n = src.len();
    let mut mat_a = faer::Mat::<f64>::zeros(2 * n, 8);
    let mut vec_b = vec![0.0; 2 * n];

    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let ([x, y], [xp, yp]) = (*s, *d);

        mat_a.write(2 * i, 0, x);
        mat_a.write(2 * i, 1, y);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -xp * x);
        mat_a.write(2 * i, 7, -xp * y);
        vec_b[2 * i] = xp;

        mat_a.write(2 * i + 1, 3, x);
        mat_a.write(2 * i + 1, 4, y);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -yp * x);
        mat_a.write(2 * i + 1, 7, -yp * y);
        vec_b[2 * i + 1] = yp;
    }

    (mat_a, vec_b)
}

/// Translate the points to zero mean and scale them to mean distance sqrt(2).
///
/// Returns the conditioned points, the similarity `T` and its inverse.
fn condition(
    points: &[[f64; 2]],
    enabled: bool,
) -> (Vec<[f64; 2]>, [[f64; 3]; 3], [[f64; 3]; 3]) {
    if !enabled {
        return (points.to_vec(), IDENTITY33, IDENTITY33);
    }

    let n = points.len() as f64;
    let (mut mx, mut my) = (0.0, 0.0);
    for p in points {
        mx += p[0];
        my += p[1];
    }
    mx /= n;
    my /= n;

    let mean_dist = points
        .iter()
        .map(|p| ((p[0] - mx).powi(2) + (p[1] - my).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 0.0 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let conditioned = points
        .iter()
        .map(|p| [(p[0] - mx) * scale, (p[1] - my) * scale])
        .collect();

    let t = [
        [scale, 0.0, -scale * mx],
        [0.0, scale, -scale * my],
        [0.0, 0.0, 1.0],
    ];
    let t_inv = [
        [1.0 / scale, 0.0, mx],
        [0.0, 1.0 / scale, my],
        [0.0, 0.0, 1.0],
    ];

    (conditioned, t, t_inv)
}
