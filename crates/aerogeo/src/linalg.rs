use faer::prelude::SpSolverLstsq;

use crate::error::GeolocationError;

/// Compute the dot product of two 3d vectors.
pub fn dot_product3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Compute the cross product of two 3d vectors.
///
/// * `a` - The first vector.
/// * `b` - The second vector.
/// * `out` - The output vector `a x b`.
pub fn cross_vec3(a: &[f64; 3], b: &[f64; 3], out: &mut [f64; 3]) {
    out[0] = a[1] * b[2] - a[2] * b[1];
    out[1] = a[2] * b[0] - a[0] * b[2];
    out[2] = a[0] * b[1] - a[1] * b[0];
}

/// Compute the euclidean norm of a 3d vector.
pub fn norm3(a: &[f64; 3]) -> f64 {
    dot_product3(a, a).sqrt()
}

/// Compute the determinant of a 3x3 matrix.
pub fn det_mat33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Multiply a 3x3 matrix by a 3d vector.
///
/// # Arguments
///
/// * `m` - The row-major 3x3 matrix.
/// * `v` - The 3d vector.
/// * `out` - The output vector `m * v`.
///
/// Example:
///
/// ```
/// use aerogeo::linalg::mat33_mul_vec3;
///
/// let m = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
/// let mut out = [0.0; 3];
/// mat33_mul_vec3(&m, &[1.0, 0.0, 1.0], &mut out);
/// assert_eq!(out, [0.0, 1.0, 1.0]);
/// ```
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3], out: &mut [f64; 3]) {
    for (o, row) in out.iter_mut().zip(m.iter()) {
        *o = dot_product3(row, v);
    }
}

/// Multiply two 3x3 matrices.
///
/// * `a` - The left hand side matrix.
/// * `b` - The right hand side matrix.
/// * `out` - The output matrix `a * b`.
pub fn mat33_mul_mat33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], out: &mut [[f64; 3]; 3]) {
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
}

/// Scale a 3x3 matrix in place so that its bottom right element equals one.
///
/// Returns `false` and leaves the matrix untouched when that element is too
/// close to zero relative to the matrix norm.
pub fn normalize_mat33_inplace(m: &mut [[f64; 3]; 3]) -> bool {
    let fro = m.iter().flatten().map(|v| v * v).sum::<f64>().sqrt();
    let h33 = m[2][2];
    if fro == 0.0 || h33.abs() <= 1e-12 * fro {
        return false;
    }
    m.iter_mut().flatten().for_each(|v| *v /= h33);
    true
}

/// Scale a 3x3 matrix in place to unit Frobenius norm.
pub fn normalize_mat33_frobenius_inplace(m: &mut [[f64; 3]; 3]) {
    let fro = m.iter().flatten().map(|v| v * v).sum::<f64>().sqrt();
    if fro > 0.0 {
        m.iter_mut().flatten().for_each(|v| *v /= fro);
    }
}

/// Solve the linear least squares problem `min ||A x - b||`.
///
/// The system is solved with a QR decomposition of `A`. Rank deficient systems
/// are reported as [`GeolocationError::SingularSystem`] instead of returning an
/// arbitrary minimizer.
///
/// # Arguments
///
/// * `mat_a` - The design matrix with shape (m, n), m >= n.
/// * `vec_b` - The right hand side with length m.
///
/// # Returns
///
/// The solution vector with length n.
///
/// Example:
///
/// ```
/// use aerogeo::linalg::solve_least_squares;
///
/// let a = faer::mat![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let x = solve_least_squares(&a, &[1.0, 2.0, 3.0]).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_least_squares(
    mat_a: &faer::Mat<f64>,
    vec_b: &[f64],
) -> Result<Vec<f64>, GeolocationError> {
    solve_least_squares_with_tol(mat_a, vec_b, None)
}

/// Same as [`solve_least_squares`] with an explicit rank tolerance.
///
/// Singular values below `rank_tolerance * sigma_max` count as zero. When
/// `None`, the tolerance is `eps * max(m, n)`.
pub fn solve_least_squares_with_tol(
    mat_a: &faer::Mat<f64>,
    vec_b: &[f64],
    rank_tolerance: Option<f64>,
) -> Result<Vec<f64>, GeolocationError> {
    let (rows, cols) = (mat_a.nrows(), mat_a.ncols());

    if vec_b.len() != rows {
        return Err(GeolocationError::DimensionMismatch {
            rows,
            len: vec_b.len(),
        });
    }

    let rank = numerical_rank(mat_a, rank_tolerance);
    if rows < cols || rank < cols {
        return Err(GeolocationError::SingularSystem {
            rank,
            unknowns: cols,
        });
    }

    let mat_b = faer::Mat::<f64>::from_fn(rows, 1, |i, _| vec_b[i]);
    let sol = mat_a.qr().solve_lstsq(mat_b);

    let x = (0..cols).map(|i| sol.read(i, 0)).collect::<Vec<_>>();
    if x.iter().any(|v| !v.is_finite()) {
        return Err(GeolocationError::SingularSystem {
            rank,
            unknowns: cols,
        });
    }

    Ok(x)
}

/// Numerical rank of a matrix from its singular values.
pub fn numerical_rank(mat: &faer::Mat<f64>, rank_tolerance: Option<f64>) -> usize {
    if mat.nrows() == 0 || mat.ncols() == 0 {
        return 0;
    }

    let singular_values = mat.singular_values();
    let sigma_max = singular_values.iter().fold(0.0f64, |acc, &s| acc.max(s));
    if sigma_max == 0.0 {
        return 0;
    }

    let rel_tol =
        rank_tolerance.unwrap_or(f64::EPSILON * mat.nrows().max(mat.ncols()) as f64);
    singular_values
        .iter()
        .filter(|&&s| s > rel_tol * sigma_max)
        .count()
}
