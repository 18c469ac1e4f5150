use thiserror::Error;

/// Error types for the geolocation pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum GeolocationError {
    /// Not enough correspondences to estimate the transformation.
    #[error("homography estimation requires at least {required} correspondences, got {actual}")]
    InsufficientData {
        /// Minimum number of correspondences required by the estimator
        required: usize,
        /// Actual number of correspondences provided
        actual: usize,
    },

    /// The least squares system has no unique solution.
    #[error("least squares system is singular: rank {rank} for {unknowns} unknowns")]
    SingularSystem {
        /// Numerical rank of the design matrix
        rank: usize,
        /// Number of unknowns in the system
        unknowns: usize,
    },

    /// The right hand side does not match the design matrix.
    #[error("right hand side has {len} entries but the design matrix has {rows} rows")]
    DimensionMismatch {
        /// Number of rows of the design matrix
        rows: usize,
        /// Length of the right hand side
        len: usize,
    },

    /// The camera pose violates its geometric invariants.
    #[error("invalid camera pose: {0}")]
    InvalidCameraPose(String),

    /// A reference pixel lies outside the image.
    #[error("pixel ({}, {}) is outside the {}x{} image", pixel[0], pixel[1], resolution[0], resolution[1])]
    PixelOutOfBounds {
        /// The offending pixel
        pixel: [f64; 2],
        /// The image resolution (width, height)
        resolution: [u32; 2],
    },
}
