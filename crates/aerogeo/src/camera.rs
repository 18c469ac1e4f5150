use crate::error::GeolocationError;
use crate::linalg;

/// Relative tolerance for the orthogonality and independence checks.
///
/// Loose enough for poses assembled from single precision telemetry.
const POSE_TOLERANCE: f64 = 1e-6;

/// A snapshot of the camera pose in world coordinates.
///
/// The image plane is spanned by `orientation_u` (towards increasing pixel
/// columns) and `orientation_v` (towards increasing pixel rows). Their
/// magnitudes are the half-width and half-height of the image plane at unit
/// distance along `direction`.
///
/// The pose is immutable once built; use [`CameraPose::new`] to construct it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    origin: [f64; 3],
    direction: [f64; 3],
    orientation_u: [f64; 3],
    orientation_v: [f64; 3],
    resolution: [u32; 2],
}

impl CameraPose {
    /// Creates a new camera pose.
    ///
    /// # Arguments
    ///
    /// * `origin` - The camera center in world units.
    /// * `direction` - The principal viewing axis.
    /// * `orientation_u` - The image plane horizontal half-extent.
    /// * `orientation_v` - The image plane vertical half-extent.
    /// * `resolution` - The image size in pixels (width, height).
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError::InvalidCameraPose`] if the resolution is
    /// zero, if either orientation vector is not orthogonal to `direction`, or
    /// if the three vectors do not span 3d space.
    pub fn new(
        origin: [f64; 3],
        direction: [f64; 3],
        orientation_u: [f64; 3],
        orientation_v: [f64; 3],
        resolution: [u32; 2],
    ) -> Result<Self, GeolocationError> {
        if resolution[0] == 0 || resolution[1] == 0 {
            return Err(GeolocationError::InvalidCameraPose(format!(
                "resolution must be non-zero, got {}x{}",
                resolution[0], resolution[1]
            )));
        }

        let vectors = [
            ("direction", &direction),
            ("orientation_u", &orientation_u),
            ("orientation_v", &orientation_v),
        ];
        for (name, v) in vectors {
            if v.iter().any(|x| !x.is_finite()) {
                return Err(GeolocationError::InvalidCameraPose(format!(
                    "{name} has non-finite components"
                )));
            }
        }
        if origin.iter().any(|x| !x.is_finite()) {
            return Err(GeolocationError::InvalidCameraPose(
                "origin has non-finite components".to_string(),
            ));
        }

        let (n_c, n_u, n_v) = (
            linalg::norm3(&direction),
            linalg::norm3(&orientation_u),
            linalg::norm3(&orientation_v),
        );

        let orientations = [
            ("orientation_u", &orientation_u, n_u),
            ("orientation_v", &orientation_v, n_v),
        ];
        for (name, v, n) in orientations {
            if linalg::dot_product3(&direction, v).abs() > POSE_TOLERANCE * n_c * n {
                return Err(GeolocationError::InvalidCameraPose(format!(
                    "{name} is not orthogonal to direction"
                )));
            }
        }

        let basis = [direction, orientation_u, orientation_v];
        let volume = linalg::det_mat33(&basis).abs();
        if volume <= POSE_TOLERANCE * n_c * n_u * n_v {
            return Err(GeolocationError::InvalidCameraPose(
                "direction and orientation vectors are linearly dependent".to_string(),
            ));
        }

        Ok(Self {
            origin,
            direction,
            orientation_u,
            orientation_v,
            resolution,
        })
    }

    /// The camera center.
    pub fn origin(&self) -> &[f64; 3] {
        &self.origin
    }

    /// The principal viewing axis.
    pub fn direction(&self) -> &[f64; 3] {
        &self.direction
    }

    /// The image plane horizontal half-extent.
    pub fn orientation_u(&self) -> &[f64; 3] {
        &self.orientation_u
    }

    /// The image plane vertical half-extent.
    pub fn orientation_v(&self) -> &[f64; 3] {
        &self.orientation_v
    }

    /// The image size in pixels (width, height).
    pub fn resolution(&self) -> [u32; 2] {
        self.resolution
    }

    /// Whether a pixel lies inside the image, borders included.
    pub fn contains_pixel(&self, pixel: &[f64; 2]) -> bool {
        let [w, h] = self.resolution;
        (0.0..=w as f64).contains(&pixel[0]) && (0.0..=h as f64).contains(&pixel[1])
    }

    /// The direction of the ray leaving the camera through `pixel`.
    ///
    /// The returned vector is not normalized.
    pub fn ray_through_pixel(&self, pixel: &[f64; 2]) -> [f64; 3] {
        let su = pixel[0] / self.resolution[0] as f64 - 0.5;
        let sv = pixel[1] / self.resolution[1] as f64 - 0.5;

        let mut ray = [0.0; 3];
        for (i, r) in ray.iter_mut().enumerate() {
            *r = self.direction[i]
                + 2.0 * su * self.orientation_u[i]
                + 2.0 * sv * self.orientation_v[i];
        }
        ray
    }
}
