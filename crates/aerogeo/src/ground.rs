//! Ground models terminate camera rays.
//!
//! The world frame is z-up: the ground lies below the camera and "down" is the
//! negative direction of [`VERTICAL_AXIS`].

/// Index of the vertical component in world coordinates.
pub const VERTICAL_AXIS: usize = 2;

/// Whether a ray can reach a ground plane lying below the camera.
///
/// Rays parallel to the ground or pointing upwards have no bounded
/// intersection and are rejected.
pub fn ray_reaches_ground(ray: &[f64; 3]) -> bool {
    ray[VERTICAL_AXIS] < 0.0
}

/// A surface that camera rays are intersected with.
pub trait GroundModel {
    /// Intersect the ray `origin + t * ray` with the ground.
    ///
    /// Returns the planar (x, y) coordinates of the hit point, or `None` if the
    /// ray does not reach the ground.
    fn intersect(&self, origin: &[f64; 3], ray: &[f64; 3]) -> Option<[f64; 2]>;
}

/// A horizontal ground plane at a fixed elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatGround {
    /// Height of the plane along the vertical axis.
    pub elevation: f64,
}

impl FlatGround {
    /// Creates a flat ground plane at the given elevation.
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl GroundModel for FlatGround {
    fn intersect(&self, origin: &[f64; 3], ray: &[f64; 3]) -> Option<[f64; 2]> {
        if !ray_reaches_ground(ray) {
            return None;
        }

        // the camera must be strictly above the plane, otherwise the hit is behind it
        let t = (self.elevation - origin[VERTICAL_AXIS]) / ray[VERTICAL_AXIS];
        if t <= 0.0 {
            return None;
        }
        Some([origin[0] + t * ray[0], origin[1] + t * ray[1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_reaches_ground() {
        assert!(ray_reaches_ground(&[0.0, 0.0, -1.0]));
        assert!(!ray_reaches_ground(&[1.0, 0.0, 0.0]));
        assert!(!ray_reaches_ground(&[0.0, 1.0, 0.5]));
    }

    #[test]
    fn test_flat_ground_intersect() {
        let ground = FlatGround::default();
        let hit = ground.intersect(&[2.0, 4.0, 2.0], &[1.0, 2.0, -1.0]);
        assert_eq!(hit, Some([4.0, 8.0]));
    }

    #[test]
    fn test_flat_ground_elevated() {
        let ground = FlatGround::new(1.0);
        let hit = ground.intersect(&[0.0, 0.0, 3.0], &[1.0, -1.0, -1.0]);
        assert_eq!(hit, Some([2.0, -2.0]));
    }

    #[test]
    fn test_flat_ground_above_camera() {
        let ground = FlatGround::new(5.0);
        assert_eq!(ground.intersect(&[0.0, 0.0, 1.0], &[1.0, 1.0, -1.0]), None);
        assert_eq!(ground.intersect(&[0.0, 0.0, 1.0], &[0.0, 0.0, -1.0]), None);
    }

    #[test]
    fn test_flat_ground_camera_on_plane() {
        let ground = FlatGround::new(2.0);
        assert_eq!(ground.intersect(&[3.0, 3.0, 2.0], &[0.0, 0.0, -1.0]), None);
    }

    #[test]
    fn test_flat_ground_parallel_ray() {
        let ground = FlatGround::default();
        assert_eq!(ground.intersect(&[0.0, 0.0, 3.0], &[1.0, 0.0, 0.0]), None);
        assert_eq!(ground.intersect(&[0.0, 0.0, 3.0], &[1.0, 0.0, -0.0]), None);
    }
}
