//! End-to-end geolocation for a single camera snapshot.
//!
//! [`Geolocator`] bundles a validated [`CameraPose`] with the reference pixels
//! used to fit the pixel to ground homography, and runs the three stages in
//! order: ray casting, homography estimation and pixel mapping.

use serde::Serialize;

use crate::camera::CameraPose;
use crate::error::GeolocationError;
use crate::ground::{FlatGround, GroundModel};
use crate::homography::{calculate_pixel_to_geo_mapping_with, HomographyParams};
use crate::intersect::gather_point_pairs_with;
use crate::mapping::{map_location_from_pixel, reprojection_rmse};
use crate::types::{CorrespondencePair, TransformationMatrix};

/// A fitted pixel to ground mapping with the data it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMapping {
    /// The pixel to ground transformation.
    pub matrix: TransformationMatrix,
    /// The correspondences used for the fit.
    pub pairs: Vec<CorrespondencePair>,
    /// Root mean square residual of the fit, in ground units.
    pub rmse: Option<f64>,
}

/// Geolocation of pixels for one camera pose.
#[derive(Debug, Clone)]
pub struct Geolocator<G: GroundModel = FlatGround> {
    pose: CameraPose,
    reference_pixels: Vec<[f64; 2]>,
    ground: G,
    params: HomographyParams,
}

impl Geolocator<FlatGround> {
    /// Creates a geolocator over the plane `z = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError::PixelOutOfBounds`] if a reference pixel lies
    /// outside the image.
    pub fn new(
        pose: CameraPose,
        reference_pixels: Vec<[f64; 2]>,
    ) -> Result<Self, GeolocationError> {
        Self::with_ground(pose, reference_pixels, FlatGround::default())
    }
}

impl<G: GroundModel> Geolocator<G> {
    /// Creates a geolocator over an arbitrary ground model.
    pub fn with_ground(
        pose: CameraPose,
        reference_pixels: Vec<[f64; 2]>,
        ground: G,
    ) -> Result<Self, GeolocationError> {
        if let Some(pixel) = reference_pixels.iter().find(|p| !pose.contains_pixel(p)) {
            return Err(GeolocationError::PixelOutOfBounds {
                pixel: *pixel,
                resolution: pose.resolution(),
            });
        }

        Ok(Self {
            pose,
            reference_pixels,
            ground,
            params: HomographyParams::default(),
        })
    }

    /// Replaces the homography estimator parameters.
    pub fn with_params(mut self, params: HomographyParams) -> Self {
        self.params = params;
        self
    }

    /// The camera pose.
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    /// The reference pixels.
    pub fn reference_pixels(&self) -> &[[f64; 2]] {
        &self.reference_pixels
    }

    /// Intersect the reference pixel rays with the ground.
    pub fn gather_point_pairs(&self) -> Vec<CorrespondencePair> {
        gather_point_pairs_with(&self.pose, &self.reference_pixels, &self.ground)
    }

    /// Fit the pixel to ground transformation from the reference pixels.
    pub fn calculate_pixel_to_geo_mapping(&self) -> Result<GeoMapping, GeolocationError> {
        let pairs = self.gather_point_pairs();
        let matrix = calculate_pixel_to_geo_mapping_with(&pairs, &self.params)?;
        let rmse = reprojection_rmse(&matrix, &pairs);

        log::debug!(
            "fitted mapping on {}/{} reference pixels, rmse {:?}",
            pairs.len(),
            self.reference_pixels.len(),
            rmse
        );

        Ok(GeoMapping {
            matrix,
            pairs,
            rmse,
        })
    }

    /// Locate pixels on the ground.
    ///
    /// # Errors
    ///
    /// Propagates the estimator errors when fewer than four reference rays
    /// reach the ground or the correspondences are degenerate.
    pub fn locate(&self, pixels: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, GeolocationError> {
        let mapping = self.calculate_pixel_to_geo_mapping()?;
        Ok(map_location_from_pixel(&mapping.matrix, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn nadir_pose() -> Result<CameraPose, GeolocationError> {
        CameraPose::new(
            [2.0, 4.0, 2.0],
            [0.0, 0.0, -1.0],
            [0.0, -2.0, 0.0],
            [-1.0, 0.0, 0.0],
            [20, 10],
        )
    }

    fn corners() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [0.0, 10.0], [20.0, 0.0], [20.0, 10.0]]
    }

    #[test]
    fn test_locate_reproduces_ground_points() -> Result<(), Box<dyn std::error::Error>> {
        let locator = Geolocator::new(nadir_pose()?, corners())?;

        let ground = locator.locate(&[[0.0, 0.0], [10.0, 5.0], [20.0, 10.0]])?;

        let expected = [[4.0, 8.0], [2.0, 4.0], [0.0, 0.0]];
        for (g, e) in ground.iter().zip(expected.iter()) {
            assert_relative_eq!(g[0], e[0], epsilon = 1e-9);
            assert_relative_eq!(g[1], e[1], epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_mapping_reports_fit() -> Result<(), Box<dyn std::error::Error>> {
        let locator = Geolocator::new(nadir_pose()?, corners())?;

        let mapping = locator.calculate_pixel_to_geo_mapping()?;

        assert_eq!(mapping.pairs.len(), 4);
        assert_relative_eq!(mapping.rmse.unwrap_or(f64::NAN), 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_pixel_out_of_bounds() -> Result<(), Box<dyn std::error::Error>> {
        let res = Geolocator::new(nadir_pose()?, vec![[0.0, 0.0], [21.0, 3.0]]);
        assert_eq!(
            res.err(),
            Some(GeolocationError::PixelOutOfBounds {
                pixel: [21.0, 3.0],
                resolution: [20, 10],
            })
        );
        Ok(())
    }

    #[test]
    fn test_not_enough_rays_reach_ground() -> Result<(), Box<dyn std::error::Error>> {
        let pose = CameraPose::new(
            [0.0, 1.0, 4.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, -2.0],
            [1000, 2000],
        )?;
        let pixels = vec![
            [0.0, 0.0],
            [0.0, 1000.0],
            [0.0, 2000.0],
            [1000.0, 0.0],
            [1000.0, 1000.0],
            [1000.0, 2000.0],
        ];
        let locator = Geolocator::new(pose, pixels)?;

        assert_eq!(locator.gather_point_pairs().len(), 2);
        assert_eq!(
            locator.locate(&[[500.0, 1500.0]]).err(),
            Some(GeolocationError::InsufficientData {
                required: 4,
                actual: 2
            })
        );
        Ok(())
    }

    #[test]
    fn test_elevated_ground() -> Result<(), Box<dyn std::error::Error>> {
        let pose = CameraPose::new(
            [2.0, 4.0, 3.0],
            [0.0, 0.0, -1.0],
            [0.0, -2.0, 0.0],
            [-1.0, 0.0, 0.0],
            [20, 10],
        )?;
        let locator = Geolocator::with_ground(pose, corners(), FlatGround::new(1.0))?;

        let ground = locator.locate(&[[20.0, 0.0]])?;

        assert_relative_eq!(ground[0][0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(ground[0][1], 0.0, epsilon = 1e-9);
        Ok(())
    }
}
