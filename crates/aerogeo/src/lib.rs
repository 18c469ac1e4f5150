#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera pose of the aerial sensor.
pub mod camera;

/// Error types for the geolocation pipeline.
pub mod error;

/// High level pipeline from camera pose to ground coordinates.
pub mod geolocator;

/// Ground models used to terminate camera rays.
pub mod ground;

/// Homography estimation from pixel to ground correspondences.
pub mod homography;

/// Ray casting from the camera through reference pixels.
pub mod intersect;

/// Linear algebra utilities.
pub mod linalg;

/// Mapping of pixel coordinates through a transformation matrix.
pub mod mapping;

/// Value types exchanged between the pipeline stages.
pub mod types;

pub use camera::CameraPose;
pub use error::GeolocationError;
pub use geolocator::{GeoMapping, Geolocator};
pub use ground::{FlatGround, GroundModel};
pub use homography::{
    calculate_pixel_to_geo_mapping, calculate_pixel_to_geo_mapping_with, HomographyParams,
};
pub use intersect::{gather_point_pairs, gather_point_pairs_with};
pub use mapping::{map_location_from_pixel, reprojection_rmse};
pub use types::{CorrespondencePair, TransformationMatrix};
