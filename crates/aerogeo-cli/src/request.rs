//! Plain data records exchanged with the ground station.

use serde::{Deserialize, Serialize};

use aerogeo::{
    CameraPose, CorrespondencePair, GeoMapping, GeolocationError, TransformationMatrix,
};

/// Camera pose as received from telemetry.
#[derive(Debug, Clone, Deserialize)]
pub struct PoseRecord {
    /// camera center in world units
    pub origin: [f64; 3],
    /// principal viewing axis
    pub direction: [f64; 3],
    /// image plane horizontal half extent
    pub orientation_u: [f64; 3],
    /// image plane vertical half extent
    pub orientation_v: [f64; 3],
    /// image size (width, height)
    pub resolution: [u32; 2],
}

impl TryFrom<PoseRecord> for CameraPose {
    type Error = GeolocationError;

    fn try_from(record: PoseRecord) -> Result<Self, Self::Error> {
        CameraPose::new(
            record.origin,
            record.direction,
            record.orientation_u,
            record.orientation_v,
            record.resolution,
        )
    }
}

/// A geolocation request for one camera snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationRequest {
    /// camera pose at capture time
    pub pose: PoseRecord,
    /// pixels used to fit the pixel to ground mapping
    pub reference_pixels: Vec<[f64; 2]>,
    /// pixels to locate, defaults to none
    #[serde(default)]
    pub pixels: Vec<[f64; 2]>,
    /// elevation of the ground plane, defaults to 0
    #[serde(default)]
    pub ground_elevation: f64,
}

/// The result sent back to the ground station.
#[derive(Debug, Clone, Serialize)]
pub struct GeolocationResponse {
    /// fitted pixel to ground transformation
    pub matrix: TransformationMatrix,
    /// correspondences the transformation was fitted on
    pub pairs: Vec<CorrespondencePair>,
    /// root mean square residual of the fit
    pub rmse: Option<f64>,
    /// ground coordinates of the requested pixels, `null` at infinity
    pub ground: Vec<[Option<f64>; 2]>,
}

impl GeolocationResponse {
    /// Assemble a response from a fitted mapping and the located pixels.
    pub fn new(mapping: GeoMapping, ground: Vec<[f64; 2]>) -> Self {
        let ground = ground
            .into_iter()
            .map(|p| p.map(|v| v.is_finite().then_some(v)))
            .collect();
        Self {
            matrix: mapping.matrix,
            pairs: mapping.pairs,
            rmse: mapping.rmse,
            ground,
        }
    }
}
