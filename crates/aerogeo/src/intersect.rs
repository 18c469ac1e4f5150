use crate::camera::CameraPose;
use crate::ground::{FlatGround, GroundModel};
use crate::types::CorrespondencePair;

/// Cast rays through the reference pixels and intersect them with the ground.
///
/// Pixels whose ray does not point towards the ground are dropped, so the
/// output may be shorter than the input (or empty). The order of the kept
/// pixels is preserved.
///
/// # Arguments
///
/// * `pose` - The camera pose.
/// * `reference_pixels` - The pixels to cast rays through, as (column, row).
///
/// # Returns
///
/// The pixel to ground correspondences on the plane `z = 0`.
///
/// Example:
///
/// ```
/// use aerogeo::{gather_point_pairs, CameraPose};
///
/// let pose = CameraPose::new(
///     [2.0, 4.0, 2.0],
///     [0.0, 0.0, -1.0],
///     [0.0, -2.0, 0.0],
///     [-1.0, 0.0, 0.0],
///     [20, 10],
/// )
/// .unwrap();
/// let pairs = gather_point_pairs(&pose, &[[0.0, 0.0], [20.0, 10.0]]);
/// assert_eq!(pairs[0].ground, [4.0, 8.0]);
/// assert_eq!(pairs[1].ground, [0.0, 0.0]);
/// ```
pub fn gather_point_pairs(
    pose: &CameraPose,
    reference_pixels: &[[f64; 2]],
) -> Vec<CorrespondencePair> {
    gather_point_pairs_with(pose, reference_pixels, &FlatGround::default())
}

/// Same as [`gather_point_pairs`] against an arbitrary ground model.
pub fn gather_point_pairs_with<G: GroundModel + ?Sized>(
    pose: &CameraPose,
    reference_pixels: &[[f64; 2]],
    ground: &G,
) -> Vec<CorrespondencePair> {
    let mut pairs = Vec::with_capacity(reference_pixels.len());

    for pixel in reference_pixels {
        let ray = pose.ray_through_pixel(pixel);
        match ground.intersect(pose.origin(), &ray) {
            Some(point) => pairs.push(CorrespondencePair::new(*pixel, point)),
            None => log::debug!(
                "dropping pixel ({}, {}): ray {:?} does not reach the ground",
                pixel[0],
                pixel[1],
                ray
            ),
        }
    }

    pairs
}
