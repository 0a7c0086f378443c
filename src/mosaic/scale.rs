//! Mosaic-wide ground scale derived from optics and capture altitude.

use tracing::debug;

use crate::mosaic::camera::CameraProfile;
use crate::mosaic::common::error::{MosaicError, Result};
use crate::mosaic::geodesy::meters_to_feet;
use crate::mosaic::metadata::ImageRecord;

/// Canvas pixels per foot of ground distance, constant for one build.
///
/// Derived from the fleet's mean capture altitude, so altitude variance
/// between frames shows up as systematic placement error rather than being
/// corrected per image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    pixels_per_foot: f64,
}

impl ScaleFactor {
    /// Project half the horizontal field of view down from the mean
    /// altitude to get the ground width one frame covers, then divide the
    /// frame's pixel width by it.
    pub fn estimate(records: &[ImageRecord], profile: &CameraProfile) -> Result<Self> {
        if records.is_empty() {
            return Err(MosaicError::EmptyImageSet);
        }

        let mean_altitude_m =
            records.iter().map(|r| r.altitude).sum::<f64>() / records.len() as f64;
        if !mean_altitude_m.is_finite() || mean_altitude_m <= 0.0 {
            return Err(MosaicError::InvalidMetadata(format!(
                "mean altitude {} must be positive",
                mean_altitude_m
            )));
        }

        let half_fov = (profile.horizontal_field_of_view() / 2.0).to_radians();
        let ground_width_m = 2.0 * half_fov.tan() * mean_altitude_m;
        let ground_width_ft = meters_to_feet(ground_width_m);
        let pixels_per_foot = profile.image_width_px as f64 / ground_width_ft;

        debug!(
            mean_altitude_m,
            ground_width_ft, pixels_per_foot, "estimated ground scale"
        );

        Ok(Self { pixels_per_foot })
    }

    pub fn pixels_per_foot(&self) -> f64 {
        self.pixels_per_foot
    }

    /// Feet of ground distance to canvas pixels.
    pub fn feet_to_pixels(&self, feet: f64) -> f64 {
        feet * self.pixels_per_foot
    }
}
