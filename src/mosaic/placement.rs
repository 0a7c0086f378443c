//! Per-image placement geometry.
//!
//! The recorded coordinate of a frame is where the *device* was, not where
//! the photographed ground center is. Placement first positions the device
//! on the canvas, then displaces that position by the pitch- and
//! roll-induced ground offsets, rotated from the as-if-facing-north frame
//! into the device's actual heading.

use tracing::warn;

use crate::mosaic::camera::CameraProfile;
use crate::mosaic::geodesy::{Geodesy, meters_to_feet};
use crate::mosaic::metadata::{ImageRecord, MosaicBounds};
use crate::mosaic::scale::ScaleFactor;

/// Attitude angles past this are close enough to the tangent singularity
/// that the computed offsets stop being meaningful.
const EXTREME_ATTITUDE_DEG: f64 = 60.0;

/// Where one photograph lands on the canvas: the pixel center to paste at
/// and the rotation to apply to the source raster first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center_x: f64,
    pub center_y: f64,
    /// Degrees, counter-clockwise. Cancels the capture yaw so every pasted
    /// frame shares the same north.
    pub rotate_degrees: f64,
}

/// Computes placements for one build. Holds the per-build constants; the
/// per-image computation is pure and never touches the canvas.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    bounds: MosaicBounds,
    geodesy: Geodesy,
    scale: ScaleFactor,
    profile: CameraProfile,
}

impl PlacementEngine {
    pub fn new(
        bounds: MosaicBounds,
        geodesy: Geodesy,
        scale: ScaleFactor,
        profile: CameraProfile,
    ) -> Self {
        Self {
            bounds,
            geodesy,
            scale,
            profile,
        }
    }

    pub fn place(&self, record: &ImageRecord) -> Placement {
        let position = record.position();

        // Device position relative to the top-left geographic corner,
        // anchored at half the per-axis canvas margin so a corner image
        // sits fully inside the canvas.
        let feet_from_left = self
            .geodesy
            .horizontal_distance_feet(position, self.bounds.top_left);
        let feet_from_top = self
            .geodesy
            .vertical_distance_feet(position, self.bounds.top_left);
        let x = self.profile.image_width_px as f64 / 2.0 + self.scale.feet_to_pixels(feet_from_left);
        let y =
            self.profile.image_height_px as f64 / 2.0 + self.scale.feet_to_pixels(feet_from_top);

        if record.pitch.abs() >= EXTREME_ATTITUDE_DEG || record.roll.abs() >= EXTREME_ATTITUDE_DEG {
            warn!(
                filename = %record.filename,
                pitch = record.pitch,
                roll = record.roll,
                "attitude near the tangent singularity, placement offset will be extreme"
            );
        }

        // Ground offsets from the device to the photographed center, as if
        // the device were facing true north: pitch displaces along the
        // north-south axis, roll along east-west.
        let vertical_offset = self.attitude_offset_pixels(record.altitude, record.pitch);
        let horizontal_offset = self.attitude_offset_pixels(record.altitude, record.roll);

        // Rotate the north-frame offsets into the device's actual heading.
        let yaw = record.yaw.to_radians();
        let x_shift = vertical_offset * yaw.sin();
        let vertical_offset = vertical_offset * yaw.cos();
        let horizontal_offset = horizontal_offset - x_shift;

        Placement {
            center_x: x + horizontal_offset,
            center_y: y + vertical_offset,
            rotate_degrees: -record.yaw,
        }
    }

    /// Ground displacement seen by a camera tilted `angle_degrees` while
    /// `altitude_m` above the ground, as signed canvas pixels.
    fn attitude_offset_pixels(&self, altitude_m: f64, angle_degrees: f64) -> f64 {
        let offset_m = altitude_m * angle_degrees.to_radians().tan();
        self.scale.feet_to_pixels(meters_to_feet(offset_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::geodesy::GeoPoint;

    fn record(lat: f64, long: f64, yaw: f64, pitch: f64, roll: f64) -> ImageRecord {
        ImageRecord {
            filename: "frame.jpg".to_string(),
            latitude: lat,
            longitude: long,
            altitude: 100.0,
            yaw,
            pitch,
            roll,
        }
    }

    fn engine_for(records: &[ImageRecord]) -> PlacementEngine {
        let profile = CameraProfile::default();
        let bounds = MosaicBounds::from_records(records).unwrap();
        let geodesy = Geodesy::new(bounds.top_left);
        let scale = ScaleFactor::estimate(records, &profile).unwrap();
        PlacementEngine::new(bounds, geodesy, scale, profile)
    }

    #[test]
    fn level_image_at_corner_sits_on_the_margin_anchor() {
        let records = vec![
            record(38.001, -123.001, 0.0, 0.0, 0.0),
            record(38.0, -123.0, 0.0, 0.0, 0.0),
        ];
        let engine = engine_for(&records);

        let placement = engine.place(&records[0]);
        assert_eq!(placement.center_x, 2000.0);
        assert_eq!(placement.center_y, 1500.0);
        assert_eq!(placement.rotate_degrees, 0.0);
    }

    #[test]
    fn positive_pitch_displaces_along_the_vertical_axis() {
        let records = vec![record(38.0, -123.0, 0.0, 10.0, 0.0)];
        let engine = engine_for(&records);

        let placement = engine.place(&records[0]);
        assert_eq!(placement.center_x, 2000.0);
        assert!(placement.center_y > 1500.0);
    }

    #[test]
    fn positive_roll_displaces_along_the_horizontal_axis() {
        let records = vec![record(38.0, -123.0, 0.0, 0.0, 10.0)];
        let engine = engine_for(&records);

        let placement = engine.place(&records[0]);
        assert!(placement.center_x > 2000.0);
        assert_eq!(placement.center_y, 1500.0);
    }

    #[test]
    fn yaw_90_maps_pitch_offset_onto_the_horizontal_axis() {
        let pitch = 10.0;
        let with_yaw = vec![record(38.0, -123.0, 90.0, pitch, 0.0)];
        let without_yaw = vec![record(38.0, -123.0, 0.0, pitch, 0.0)];

        let yawed = engine_for(&with_yaw).place(&with_yaw[0]);
        let level = engine_for(&without_yaw).place(&without_yaw[0]);

        let pitch_pixels = level.center_y - 1500.0;
        assert!(pitch_pixels > 0.0);

        // The whole pitch offset rotates into x, negated; y keeps none.
        assert!((yawed.center_x - (2000.0 - pitch_pixels)).abs() < 1e-9);
        assert!((yawed.center_y - 1500.0).abs() < 1e-9);
        assert_eq!(yawed.rotate_degrees, -90.0);
    }

    #[test]
    fn northern_image_lands_above_southern_image() {
        let south = record(38.0, -123.0, 0.0, 0.0, 0.0);
        let north = record(38.001, -123.0, 0.0, 0.0, 0.0);
        let records = vec![south.clone(), north.clone()];
        let engine = engine_for(&records);

        let south_placement = engine.place(&south);
        let north_placement = engine.place(&north);

        assert!(north_placement.center_y < south_placement.center_y);

        // Pixel separation must match the geodesic separation exactly.
        let geodesy = Geodesy::new(GeoPoint::new(38.001, -123.0));
        let scale = ScaleFactor::estimate(&records, &CameraProfile::default()).unwrap();
        let expected = scale
            .feet_to_pixels(geodesy.vertical_distance_feet(south.position(), north.position()));
        let separation = south_placement.center_y - north_placement.center_y;
        assert!((separation - expected).abs() < 1e-9);
    }

    #[test]
    fn rotation_cancels_capture_yaw() {
        let records = vec![record(38.0, -123.0, 37.5, 0.0, 0.0)];
        let engine = engine_for(&records);
        assert_eq!(engine.place(&records[0]).rotate_degrees, -37.5);
    }
}
