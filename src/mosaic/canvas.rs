//! Output canvas sizing and compositing.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::mosaic::camera::CameraProfile;
use crate::mosaic::geodesy::Geodesy;
use crate::mosaic::metadata::MosaicBounds;
use crate::mosaic::raster::RasterOps;
use crate::mosaic::scale::ScaleFactor;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The shared output raster.
///
/// Allocated once from the flight's bounding box and never resized;
/// `paste` is the only mutation entry point, and placements falling partly
/// outside the buffer are clipped by the backend.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Size the canvas to the ground extent between the bounding corners
    /// plus one full frame of margin per axis, so edge images survive
    /// their placement offsets without clipping.
    pub fn for_bounds(
        bounds: &MosaicBounds,
        geodesy: &Geodesy,
        scale: ScaleFactor,
        profile: &CameraProfile,
    ) -> Self {
        let horiz_feet = geodesy.horizontal_distance_feet(bounds.top_left, bounds.bottom_right);
        let vert_feet = geodesy.vertical_distance_feet(bounds.top_left, bounds.bottom_right);

        let width = scale.feet_to_pixels(horiz_feet).ceil() as u32 + profile.image_width_px;
        let height = scale.feet_to_pixels(vert_feet).ceil() as u32 + profile.image_height_px;

        debug!(width, height, "allocating canvas");
        Self {
            image: RgbaImage::from_pixel(width, height, BACKGROUND),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Composite one rotated photograph at the computed center; the
    /// fractional center rounds to the nearest pixel.
    pub fn paste<R: RasterOps>(&mut self, raster: &R, src: &RgbaImage, center_x: f64, center_y: f64) {
        raster.paste_alpha(
            &mut self.image,
            src,
            center_x.round() as i64,
            center_y.round() as i64,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::metadata::ImageRecord;

    fn small_profile() -> CameraProfile {
        CameraProfile::builder()
            .image_width_px(40)
            .image_height_px(30)
            .build()
    }

    fn record(lat: f64, long: f64) -> ImageRecord {
        ImageRecord {
            filename: "frame.jpg".to_string(),
            latitude: lat,
            longitude: long,
            altitude: 100.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    #[test]
    fn degenerate_bounds_leave_only_the_margin() {
        let records = vec![record(38.0, -123.0)];
        let profile = small_profile();
        let bounds = MosaicBounds::from_records(&records).unwrap();
        let geodesy = Geodesy::new(bounds.top_left);
        let scale = ScaleFactor::estimate(&records, &profile).unwrap();

        let canvas = Canvas::for_bounds(&bounds, &geodesy, scale, &profile);
        assert_eq!(canvas.width(), 40);
        assert_eq!(canvas.height(), 30);
    }

    #[test]
    fn dimensions_are_extent_plus_one_frame_of_margin() {
        let records = vec![record(38.001, -123.001), record(38.0, -123.0)];
        let profile = small_profile();
        let bounds = MosaicBounds::from_records(&records).unwrap();
        let geodesy = Geodesy::new(bounds.top_left);
        let scale = ScaleFactor::estimate(&records, &profile).unwrap();

        let canvas = Canvas::for_bounds(&bounds, &geodesy, scale, &profile);

        let extent_w = scale
            .feet_to_pixels(geodesy.horizontal_distance_feet(bounds.top_left, bounds.bottom_right))
            .ceil() as u32;
        let extent_h = scale
            .feet_to_pixels(geodesy.vertical_distance_feet(bounds.top_left, bounds.bottom_right))
            .ceil() as u32;

        assert!(extent_w > 0 && extent_h > 0);
        assert_eq!(canvas.width(), extent_w + 40);
        assert_eq!(canvas.height(), extent_h + 30);
    }

    #[test]
    fn canvas_starts_opaque_white() {
        let records = vec![record(38.0, -123.0)];
        let profile = small_profile();
        let bounds = MosaicBounds::from_records(&records).unwrap();
        let geodesy = Geodesy::new(bounds.top_left);
        let scale = ScaleFactor::estimate(&records, &profile).unwrap();

        let canvas = Canvas::for_bounds(&bounds, &geodesy, scale, &profile);
        assert_eq!(*canvas.image().get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        let (w, h) = (canvas.width(), canvas.height());
        assert_eq!(
            *canvas.image().get_pixel(w - 1, h - 1),
            Rgba([255, 255, 255, 255])
        );
    }
}
