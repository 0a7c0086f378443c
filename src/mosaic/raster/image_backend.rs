//! Raster backend on the `image` crate.

use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::mosaic::common::error::{MosaicError, Result};
use crate::mosaic::raster::ops::RasterOps;

/// Trig values this close to an exact 0 or ±1 are snapped so quarter-turn
/// rotations keep exact dimensions.
const AXIS_SNAP_EPSILON: f64 = 1e-12;

pub struct ImageRasterOps;

impl RasterOps for ImageRasterOps {
    fn open(&self, path: &Path) -> Result<RgbaImage> {
        debug!(path = %path.display(), "decoding photograph");
        let img = image::open(path)
            .map_err(|e| MosaicError::AssetUnavailable(format!("{}: {}", path.display(), e)))?;
        Ok(img.to_rgba8())
    }

    fn rotate_expand(&self, src: &RgbaImage, degrees: f64) -> RgbaImage {
        let theta = degrees.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let sin_t = snap(sin_t);
        let cos_t = snap(cos_t);

        let (w, h) = (src.width() as f64, src.height() as f64);
        let out_w = (w * cos_t.abs() + h * sin_t.abs()).ceil() as u32;
        let out_h = (w * sin_t.abs() + h * cos_t.abs()).ceil() as u32;

        let cx = w / 2.0;
        let cy = h / 2.0;
        let ocx = out_w as f64 / 2.0;
        let ocy = out_h as f64 / 2.0;

        let mut out = RgbaImage::from_pixel(out_w, out_h, Rgba([0, 0, 0, 0]));
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            // Inverse-map each destination pixel back into the source
            // frame, sampling the nearest source pixel.
            let dx = x as f64 + 0.5 - ocx;
            let dy = y as f64 + 0.5 - ocy;
            let sx = (dx * cos_t - dy * sin_t + cx).floor() as i64;
            let sy = (dx * sin_t + dy * cos_t + cy).floor() as i64;
            if sx >= 0 && sy >= 0 && (sx as u32) < src.width() && (sy as u32) < src.height() {
                *pixel = *src.get_pixel(sx as u32, sy as u32);
            }
        }
        out
    }

    fn paste_alpha(&self, dest: &mut RgbaImage, src: &RgbaImage, center_x: i64, center_y: i64) {
        let left = center_x - src.width() as i64 / 2;
        let top = center_y - src.height() as i64 / 2;

        for (sx, sy, &pixel) in src.enumerate_pixels() {
            let dx = left + sx as i64;
            let dy = top + sy as i64;
            if dx < 0 || dy < 0 || dx >= dest.width() as i64 || dy >= dest.height() as i64 {
                continue;
            }
            let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
            *dst_pixel = blend_over(pixel, *dst_pixel);
        }
    }

    fn save(&self, img: &RgbaImage, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "encoding mosaic");
        img.save(path)
            .map_err(|e| MosaicError::EncodeError(format!("{}: {}", path.display(), e)))
    }
}

fn snap(value: f64) -> f64 {
    if value.abs() < AXIS_SNAP_EPSILON {
        0.0
    } else if (value.abs() - 1.0).abs() < AXIS_SNAP_EPSILON {
        value.signum()
    } else {
        value
    }
}

/// Source-over blend with rounded integer arithmetic.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let inv = 255 - sa;
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = ((src[c] as u32 * sa + dst[c] as u32 * inv + 127) / 255) as u8;
    }
    out[3] = (sa + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
    Rgba(out)
}
