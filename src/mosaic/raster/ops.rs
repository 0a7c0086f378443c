use std::path::Path;

use image::RgbaImage;

use crate::mosaic::common::error::Result;

/// The raster primitives a mosaic build needs.
///
/// Implementations must rotate about the image center with bounding-box
/// expansion and composite using the source's own alpha channel as the
/// blend mask.
pub trait RasterOps {
    /// Decode a photograph into an RGBA buffer.
    fn open(&self, path: &Path) -> Result<RgbaImage>;

    /// Rotate counter-clockwise about the center, expanding the output so
    /// no content is clipped; area outside the source footprint is
    /// transparent.
    fn rotate_expand(&self, src: &RgbaImage, degrees: f64) -> RgbaImage;

    /// Alpha-composite `src` onto `dest` centered at `(center_x,
    /// center_y)`, clipping at the destination edges.
    fn paste_alpha(&self, dest: &mut RgbaImage, src: &RgbaImage, center_x: i64, center_y: i64);

    /// Encode `img` to `path`; the format follows the file extension.
    fn save(&self, img: &RgbaImage, path: &Path) -> Result<()>;
}
