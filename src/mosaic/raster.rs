//! Raster primitives behind a backend seam.
//!
//! The pipeline only needs four operations on RGBA buffers; they sit behind
//! a trait so tests can substitute a recording mock.

mod image_backend;
mod ops;

pub use image_backend::ImageRasterOps;
pub use ops::RasterOps;
