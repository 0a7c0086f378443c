use std::ops::Range;
use std::path::Path;

use tracing::{info, instrument};

use crate::mosaic::camera::CameraProfile;
use crate::mosaic::canvas::Canvas;
use crate::mosaic::common::error::Result;
use crate::mosaic::geodesy::Geodesy;
use crate::mosaic::metadata::{self, ImageRecord, MosaicBounds};
use crate::mosaic::placement::PlacementEngine;
use crate::mosaic::raster::{ImageRasterOps, RasterOps};
use crate::mosaic::scale::ScaleFactor;

/// Orchestrates one mosaic build: validates the record set, precomputes the
/// per-build constants, then rotates and composites each photograph onto
/// the shared canvas.
pub struct MosaicPipeline<R: RasterOps> {
    raster: R,
    records: Vec<ImageRecord>,
    engine: PlacementEngine,
    canvas: Canvas,
}

impl MosaicPipeline<ImageRasterOps> {
    pub fn new(records: Vec<ImageRecord>, profile: CameraProfile) -> Result<Self> {
        Self::with_backend(ImageRasterOps, records, profile)
    }
}

impl<R: RasterOps> MosaicPipeline<R> {
    /// Validate the record set and precompute everything constant for one
    /// build: bounds, scale, geodesy reference, and the canvas. Metadata
    /// errors surface here, before the canvas is allocated.
    pub fn with_backend(raster: R, records: Vec<ImageRecord>, profile: CameraProfile) -> Result<Self> {
        metadata::validate_records(&records)?;

        let bounds = MosaicBounds::from_records(&records)?;
        let scale = ScaleFactor::estimate(&records, &profile)?;
        let geodesy = Geodesy::new(bounds.top_left);
        let canvas = Canvas::for_bounds(&bounds, &geodesy, scale, &profile);

        info!(
            images = records.len(),
            pixels_per_foot = scale.pixels_per_foot(),
            canvas_width = canvas.width(),
            canvas_height = canvas.height(),
            "mosaic build prepared"
        );

        Ok(Self {
            raster,
            records,
            engine: PlacementEngine::new(bounds, geodesy, scale, profile),
            canvas,
        })
    }

    /// Place one photograph: compute its corrected center, rotate its
    /// raster to cancel the capture yaw, and composite it onto the canvas.
    /// A photograph that cannot be opened aborts the build; skipping it
    /// would leave an unexplained gap in the mosaic.
    #[instrument(skip(self, record), fields(filename = %record.filename))]
    pub fn add_image(&mut self, record: &ImageRecord) -> Result<()> {
        let placement = self.engine.place(record);

        let source = {
            let _span = tracing::info_span!("open_photograph").entered();
            self.raster.open(Path::new(&record.filename))?
        };

        let rotated = {
            let _span = tracing::info_span!("rotate_expand").entered();
            self.raster.rotate_expand(&source, placement.rotate_degrees)
        };

        info!(
            x = placement.center_x.round(),
            y = placement.center_y.round(),
            rotation = placement.rotate_degrees,
            "centering image"
        );
        self.canvas
            .paste(&self.raster, &rotated, placement.center_x, placement.center_y);
        Ok(())
    }

    /// Composite every record, in metadata order.
    pub fn add_all(&mut self) -> Result<()> {
        self.add_range(0..self.records.len())
    }

    /// Composite a subrange of records; useful for debugging partial
    /// builds.
    pub fn add_range(&mut self, range: Range<usize>) -> Result<()> {
        for index in range {
            let record = self.records[index].clone();
            self.add_image(&record)?;
        }
        Ok(())
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    #[instrument(skip(self, path))]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!(path = %path.display(), "saving mosaic");
        self.raster.save(self.canvas.image(), path)
    }
}

/// One-call build: validate, place, rotate, and composite every record,
/// returning the finished canvas.
pub fn build_mosaic(records: Vec<ImageRecord>, profile: CameraProfile) -> Result<Canvas> {
    let mut pipeline = MosaicPipeline::new(records, profile)?;
    pipeline.add_all()?;
    Ok(pipeline.into_canvas())
}
