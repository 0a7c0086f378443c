//! Per-image capture metadata: loading, validation, and the geographic
//! bounding box of a flight.

use std::path::Path;

use serde::Deserialize;

use crate::mosaic::common::error::{MosaicError, Result};
use crate::mosaic::geodesy::GeoPoint;

/// One captured frame: where the device was and how it was oriented at the
/// moment of capture. Loaded once from metadata and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    /// Path of the photograph on disk.
    pub filename: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    /// Meters above the reference surface.
    pub altitude: f64,
    /// Degrees about the vertical axis; 0 = true north, positive clockwise.
    pub yaw: f64,
    /// Degrees about the lateral axis; positive = nose up.
    pub pitch: f64,
    /// Degrees about the longitudinal axis; positive = right wing up.
    pub roll: f64,
}

impl ImageRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Domain checks on one record. Orientation angles only need to be
    /// finite; position and altitude have hard ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(MosaicError::InvalidMetadata(format!(
                "{}: latitude {} out of range",
                self.filename, self.latitude
            )));
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(MosaicError::InvalidMetadata(format!(
                "{}: longitude {} out of range",
                self.filename, self.longitude
            )));
        }
        if !self.altitude.is_finite() || self.altitude <= 0.0 {
            return Err(MosaicError::InvalidMetadata(format!(
                "{}: altitude {} must be positive",
                self.filename, self.altitude
            )));
        }
        for (name, value) in [("yaw", self.yaw), ("pitch", self.pitch), ("roll", self.roll)] {
            if !value.is_finite() {
                return Err(MosaicError::InvalidMetadata(format!(
                    "{}: {} is not finite",
                    self.filename, name
                )));
            }
        }
        Ok(())
    }
}

/// Reject an empty set or any out-of-domain record before the build
/// allocates anything.
pub fn validate_records(records: &[ImageRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(MosaicError::EmptyImageSet);
    }
    for record in records {
        record.validate()?;
    }
    Ok(())
}

/// Load image records from a JSON array of objects with fields `filename`,
/// `lat`, `long`, `altitude`, `yaw`, `pitch`, and `roll`.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<ImageRecord>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .map_err(|e| MosaicError::MetadataParse(format!("{}: {}", path.display(), e)))?;
    let records: Vec<ImageRecord> = serde_json::from_str(&data)
        .map_err(|e| MosaicError::MetadataParse(format!("{}: {}", path.display(), e)))?;
    Ok(records)
}

/// Geographic bounding box of a record set.
///
/// `top_left` carries the maximum latitude and minimum longitude seen in
/// the set, `bottom_right` the minimum latitude and maximum longitude.
#[derive(Debug, Clone, Copy)]
pub struct MosaicBounds {
    pub top_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl MosaicBounds {
    pub fn from_records(records: &[ImageRecord]) -> Result<Self> {
        let first = records.first().ok_or(MosaicError::EmptyImageSet)?;

        let mut min_lat = first.latitude;
        let mut max_lat = first.latitude;
        let mut min_long = first.longitude;
        let mut max_long = first.longitude;

        for record in &records[1..] {
            min_lat = min_lat.min(record.latitude);
            max_lat = max_lat.max(record.latitude);
            min_long = min_long.min(record.longitude);
            max_long = max_long.max(record.longitude);
        }

        Ok(Self {
            top_left: GeoPoint::new(max_lat, min_long),
            bottom_right: GeoPoint::new(min_lat, max_long),
        })
    }
}
