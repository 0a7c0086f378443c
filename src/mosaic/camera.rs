//! Camera optics profile and angle-of-view calculations.

/// Angle of view for one sensor axis, in degrees.
///
/// Standard optical formula: `2 * atan(side / (2 * focal))`.
pub fn angle_of_view_degrees(side_mm: f64, focal_length_mm: f64) -> f64 {
    (2.0 * (side_mm / (2.0 * focal_length_mm)).atan()).to_degrees()
}

/// Physical camera constants plus the pixel dimensions of the frames it
/// produces.
///
/// Injected wherever optics or frame size matter so tests and other fleets
/// can substitute their own profile instead of relying on globals.
#[derive(Debug, Clone)]
pub struct CameraProfile {
    /// Sensor width in millimeters
    pub sensor_width_mm: f64,
    /// Sensor height in millimeters
    pub sensor_height_mm: f64,
    /// Lens focal length in millimeters
    pub focal_length_mm: f64,
    /// Width of each captured frame in pixels
    pub image_width_px: u32,
    /// Height of each captured frame in pixels
    pub image_height_px: u32,
}

impl Default for CameraProfile {
    /// 35mm-format sensor behind a 20mm lens producing 4000x3000 frames.
    fn default() -> Self {
        Self {
            sensor_width_mm: 36.0,
            sensor_height_mm: 26.0,
            focal_length_mm: 20.0,
            image_width_px: 4000,
            image_height_px: 3000,
        }
    }
}

impl CameraProfile {
    pub fn builder() -> CameraProfileBuilder {
        CameraProfileBuilder::default()
    }

    pub fn horizontal_field_of_view(&self) -> f64 {
        angle_of_view_degrees(self.sensor_width_mm, self.focal_length_mm)
    }

    pub fn vertical_field_of_view(&self) -> f64 {
        angle_of_view_degrees(self.sensor_height_mm, self.focal_length_mm)
    }
}

/// Builder for CameraProfile
#[derive(Default)]
pub struct CameraProfileBuilder {
    sensor_width_mm: Option<f64>,
    sensor_height_mm: Option<f64>,
    focal_length_mm: Option<f64>,
    image_width_px: Option<u32>,
    image_height_px: Option<u32>,
}

impl CameraProfileBuilder {
    pub fn sensor_width_mm(mut self, width: f64) -> Self {
        self.sensor_width_mm = Some(width);
        self
    }

    pub fn sensor_height_mm(mut self, height: f64) -> Self {
        self.sensor_height_mm = Some(height);
        self
    }

    pub fn focal_length_mm(mut self, focal_length: f64) -> Self {
        self.focal_length_mm = Some(focal_length);
        self
    }

    pub fn image_width_px(mut self, width: u32) -> Self {
        self.image_width_px = Some(width);
        self
    }

    pub fn image_height_px(mut self, height: u32) -> Self {
        self.image_height_px = Some(height);
        self
    }

    pub fn build(self) -> CameraProfile {
        let default = CameraProfile::default();
        CameraProfile {
            sensor_width_mm: self.sensor_width_mm.unwrap_or(default.sensor_width_mm),
            sensor_height_mm: self.sensor_height_mm.unwrap_or(default.sensor_height_mm),
            focal_length_mm: self.focal_length_mm.unwrap_or(default.focal_length_mm),
            image_width_px: self.image_width_px.unwrap_or(default.image_width_px),
            image_height_px: self.image_height_px.unwrap_or(default.image_height_px),
        }
    }
}
