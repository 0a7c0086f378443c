//! Ground-distance calculations on the WGS84 ellipsoid.
//!
//! Placement works in feet of ground distance, so latitude/longitude deltas
//! must be converted to linear distances with a real ellipsoidal geodesic
//! rather than flat-plane math on degrees, which distorts the east-west
//! scale away from the equator. The distances are decomposed into
//! independent horizontal and vertical components by pinning one axis to a
//! reference coordinate; the coupling this ignores is negligible at the
//! few-hundred-foot span of a single image footprint.

/// WGS84 ellipsoid semi-major axis (equatorial radius) in meters
const WGS84_A: f64 = 6378137.0;

/// WGS84 ellipsoid flattening factor
const WGS84_F: f64 = 1.0 / 298.257223563;

/// WGS84 ellipsoid semi-minor axis (polar radius) in meters
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

const FEET_PER_METER: f64 = 3.28084;

/// Convergence threshold for the Vincenty lambda iteration, in radians.
const VINCENTY_EPSILON: f64 = 1e-12;

/// Nearly-antipodal point pairs can fail to converge; never relevant for
/// points within one flight, but the iteration is bounded anyway.
const VINCENTY_MAX_ITERATIONS: usize = 200;

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geodesic distance between two points in feet.
pub fn distance_feet(p1: GeoPoint, p2: GeoPoint) -> f64 {
    meters_to_feet(vincenty_meters(p1, p2))
}

/// Axis-decomposed ground distances relative to a fixed reference point.
///
/// Horizontal distances are measured with both latitudes pinned to the
/// reference latitude, vertical distances with both longitudes pinned to
/// the reference longitude, so every image in one build shares the same
/// per-axis scale regardless of its own position.
#[derive(Debug, Clone, Copy)]
pub struct Geodesy {
    reference: GeoPoint,
}

impl Geodesy {
    pub fn new(reference: GeoPoint) -> Self {
        Self { reference }
    }

    /// East-west ground distance in feet; only the longitude delta
    /// contributes.
    pub fn horizontal_distance_feet(&self, p1: GeoPoint, p2: GeoPoint) -> f64 {
        distance_feet(
            GeoPoint::new(self.reference.latitude, p1.longitude),
            GeoPoint::new(self.reference.latitude, p2.longitude),
        )
    }

    /// North-south ground distance in feet; only the latitude delta
    /// contributes.
    pub fn vertical_distance_feet(&self, p1: GeoPoint, p2: GeoPoint) -> f64 {
        distance_feet(
            GeoPoint::new(p1.latitude, self.reference.longitude),
            GeoPoint::new(p2.latitude, self.reference.longitude),
        )
    }
}

/// Vincenty inverse solution on the WGS84 ellipsoid.
///
/// Iterates the longitude difference on the auxiliary sphere until it
/// stabilizes, then evaluates the ellipsoidal arc length. Accurate to well
/// under a millimeter at flight scales.
fn vincenty_meters(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let u1 = ((1.0 - WGS84_F) * p1.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.latitude.to_radians().tan()).atan();
    let l = (p2.longitude - p1.longitude).to_radians();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        // Coincident points.
        if sin_sigma == 0.0 {
            return 0.0;
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // cos_2sigma_m is indeterminate on an equatorial line.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_EPSILON {
            let u_sq =
                cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
            let a_coef = 1.0
                + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let b_coef = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = b_coef
                * sin_sigma
                * (cos_2sigma_m
                    + b_coef / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - b_coef / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
            return WGS84_B * a_coef * (sigma - delta_sigma);
        }
    }

    // Only reachable for near-antipodal inputs, far outside any flight.
    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = GeoPoint::new(38.0, -123.0);
        assert_eq!(distance_feet(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let p1 = GeoPoint::new(38.0, -123.0);
        let p2 = GeoPoint::new(38.1, -122.9);
        let d12 = distance_feet(p1, p2);
        let d21 = distance_feet(p2, p1);
        assert!((d12 - d21).abs() < 1e-6, "{} vs {}", d12, d21);
    }

    #[test]
    fn meridian_arc_at_38_north() {
        // One millidegree of latitude near 38N is about 111.0 m = 364.2 ft.
        let d = distance_feet(GeoPoint::new(38.0, -123.0), GeoPoint::new(38.001, -123.0));
        assert!((d - 364.2).abs() < 1.0, "got {} ft", d);
    }

    #[test]
    fn parallel_arc_at_38_north() {
        // One millidegree of longitude at 38N is about 87.8 m = 288.2 ft,
        // noticeably shorter than the meridian arc.
        let d = distance_feet(GeoPoint::new(38.0, -123.0), GeoPoint::new(38.0, -122.999));
        assert!((d - 288.2).abs() < 1.0, "got {} ft", d);
    }

    #[test]
    fn london_to_paris() {
        let d = vincenty_meters(GeoPoint::new(51.5074, -0.1278), GeoPoint::new(48.8566, 2.3522));
        assert!((d - 343_900.0).abs() < 2_000.0, "got {} m", d);
    }

    #[test]
    fn horizontal_distance_ignores_point_latitudes() {
        let geodesy = Geodesy::new(GeoPoint::new(38.0, -123.0));
        let a = geodesy.horizontal_distance_feet(
            GeoPoint::new(38.5, -123.0),
            GeoPoint::new(38.7, -122.99),
        );
        let b = geodesy.horizontal_distance_feet(
            GeoPoint::new(10.0, -123.0),
            GeoPoint::new(-45.0, -122.99),
        );
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn vertical_distance_ignores_point_longitudes() {
        let geodesy = Geodesy::new(GeoPoint::new(38.0, -123.0));
        let a = geodesy.vertical_distance_feet(
            GeoPoint::new(38.0, -100.0),
            GeoPoint::new(38.001, 10.0),
        );
        let b = geodesy.vertical_distance_feet(
            GeoPoint::new(38.0, -123.0),
            GeoPoint::new(38.001, -123.0),
        );
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn meters_to_feet_conversion() {
        assert!((meters_to_feet(1.0) - 3.28084).abs() < 1e-9);
        assert!((meters_to_feet(100.0) - 328.084).abs() < 1e-9);
    }
}
