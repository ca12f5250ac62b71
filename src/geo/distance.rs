//! Haversine distance and the spherical destination-point problem.

use crate::geo::coord::{Axis, CoordinateDecimal};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Destination coordinates are quantized to this many decimal degrees
/// (1e-4° ≈ 11 m). The quantization is observable: motion prediction and the
/// synthetic grid builder both run through [`destination_point`], so fixtures
/// depend on it.
const DESTINATION_PRECISION: f64 = 1e4;

/// Great-circle distance between two positions, in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}

/// Travels `distance` meters from `(lat, lon)` along the initial bearing
/// `bearing` and returns the destination, rounded to 1e-4 degrees.
///
/// Solves the direct geodesy problem on the sphere:
///
/// ```text
/// φ2 = asin(sin φ1 · cos δ + cos φ1 · sin δ · cos θ)
/// λ2 = λ1 + atan2(sin θ · sin δ · cos φ1, cos δ − sin φ1 · sin φ2)
/// ```
///
/// with angular distance δ = d/R.
pub fn destination_point(
    lat: CoordinateDecimal,
    lon: CoordinateDecimal,
    bearing: f64,
    distance: f64,
) -> (CoordinateDecimal, CoordinateDecimal) {
    let phi1 = lat.degrees.to_radians();
    let lambda1 = lon.degrees.to_radians();
    let theta = bearing.to_radians();
    let delta = distance / EARTH_RADIUS;

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    let lat2 = (phi2.to_degrees() * DESTINATION_PRECISION).round() / DESTINATION_PRECISION;
    let lon2 = (lambda2.to_degrees() * DESTINATION_PRECISION).round() / DESTINATION_PRECISION;

    (
        CoordinateDecimal::new(lat2, Axis::Latitude),
        CoordinateDecimal::new(lon2, Axis::Longitude),
    )
}
