//! Compass bearing arithmetic.

/// Wraps a bearing into [0, 360).
pub fn normalize_bearing(bearing: f64) -> f64 {
    bearing.rem_euclid(360.0)
}

/// Signed difference `to - from`, wrapped into [-180, 180].
///
/// Positive means `to` lies clockwise of `from`. Inputs are expected to be
/// normalized bearings, so a single wrap step suffices.
pub fn bearing_difference(from: f64, to: f64) -> f64 {
    let diff = to - from;

    if diff > 180.0 {
        diff - 360.0
    } else if diff < -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Initial great-circle bearing from point 1 to point 2, in [0, 360).
///
/// See the [forward azimuth formula](https://www.movable-type.co.uk/scripts/latlong.html).
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}
