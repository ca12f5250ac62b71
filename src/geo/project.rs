//! Projection of a point onto a great-circle-approximated line segment.

use crate::geo::distance::haversine_distance;

/// Distance in meters from `(lat, lon)` to the segment between `(lat1, lon1)`
/// and `(lat2, lon2)`.
///
/// The projection parameter is computed with a planar approximation in
/// radians and clamped to [0, 1]; the reported distance is the haversine
/// distance to the closest point, interpolated in degree space. Valid for the
/// segment lengths found in road networks, where the flat-earth error is
/// negligible against the quantities being compared.
pub fn distance_to_segment(
    lat: f64,
    lon: f64,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> f64 {
    let p_lat = lat.to_radians();
    let p_lon = lon.to_radians();
    let a_lat = lat1.to_radians();
    let a_lon = lon1.to_radians();
    let b_lat = lat2.to_radians();
    let b_lon = lon2.to_radians();

    let d_lat = b_lat - a_lat;
    let d_lon = b_lon - a_lon;

    if d_lat == 0.0 && d_lon == 0.0 {
        // Degenerate segment, both endpoints coincide.
        return haversine_distance(lat, lon, lat1, lon1);
    }

    let t = ((p_lat - a_lat) * d_lat + (p_lon - a_lon) * d_lon) / (d_lat * d_lat + d_lon * d_lon);
    let t = t.clamp(0.0, 1.0);

    let closest_lat = lat1 + t * (lat2 - lat1);
    let closest_lon = lon1 + t * (lon2 - lon1);

    haversine_distance(lat, lon, closest_lat, closest_lon)
}
