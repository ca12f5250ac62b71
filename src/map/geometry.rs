//! Way-level geometry: distance to a polyline, local heading, total length.
//!
//! Node references that do not resolve in the node map are skipped, treating
//! the segment as absent; a way with fewer than two resolvable nodes has no
//! geometry.

use rustc_hash::FxHashMap;

use crate::geo::bearing::bearing;
use crate::geo::distance::haversine_distance;
use crate::geo::project::distance_to_segment;
use crate::map::model::{Node, Way};

/// Minimum distance in meters from a position to any segment of the way, or
/// +∞ when the way has fewer than two resolvable nodes.
pub fn distance_to_way(lat: f64, lon: f64, way: &Way, nodes: &FxHashMap<i64, Node>) -> f64 {
    let mut min_dist = f64::INFINITY;

    for pair in way.nodes.windows(2) {
        let (Some(a), Some(b)) = (nodes.get(&pair[0]), nodes.get(&pair[1])) else {
            continue;
        };

        let dist = distance_to_segment(lat, lon, a.lat, a.lon, b.lat, b.lon);
        if dist < min_dist {
            min_dist = dist;
        }
    }

    min_dist
}

/// Bearing of the `segment`-th segment of the way, 0 when out of range or
/// unresolvable.
pub fn way_heading(way: &Way, segment: usize, nodes: &FxHashMap<i64, Node>) -> f64 {
    if segment + 1 >= way.nodes.len() {
        return 0.0;
    }

    let (Some(a), Some(b)) = (nodes.get(&way.nodes[segment]), nodes.get(&way.nodes[segment + 1]))
    else {
        return 0.0;
    };

    bearing(a.lat, a.lon, b.lat, b.lon)
}

/// Bearing of the segment closest to the given position.
pub fn way_heading_at(way: &Way, lat: f64, lon: f64, nodes: &FxHashMap<i64, Node>) -> f64 {
    if way.nodes.len() < 2 {
        return 0.0;
    }

    let mut min_dist = f64::INFINITY;
    let mut best_segment = 0;

    for (i, pair) in way.nodes.windows(2).enumerate() {
        let (Some(a), Some(b)) = (nodes.get(&pair[0]), nodes.get(&pair[1])) else {
            continue;
        };

        let dist = distance_to_segment(lat, lon, a.lat, a.lon, b.lat, b.lon);
        if dist < min_dist {
            min_dist = dist;
            best_segment = i;
        }
    }

    way_heading(way, best_segment, nodes)
}

/// Haversine length of the way in meters, skipping unresolvable segments.
pub fn way_length(way: &Way, nodes: &FxHashMap<i64, Node>) -> f64 {
    way.nodes
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (nodes.get(&pair[0])?, nodes.get(&pair[1])?);
            Some(haversine_distance(a.lat, a.lon, b.lat, b.lon))
        })
        .sum()
}
