//! A road map combined with the derived lookup structures the localization
//! layer queries: spatial index, by-id and node-to-way adjacency, bounds.

use rustc_hash::FxHashMap;

use crate::map::geometry::way_heading_at;
use crate::map::index::{DEFAULT_CELL_SIZE, SpatialIndex};
use crate::map::model::{Bounds, Node, RoadMap, Way};

/// Radius in meters within which [`EnhancedMap::way_heading_at_position`]
/// looks for a way to take its heading from.
pub const HEADING_LOOKUP_RADIUS: f64 = 50.0;

/// Read-only query view over a [`RoadMap`].
///
/// Built once; the borrowed map must outlive it. The node-to-way adjacency is
/// a derived index, not a second owner.
#[derive(Debug)]
pub struct EnhancedMap<'m> {
    map: &'m RoadMap,
    index: SpatialIndex,
    ways_by_id: FxHashMap<i64, usize>,
    node_to_ways: FxHashMap<i64, Vec<usize>>,
    bounds: Bounds,
}

impl<'m> EnhancedMap<'m> {
    /// Builds the view with the default grid cell size.
    pub fn new(map: &'m RoadMap) -> Self {
        EnhancedMap::with_cell_size(map, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(map: &'m RoadMap, cell_size: f64) -> Self {
        let mut ways_by_id = FxHashMap::default();
        let mut node_to_ways: FxHashMap<i64, Vec<usize>> = FxHashMap::default();

        for (way_ix, way) in map.ways.iter().enumerate() {
            ways_by_id.insert(way.id, way_ix);

            for node in &way.nodes {
                node_to_ways.entry(*node).or_default().push(way_ix);
            }
        }

        EnhancedMap {
            map,
            index: map.build_spatial_index(cell_size),
            ways_by_id,
            node_to_ways,
            bounds: map.bounds(),
        }
    }

    pub fn map(&self) -> &'m RoadMap {
        self.map
    }

    pub fn nodes(&self) -> &'m FxHashMap<i64, Node> {
        &self.map.nodes
    }

    pub fn ways(&self) -> &'m [Way] {
        &self.map.ways
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn way_by_id(&self, id: i64) -> Option<&'m Way> {
        self.ways_by_id.get(&id).map(|&ix| &self.map.ways[ix])
    }

    /// Ways referencing the given node.
    pub fn connected_ways(&self, node_id: i64) -> Vec<&'m Way> {
        self.node_to_ways
            .get(&node_id)
            .into_iter()
            .flatten()
            .map(|&ix| &self.map.ways[ix])
            .collect()
    }

    /// Whether a way lies within `tolerance` meters of the position.
    pub fn is_valid_position(&self, lat: f64, lon: f64, tolerance: f64) -> bool {
        self.find_nearest_way(lat, lon, tolerance).is_some()
    }

    /// Indexed nearest-way query; distance is guaranteed ≤ `max_dist`.
    pub fn find_nearest_way(&self, lat: f64, lon: f64, max_dist: f64) -> Option<(&'m Way, f64)> {
        self.map.nearest_way(lat, lon, max_dist, Some(&self.index))
    }

    /// Indexed nearest-node query.
    pub fn find_nearest_node(&self, lat: f64, lon: f64, max_dist: f64) -> Option<(&'m Node, f64)> {
        self.map.nearest_node(lat, lon, max_dist, Some(&self.index))
    }

    /// Heading of the nearest way at the position, or 0 when no way lies
    /// within [`HEADING_LOOKUP_RADIUS`].
    pub fn way_heading_at_position(&self, lat: f64, lon: f64) -> f64 {
        match self.find_nearest_way(lat, lon, HEADING_LOOKUP_RADIUS) {
            Some((way, _)) => way_heading_at(way, lat, lon, &self.map.nodes),
            None => 0.0,
        }
    }
}
