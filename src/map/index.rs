//! Uniform-grid spatial index over nodes and ways.
//!
//! Ways are indexed by the cells their *nodes* fall in, not by full segment
//! coverage: a segment passing through a cell without a vertex inside it is
//! invisible to that cell. Queries therefore over-scan by one cell ring and
//! callers must keep the cell size at or below the expected query radius for
//! full recall. Results are unordered candidates only; callers filter by
//! exact distance.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::geo::distance::haversine_distance;
use crate::map::geometry::distance_to_way;
use crate::map::model::{Node, RoadMap, Way};

/// Cell edge length in degrees (~100 m) recommended for OSM-scale maps.
pub const DEFAULT_CELL_SIZE: f64 = 0.001;

/// Conversion used to turn query radii into cell spans: 1° ≈ 111 km.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Integer grid coordinates `(⌊lat/cell⌋, ⌊lon/cell⌋)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub lat: i64,
    pub lon: i64,
}

/// Grid buckets of way indices (into [`RoadMap::ways`]) and node ids.
///
/// Stores indices rather than references, keeping the index free of any
/// ownership over the map it describes.
#[derive(Debug)]
pub struct SpatialIndex {
    way_grid: FxHashMap<GridCell, Vec<usize>>,
    node_grid: FxHashMap<GridCell, Vec<i64>>,
    cell_size: f64,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        SpatialIndex {
            way_grid: FxHashMap::default(),
            node_grid: FxHashMap::default(),
            cell_size,
        }
    }

    fn cell_of(&self, lat: f64, lon: f64) -> GridCell {
        GridCell {
            lat: (lat / self.cell_size).floor() as i64,
            lon: (lon / self.cell_size).floor() as i64,
        }
    }

    /// Inserts the way into every distinct cell one of its nodes falls in.
    pub fn insert_way(&mut self, way_ix: usize, way: &Way, nodes: &FxHashMap<i64, Node>) {
        let mut seen = FxHashSet::default();

        for id in &way.nodes {
            let Some(node) = nodes.get(id) else { continue };

            let cell = self.cell_of(node.lat, node.lon);
            if seen.insert(cell) {
                self.way_grid.entry(cell).or_default().push(way_ix);
            }
        }
    }

    pub fn insert_node(&mut self, node: &Node) {
        let cell = self.cell_of(node.lat, node.lon);
        self.node_grid.entry(cell).or_default().push(node.id);
    }

    fn cell_span(&self, radius: f64) -> i64 {
        let radius_in_degrees = radius / METERS_PER_DEGREE;
        (radius_in_degrees / self.cell_size).ceil() as i64 + 1
    }

    /// Way indices within the square of cells covering `radius` meters,
    /// deduplicated, in no particular order.
    pub fn query_ways(&self, lat: f64, lon: f64, radius: f64) -> Vec<usize> {
        let center = self.cell_of(lat, lon);
        let span = self.cell_span(radius);

        let mut seen = FxHashSet::default();
        let mut results = Vec::new();

        for d_lat in -span..=span {
            for d_lon in -span..=span {
                let cell = GridCell {
                    lat: center.lat + d_lat,
                    lon: center.lon + d_lon,
                };

                for &way_ix in self.way_grid.get(&cell).into_iter().flatten() {
                    if seen.insert(way_ix) {
                        results.push(way_ix);
                    }
                }
            }
        }

        results
    }

    /// Node ids within the square of cells covering `radius` meters.
    pub fn query_nodes(&self, lat: f64, lon: f64, radius: f64) -> Vec<i64> {
        let center = self.cell_of(lat, lon);
        let span = self.cell_span(radius);

        let mut seen = FxHashSet::default();
        let mut results = Vec::new();

        for d_lat in -span..=span {
            for d_lon in -span..=span {
                let cell = GridCell {
                    lat: center.lat + d_lat,
                    lon: center.lon + d_lon,
                };

                for &id in self.node_grid.get(&cell).into_iter().flatten() {
                    if seen.insert(id) {
                        results.push(id);
                    }
                }
            }
        }

        results
    }
}

impl RoadMap {
    /// Builds a grid index over all ways and nodes of the map.
    pub fn build_spatial_index(&self, cell_size: f64) -> SpatialIndex {
        let mut index = SpatialIndex::new(cell_size);

        for (way_ix, way) in self.ways.iter().enumerate() {
            index.insert_way(way_ix, way, &self.nodes);
        }
        for node in self.nodes.values() {
            index.insert_node(node);
        }

        index
    }

    /// Closest way within `max_dist` meters, together with its distance.
    ///
    /// With an index, only grid candidates are examined; without one the scan
    /// is linear over all ways. Ties keep the first way encountered.
    pub fn nearest_way(
        &self,
        lat: f64,
        lon: f64,
        max_dist: f64,
        index: Option<&SpatialIndex>,
    ) -> Option<(&Way, f64)> {
        let candidates: Vec<&Way> = match index {
            Some(index) => index
                .query_ways(lat, lon, max_dist)
                .into_iter()
                .map(|ix| &self.ways[ix])
                .collect(),
            None => self.ways.iter().collect(),
        };

        let mut nearest = None;
        let mut min_dist = f64::INFINITY;

        for way in candidates {
            let dist = distance_to_way(lat, lon, way, &self.nodes);
            if dist < min_dist && dist <= max_dist {
                min_dist = dist;
                nearest = Some(way);
            }
        }

        nearest.map(|way| (way, min_dist))
    }

    /// Closest node within `max_dist` meters, together with its distance.
    pub fn nearest_node(
        &self,
        lat: f64,
        lon: f64,
        max_dist: f64,
        index: Option<&SpatialIndex>,
    ) -> Option<(&Node, f64)> {
        let candidates: Vec<&Node> = match index {
            Some(index) => index
                .query_nodes(lat, lon, max_dist)
                .into_iter()
                .filter_map(|id| self.nodes.get(&id))
                .collect(),
            None => self.nodes.values().collect(),
        };

        let mut nearest = None;
        let mut min_dist = f64::INFINITY;

        for node in candidates {
            let dist = haversine_distance(lat, lon, node.lat, node.lon);
            if dist < min_dist && dist <= max_dist {
                min_dist = dist;
                nearest = Some(node);
            }
        }

        nearest.map(|node| (node, min_dist))
    }
}
