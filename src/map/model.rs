//! Core road network model: nodes, tagged ways, and the map that owns them.
//!
//! The serde field names mirror the snapshot format consumed and produced by
//! [`crate::snapshot`]: capitalised keys, node maps keyed by stringified id,
//! tags as `{Key, Value}` pairs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A geolocated point. Immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    pub lon: f64,
}

/// A single key/value annotation on a way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Ordered tag collection with by-key lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Tags(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(Tag {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Value of the first tag with the given key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

/// A polyline over node references.
///
/// After topology splitting every way is an edge between endpoints or
/// intersection nodes: no interior node is shared with any other way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Nodes")]
    pub nodes: Vec<i64>,
    #[serde(rename = "Tags", default)]
    pub tags: Tags,
}

/// The road network: an id-keyed node map and an ordered way list.
///
/// Invariants after ingest: every node id referenced by a way resolves, and
/// every retained node is referenced by at least one way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadMap {
    #[serde(rename = "Ways")]
    pub ways: Vec<Way>,
    #[serde(rename = "Nodes")]
    pub nodes: FxHashMap<i64, Node>,
}

/// Axis-aligned bounding box over the node map, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl RoadMap {
    pub fn new() -> Self {
        RoadMap::default()
    }

    /// Bounding box of all nodes; the zero box for an empty map.
    pub fn bounds(&self) -> Bounds {
        if self.nodes.is_empty() {
            return Bounds::default();
        }

        let mut bounds = Bounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };

        for node in self.nodes.values() {
            bounds.min_lat = bounds.min_lat.min(node.lat);
            bounds.max_lat = bounds.max_lat.max(node.lat);
            bounds.min_lon = bounds.min_lon.min(node.lon);
            bounds.max_lon = bounds.max_lon.max(node.lon);
        }

        bounds
    }
}
