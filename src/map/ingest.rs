//! Streaming ingestion of drivable road networks from `.osm.pbf` extracts.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::map::error::IngestError;
use crate::map::model::{Node, RoadMap, Tags, Way};
use crate::map::split::split_at_intersections;

/// Road classes a vehicle can drive on. Ways whose `highway` tag carries any
/// other value are discarded during ingest.
pub const DRIVABLE_HIGHWAYS: [&str; 15] = [
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "living_street",
    "residential",
    "service",
    "unclassified",
    "track",
];

/// Collects the tags of a drivable way, or `None` when the way is filtered:
/// tagless, tagged `building=*`, or not a drivable highway class.
pub(crate) fn drivable_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Option<Tags> {
    let mut collected = Tags::new();
    let mut drivable = false;

    for (key, value) in tags {
        if key == "building" {
            return None;
        }
        if key == "highway" && DRIVABLE_HIGHWAYS.contains(&value) {
            drivable = true;
        }

        collected.push(key, value);
    }

    if !drivable || collected.is_empty() {
        return None;
    }

    Some(collected)
}

impl RoadMap {
    /// Ingests a road map from an `.osm.pbf` file.
    ///
    /// The scan delivers elements in arrival order; relations are ignored.
    /// Accepted ways are split at intersections and only nodes referenced by
    /// an emitted way are retained. Fails without a partial result when the
    /// file cannot be opened or decoded.
    pub fn from_pbf(path: impl AsRef<Path>) -> Result<RoadMap, IngestError> {
        let start_time = Instant::now();
        let reader = ElementReader::from_path(path.as_ref())?;

        let mut nodes: FxHashMap<i64, Node> = FxHashMap::default();
        let mut ways: Vec<Way> = Vec::new();

        info!("ingesting {}", path.as_ref().display());

        reader.for_each(|element| match element {
            Element::Node(node) => {
                nodes.insert(
                    node.id(),
                    Node {
                        id: node.id(),
                        lat: node.lat(),
                        lon: node.lon(),
                    },
                );
            }
            Element::DenseNode(node) => {
                nodes.insert(
                    node.id(),
                    Node {
                        id: node.id(),
                        lat: node.lat(),
                        lon: node.lon(),
                    },
                );
            }
            Element::Way(way) => {
                if let Some(tags) = drivable_tags(way.tags()) {
                    ways.push(Way {
                        id: way.id(),
                        nodes: way.refs().collect(),
                        tags,
                    });
                }
            }
            Element::Relation(_) => {}
        })?;

        debug!(
            "scan finished in {:?}: {} nodes, {} drivable ways",
            start_time.elapsed(),
            nodes.len(),
            ways.len()
        );

        let split = split_at_intersections(&ways);

        let used: FxHashSet<i64> = split.iter().flat_map(|way| way.nodes.iter().copied()).collect();
        nodes.retain(|id, _| used.contains(id));

        info!(
            "ingested {} edges over {} nodes in {:?}",
            split.len(),
            nodes.len(),
            start_time.elapsed()
        );

        Ok(RoadMap { ways: split, nodes })
    }
}
