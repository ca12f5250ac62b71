//! JSON snapshots of a road map.
//!
//! The document is `{ "Ways": [...], "Nodes": { "<id>": {ID, Lat, Lon} } }`
//! with way tags as a list of `{Key, Value}` pairs; only structural fields
//! round-trip.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::info;

use crate::map::model::RoadMap;
use crate::snapshot::error::SnapshotError;

/// Writes the map to `<name>.json` and returns the path.
pub fn save_json(map: &RoadMap, name: &str) -> Result<PathBuf, SnapshotError> {
    let path = PathBuf::from(format!("{name}.json"));

    let file = File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), map)?;

    info!("saved snapshot to {}", path.display());
    Ok(path)
}

/// Loads a map from a JSON snapshot produced by [`save_json`].
pub fn load_json(path: impl AsRef<Path>) -> Result<RoadMap, SnapshotError> {
    let file = File::open(path.as_ref())?;
    let map = serde_json::from_reader(BufReader::new(file))?;

    Ok(map)
}
