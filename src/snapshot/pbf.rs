//! `.osm.pbf` writeback.
//!
//! Emits a header blob followed by zlib-compressed primitive blocks: nodes
//! sorted by id as DenseNodes, then ways sorted by id, at most
//! [`BLOCK_CAPACITY`] elements per block.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use itertools::Itertools;
use log::info;
use prost::Message;
use rustc_hash::FxHashMap;

use crate::map::model::{Node, RoadMap, Way};
use crate::snapshot::error::SnapshotError;
use crate::snapshot::proto;

/// Maximum elements per primitive block.
pub const BLOCK_CAPACITY: usize = 8000;

const WRITING_PROGRAM: &str = "wp1";
const REQUIRED_FEATURES: [&str; 2] = ["OsmSchema-V0.6", "DenseNodes"];

/// Nanodegrees per coordinate tick; 100 gives 1e-7° resolution.
const GRANULARITY: i64 = 100;
const NANO: f64 = 1e9;

/// Degrees to coordinate ticks at the block granularity.
fn ticks(degrees: f64) -> i64 {
    (degrees * NANO / GRANULARITY as f64).round() as i64
}

/// Writes the map to `<name>.osm.pbf` and returns the path.
pub fn write_pbf(map: &RoadMap, name: &str) -> Result<PathBuf, SnapshotError> {
    let path = PathBuf::from(format!("{name}.osm.pbf"));
    let mut out = BufWriter::new(File::create(&path)?);

    write_blob(&mut out, "OSMHeader", header_block(map).encode_to_vec())?;

    let nodes: Vec<&Node> = map.nodes.values().sorted_by_key(|node| node.id).collect();
    for chunk in nodes.chunks(BLOCK_CAPACITY) {
        write_blob(&mut out, "OSMData", dense_block(chunk).encode_to_vec())?;
    }

    let ways: Vec<&Way> = map.ways.iter().sorted_by_key(|way| way.id).collect();
    for chunk in ways.chunks(BLOCK_CAPACITY) {
        write_blob(&mut out, "OSMData", way_block(chunk).encode_to_vec())?;
    }

    out.flush()?;

    info!(
        "wrote {} nodes and {} ways to {}",
        nodes.len(),
        ways.len(),
        path.display()
    );
    Ok(path)
}

/// Frames and appends one blob: big-endian header length, header, blob.
fn write_blob(out: &mut impl Write, kind: &str, payload: Vec<u8>) -> Result<(), SnapshotError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload)?;

    let blob = proto::Blob {
        raw: None,
        raw_size: Some(payload.len() as i32),
        zlib_data: Some(encoder.finish()?),
    };
    let blob_bytes = blob.encode_to_vec();

    let header = proto::BlobHeader {
        r#type: kind.to_string(),
        indexdata: None,
        datasize: blob_bytes.len() as i32,
    };
    let header_bytes = header.encode_to_vec();

    out.write_all(&(header_bytes.len() as u32).to_be_bytes())?;
    out.write_all(&header_bytes)?;
    out.write_all(&blob_bytes)?;

    Ok(())
}

fn header_block(map: &RoadMap) -> proto::HeaderBlock {
    let bounds = map.bounds();

    proto::HeaderBlock {
        bbox: Some(proto::HeaderBBox {
            left: (bounds.min_lon * NANO) as i64,
            right: (bounds.max_lon * NANO) as i64,
            top: (bounds.max_lat * NANO) as i64,
            bottom: (bounds.min_lat * NANO) as i64,
        }),
        required_features: REQUIRED_FEATURES.iter().map(|s| s.to_string()).collect(),
        optional_features: Vec::new(),
        writingprogram: Some(WRITING_PROGRAM.to_string()),
        source: None,
    }
}

fn primitive_block(group: proto::PrimitiveGroup, strings: Vec<Vec<u8>>) -> proto::PrimitiveBlock {
    proto::PrimitiveBlock {
        stringtable: proto::StringTable { s: strings },
        primitivegroup: vec![group],
        granularity: Some(GRANULARITY as i32),
        date_granularity: Some(1000),
        lat_offset: Some(0),
        lon_offset: Some(0),
    }
}

fn dense_block(nodes: &[&Node]) -> proto::PrimitiveBlock {
    let mut dense = proto::DenseNodes {
        id: Vec::with_capacity(nodes.len()),
        lat: Vec::with_capacity(nodes.len()),
        lon: Vec::with_capacity(nodes.len()),
        keys_vals: Vec::new(),
    };

    let (mut prev_id, mut prev_lat, mut prev_lon) = (0, 0, 0);
    for node in nodes {
        let (lat, lon) = (ticks(node.lat), ticks(node.lon));

        dense.id.push(node.id - prev_id);
        dense.lat.push(lat - prev_lat);
        dense.lon.push(lon - prev_lon);

        (prev_id, prev_lat, prev_lon) = (node.id, lat, lon);
    }

    let group = proto::PrimitiveGroup {
        dense: Some(dense),
        ways: Vec::new(),
    };

    // Index 0 of every string table is the reserved empty string.
    primitive_block(group, vec![Vec::new()])
}

fn way_block(ways: &[&Way]) -> proto::PrimitiveBlock {
    let mut strings: Vec<Vec<u8>> = vec![Vec::new()];
    let mut interned: FxHashMap<String, u32> = FxHashMap::default();

    let mut intern = |value: &str| -> u32 {
        if let Some(&ix) = interned.get(value) {
            return ix;
        }

        let ix = strings.len() as u32;
        strings.push(value.as_bytes().to_vec());
        interned.insert(value.to_string(), ix);
        ix
    };

    let encoded = ways
        .iter()
        .map(|way| {
            let mut refs = Vec::with_capacity(way.nodes.len());
            let mut prev = 0;
            for &node in &way.nodes {
                refs.push(node - prev);
                prev = node;
            }

            proto::Way {
                id: way.id,
                keys: way.tags.iter().map(|tag| intern(&tag.key)).collect(),
                vals: way.tags.iter().map(|tag| intern(&tag.value)).collect(),
                refs,
            }
        })
        .collect();

    let group = proto::PrimitiveGroup {
        dense: None,
        ways: encoded,
    };

    primitive_block(group, strings)
}
