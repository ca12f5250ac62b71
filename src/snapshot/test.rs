use osmpbf::{BlobReader, BlobType, Element, ElementReader};
use rustc_hash::FxHashMap;

use crate::geo::coord::{Cardinal, dms};
use crate::map::model::{Node, RoadMap};
use crate::map::synth::grid_map;
use crate::snapshot::json::{load_json, save_json};
use crate::snapshot::pbf::write_pbf;

fn fixture() -> RoadMap {
    let (map, _) = grid_map(
        2,
        2,
        150.0,
        dms(46, 0, 0, Cardinal::North),
        dms(7, 0, 0, Cardinal::East),
    );
    map
}

#[test]
fn json_round_trip() {
    let map = fixture();

    let dir = tempfile::tempdir().expect("temp dir");
    let name = dir.path().join("snapshot");
    let path = save_json(&map, name.to_str().unwrap()).expect("snapshot written");

    assert!(path.ends_with("snapshot.json"));

    let loaded = load_json(&path).expect("snapshot read back");
    assert_eq!(loaded.nodes.len(), map.nodes.len());
    assert_eq!(loaded.ways.len(), map.ways.len());

    for (id, node) in &map.nodes {
        let restored = loaded.nodes.get(id).expect("node survived round trip");
        assert_eq!(restored, node);
    }

    for (original, restored) in map.ways.iter().zip(&loaded.ways) {
        assert_eq!(original, restored);
    }
}

#[test]
fn json_load_rejects_garbage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, b"{ not json").expect("fixture written");

    assert!(load_json(&path).is_err());
    assert!(load_json(dir.path().join("missing.json")).is_err());
}

#[test_log::test]
fn pbf_blob_layout() {
    let map = fixture();

    let dir = tempfile::tempdir().expect("temp dir");
    let name = dir.path().join("grid");
    let path = write_pbf(&map, name.to_str().unwrap()).expect("pbf written");

    assert!(path.ends_with("grid.osm.pbf"));

    let mut header_blobs = 0;
    let mut data_blobs = 0;

    for blob in BlobReader::from_path(&path).expect("readable blob stream") {
        let blob = blob.expect("valid blob");
        match blob.get_type() {
            BlobType::OsmHeader => {
                assert!(blob.to_headerblock().is_ok());
                header_blobs += 1;
            }
            BlobType::OsmData => {
                assert!(blob.to_primitiveblock().is_ok());
                data_blobs += 1;
            }
            _ => panic!("unexpected blob type"),
        }
    }

    assert_eq!(header_blobs, 1);
    // One dense-node block and one way block for a map this small.
    assert_eq!(data_blobs, 2);
}

#[test]
fn pbf_round_trip() {
    let map = fixture();

    let dir = tempfile::tempdir().expect("temp dir");
    let name = dir.path().join("grid");
    let path = write_pbf(&map, name.to_str().unwrap()).expect("pbf written");

    let mut nodes: FxHashMap<i64, Node> = FxHashMap::default();
    let mut way_count = 0usize;
    let mut tagged_ways = 0usize;

    let reader = ElementReader::from_path(&path).expect("readable pbf");
    reader
        .for_each(|element| match element {
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
                way_count += 1;

                let original = map
                    .ways
                    .iter()
                    .find(|w| w.id == way.id())
                    .expect("way id survived");
                let refs: Vec<i64> = way.refs().collect();
                assert_eq!(refs, original.nodes);

                if way.tags().any(|(key, value)| key == "highway" && value == "residential") {
                    tagged_ways += 1;
                }
            }
            Element::Relation(_) => {}
        })
        .expect("decodable pbf");

    assert_eq!(nodes.len(), map.nodes.len());
    assert_eq!(way_count, map.ways.len());
    assert_eq!(tagged_ways, map.ways.len());

    for (id, original) in &map.nodes {
        let restored = nodes.get(id).expect("node survived");
        // Coordinates are quantized to 1e-7 degrees by the block granularity.
        assert!((restored.lat - original.lat).abs() < 1e-6);
        assert!((restored.lon - original.lon).abs() < 1e-6);
    }
}
