//! Synthetic rectangular street grids, built from repeated destination-point
//! hops. Useful as deterministic fixtures wherever a real extract would be
//! overkill.

use rustc_hash::FxHashMap;

use crate::geo::coord::CoordinateDecimal;
use crate::geo::distance::destination_point;
use crate::map::model::{Node, RoadMap, Tags, Way};

/// Builds a `rows × cols` block grid with `block_m`-meter spacing, anchored at
/// the south-west corner `(lat_org, lon_org)`.
///
/// Returns the map and a `(row, col) -> node id` lookup. The grid has
/// `(rows + 1) · (cols + 1)` nodes; every adjacent pair is joined by a
/// two-node residential way, streets west-to-east and avenues south-to-north,
/// with way ids starting at 1.
pub fn grid_map(
    rows: u32,
    cols: u32,
    block_m: f64,
    lat_org: CoordinateDecimal,
    lon_org: CoordinateDecimal,
) -> (RoadMap, FxHashMap<(u32, u32), i64>) {
    let mut map = RoadMap::new();
    let mut grid = FxHashMap::default();
    let mut node_id: i64 = 0;

    for r in 0..=rows {
        for c in 0..=cols {
            let (north_lat, north_lon) =
                destination_point(lat_org, lon_org, 0.0, block_m * r as f64);
            let (lat, lon) = destination_point(north_lat, north_lon, 90.0, block_m * c as f64);

            map.nodes.insert(
                node_id,
                Node {
                    id: node_id,
                    lat: lat.degrees,
                    lon: lon.degrees,
                },
            );
            grid.insert((r, c), node_id);
            node_id += 1;
        }
    }

    let mut way_id: i64 = 1;

    let mut connect = |map: &mut RoadMap, a: i64, b: i64, name: String| {
        let mut tags = Tags::new();
        tags.push("highway", "residential");
        tags.push("name", name);

        map.ways.push(Way {
            id: way_id,
            nodes: vec![a, b],
            tags,
        });
        way_id += 1;
    };

    for r in 0..=rows {
        for c in 0..cols {
            connect(&mut map, grid[&(r, c)], grid[&(r, c + 1)], format!("Street {r}"));
        }
    }

    for c in 0..=cols {
        for r in 0..rows {
            connect(&mut map, grid[&(r, c)], grid[&(r + 1, c)], format!("Avenue {c}"));
        }
    }

    (map, grid)
}
