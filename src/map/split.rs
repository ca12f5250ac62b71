//! Topology splitting: cutting ways at shared nodes so every produced way is
//! an edge between endpoints or intersections.

use rustc_hash::FxHashMap;

use crate::map::model::Way;

/// Splits the accepted ways at intersection nodes.
///
/// A node referenced by two or more ways (or twice by the same way) is an
/// intersection. Walking each way in order, the running segment is cut when
/// an intersection node lands in it and it already holds at least two nodes;
/// the intersection then both terminates the segment and seeds the next one.
/// Segments of fewer than two nodes are dropped. Emitted ways receive fresh
/// monotone ids starting at 1 and an independent copy of the parent's tags.
pub(crate) fn split_at_intersections(ways: &[Way]) -> Vec<Way> {
    let mut references: FxHashMap<i64, u32> = FxHashMap::default();
    for way in ways {
        for node in &way.nodes {
            *references.entry(*node).or_default() += 1;
        }
    }

    let mut out = Vec::new();
    let mut next_id: i64 = 1;

    let mut emit = |nodes: Vec<i64>, template: &Way, next_id: &mut i64| {
        out.push(Way {
            id: *next_id,
            nodes,
            tags: template.tags.clone(),
        });
        *next_id += 1;
    };

    for way in ways {
        let mut current: Vec<i64> = Vec::with_capacity(way.nodes.len());

        for &node in &way.nodes {
            current.push(node);

            if references[&node] > 1 && current.len() > 1 {
                let segment = std::mem::replace(&mut current, vec![node]);
                emit(segment, way, &mut next_id);
            }
        }

        if current.len() > 1 {
            emit(current, way, &mut next_id);
        }
    }

    out
}
