use crate::geo::coord::{Cardinal, dms};
use crate::geo::distance::haversine_distance;
use crate::locate::filter::ParticleFilter;
use crate::locate::particle::{Particle, VoReading};
use crate::map::enhanced::EnhancedMap;
use crate::map::model::RoadMap;
use crate::map::synth::grid_map;
use rustc_hash::FxHashMap;

fn grid() -> (RoadMap, FxHashMap<(u32, u32), i64>) {
    grid_map(
        3,
        3,
        200.0,
        dms(46, 0, 0, Cardinal::North),
        dms(7, 0, 0, Cardinal::East),
    )
}

fn place_all(filter: &mut ParticleFilter<'_>, lat: f64, lon: f64, heading: f64) {
    let weight = 1.0 / filter.len() as f64;
    for particle in &mut filter.particles {
        *particle = Particle {
            lat,
            lon,
            heading,
            weight,
        };
    }
}

#[test]
fn init_around_prior() {
    let (map, _) = grid();
    let enhanced = EnhancedMap::new(&map);

    let mut filter = ParticleFilter::new(4, &enhanced);
    filter.init_around(1.0, 1.0, 50.0);

    assert_eq!(filter.len(), 4);
    for particle in filter.particles() {
        assert_eq!(particle.weight, 0.25);

        let offset = haversine_distance(1.0, 1.0, particle.lat, particle.lon);
        assert!(offset < 300.0, "particle {offset:.1}m from the prior");

        assert!((0.0..360.0).contains(&particle.heading));
    }
}

#[test]
fn init_is_reproducible_per_seed() {
    let (map, _) = grid();
    let enhanced = EnhancedMap::new(&map);

    let mut a = ParticleFilter::with_seed(20, &enhanced, 7);
    let mut b = ParticleFilter::with_seed(20, &enhanced, 7);
    a.init_around(46.0, 7.0, 25.0);
    b.init_around(46.0, 7.0, 25.0);
    assert_eq!(a.particles(), b.particles());

    let mut c = ParticleFilter::with_seed(20, &enhanced, 8);
    c.init_around(46.0, 7.0, 25.0);
    assert_ne!(a.particles(), c.particles());
}

#[test]
fn init_on_ways_covers_network() {
    let (map, _) = grid();
    let enhanced = EnhancedMap::new(&map);

    let mut filter = ParticleFilter::new(100, &enhanced);
    filter.init_on_ways().expect("grid has ways");

    assert_eq!(filter.len(), 100);
    for particle in filter.particles() {
        assert_eq!(particle.weight, 1.0 / 100.0);
        assert!(
            enhanced.is_valid_position(particle.lat, particle.lon, 1.0),
            "particle ({}, {}) not on any way",
            particle.lat,
            particle.lon
        );
        assert!((0.0..360.0).contains(&particle.heading));
    }
}

#[test]
fn init_on_ways_requires_ways() {
    let empty = RoadMap::new();
    let enhanced = EnhancedMap::new(&empty);

    let mut filter = ParticleFilter::new(10, &enhanced);
    assert!(filter.init_on_ways().is_err());
}

#[test]
fn predict_moves_forward() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    filter.init_around(start.lat, start.lon, 1.0);

    let before: Vec<Particle> = filter.particles().to_vec();
    filter.predict(VoReading::new(10.0, 0.0));

    let mut moved = 0;
    for (old, new) in before.iter().zip(filter.particles()) {
        let dist = haversine_distance(old.lat, old.lon, new.lat, new.lon);
        if dist > 5.0 && dist < 15.0 {
            moved += 1;
        }
    }
    assert!(moved >= 45, "only {moved}/50 particles moved ~10m");
}

#[test]
fn predict_follows_heading() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    place_all(&mut filter, start.lat, start.lon, 0.0);

    filter.predict(VoReading::new(50.0, 0.0));

    for particle in filter.particles() {
        assert!(particle.lat > start.lat, "north-facing particle moved south");
    }
}

#[test]
fn predict_motion_magnitude() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    place_all(&mut filter, start.lat, start.lon, 0.0);

    filter.predict(VoReading::new(100.0, 0.0));

    for particle in filter.particles() {
        let dist = haversine_distance(start.lat, start.lon, particle.lat, particle.lon);
        assert!(
            (dist - 100.0).abs() < 15.0,
            "100m reading moved a particle {dist:.1}m"
        );
    }
}

#[test]
fn predict_zero_distance_only_rotates() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    filter.init_around(start.lat, start.lon, 1.0);

    let before: Vec<Particle> = filter.particles().to_vec();
    filter.predict(VoReading::new(0.0, 45.0));

    for (old, new) in before.iter().zip(filter.particles()) {
        let dist = haversine_distance(old.lat, old.lon, new.lat, new.lon);
        assert!(dist < 1.0, "particle moved {dist:.2}m on a zero-distance reading");

        let expected = (old.heading + 45.0).rem_euclid(360.0);
        assert!((new.heading - expected).abs() < 1e-9);
    }
}

#[test]
fn predict_turns() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let cases = [
        ("right turn", 0.0, 90.0, 90.0),
        ("left turn", 0.0, -90.0, 270.0),
        ("wrap past 360", 350.0, 20.0, 10.0),
        ("wrap past 0", 10.0, -20.0, 350.0),
    ];

    for (name, heading, angle, expected) in cases {
        let mut filter = ParticleFilter::new(50, &enhanced);
        place_all(&mut filter, start.lat, start.lon, heading);

        filter.predict(VoReading::new(0.0, angle));

        for particle in filter.particles() {
            assert!(
                (0.0..360.0).contains(&particle.heading),
                "{name}: heading {} out of range",
                particle.heading
            );
            assert!(
                (particle.heading - expected).abs() < 1e-9,
                "{name}: got {}, want {expected}",
                particle.heading
            );
        }
    }
}

#[test]
fn weights_normalize_to_one() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    filter.init_around(start.lat, start.lon, 10.0);
    filter.update_weights();

    let total: f64 = filter.particles().iter().map(|p| p.weight).sum();
    assert!((total - 1.0).abs() < 1e-9, "weights sum to {total}");
    assert!(!filter.diverged());

    let effective = filter.effective_count();
    assert!(effective >= 1.0 && effective <= 50.0 + 1e-9);
}

#[test]
fn weights_floor_off_network() {
    let (map, _) = grid();
    let enhanced = EnhancedMap::new(&map);

    let mut filter = ParticleFilter::new(10, &enhanced);
    // Nowhere near the grid; every particle misses the association radius.
    filter.init_around(0.0, 0.0, 5.0);
    filter.update_weights();

    for particle in filter.particles() {
        assert!((particle.weight - 0.1).abs() < 1e-9);
    }
    assert!(!filter.diverged());
}

#[test]
fn weighting_prefers_aligned_on_road_particles() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);

    // Mid-segment of an east-west street, away from any intersection so the
    // nearest way and its heading are unambiguous.
    let a = map.nodes[&grid[&(1, 1)]];
    let b = map.nodes[&grid[&(1, 2)]];
    let (lat, lon) = (a.lat, (a.lon + b.lon) / 2.0);

    let mut filter = ParticleFilter::new(4, &enhanced);
    // One particle driving east on the street, one misaligned on the road,
    // two displaced off the road.
    filter.particles[0] = Particle { lat, lon, heading: 90.0, weight: 0.25 };
    filter.particles[1] = Particle { lat, lon, heading: 45.0, weight: 0.25 };
    filter.particles[2] = Particle { lat: lat + 2.0 / 111_320.0, lon, heading: 90.0, weight: 0.25 };
    filter.particles[3] = Particle { lat: lat + 0.0003, lon, heading: 90.0, weight: 0.25 };

    filter.update_weights();

    let weights: Vec<f64> = filter.particles().iter().map(|p| p.weight).collect();
    assert!(
        weights[0] > weights[1],
        "aligned particle should outweigh the misaligned one: {weights:?}"
    );
    assert!(
        weights[0] > weights[2],
        "on-road particle should outweigh the displaced one: {weights:?}"
    );
    assert!(
        weights[2] > weights[3],
        "2m off should outweigh 33m off: {weights:?}"
    );
}

#[test]
fn resample_preserves_population() {
    let (map, grid) = grid();
    let enhanced = EnhancedMap::new(&map);
    let start = map.nodes[&grid[&(1, 1)]];

    let mut filter = ParticleFilter::new(50, &enhanced);
    filter.init_around(start.lat, start.lon, 20.0);
    filter.update_weights();

    let before: Vec<Particle> = filter.particles().to_vec();
    filter.resample();

    assert_eq!(filter.len(), 50);
    for particle in filter.particles() {
        assert_eq!(particle.weight, 1.0 / 50.0);
        assert!((0.0..360.0).contains(&particle.heading));

        // Every survivor sits within jitter range of some previous particle.
        let nearest = before
            .iter()
            .map(|old| haversine_distance(old.lat, old.lon, particle.lat, particle.lon))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest < 10.0, "resampled particle {nearest:.1}m from population");
    }
}
