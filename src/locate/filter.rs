//! The particle filter: initialization, motion prediction, measurement
//! weighting and low-variance resampling.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::geo::bearing::{bearing, bearing_difference, normalize_bearing};
use crate::geo::coord::CoordinateDecimal;
use crate::geo::distance::destination_point;
use crate::locate::error::FilterError;
use crate::locate::particle::{Particle, VoReading};
use crate::map::enhanced::EnhancedMap;
use crate::map::geometry::way_heading_at;
use crate::map::model::Way;

/// Seed of the filter-local generator when none is supplied. Every random
/// draw the filter makes goes through that generator, so runs with equal
/// inputs reproduce exactly.
pub const DEFAULT_SEED: u64 = 123;

/// Radius in meters within which a particle is associated to a way during
/// weighting; beyond it the particle keeps only the minimum weight.
pub const NEAREST_WAY_RADIUS: f64 = 50.0;

/// Standard deviation of the lateral distance likelihood, meters.
pub const DISTANCE_SIGMA: f64 = 2.0;

/// Standard deviation of the heading alignment likelihood, degrees.
pub const HEADING_SIGMA: f64 = 15.0;

/// Floor applied to unnormalized weights so no particle vanishes outright.
pub const MIN_WEIGHT: f64 = 0.001;

/// Meters per degree of latitude, used to spread the position prior.
const LAT_METERS_PER_DEGREE: f64 = 111_320.0;

/// Resampling jitter: position in degrees (~1 m), heading in degrees.
const JITTER_POS_SIGMA: f64 = 1e-5;
const JITTER_HEADING_SIGMA: f64 = 1.0;

/// Heading spread applied when seeding particles along ways.
const INIT_HEADING_SIGMA: f64 = 5.0;

/// Unnormalized zero-mean Gaussian density, `exp(-x² / 2σ²)`.
fn gaussian_probability(sigma: f64, x: f64) -> f64 {
    (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Sequential Monte-Carlo pose estimator over an [`EnhancedMap`].
///
/// Owns its particles and a seeded generator; borrows the map read-only for
/// its entire lifetime. A full step is `predict -> update_weights ->
/// resample`, with resampling cadence left to the caller.
pub struct ParticleFilter<'m> {
    pub(crate) particles: Vec<Particle>,
    map: &'m EnhancedMap<'m>,
    rng: StdRng,
    total_weight: f64,
}

impl<'m> ParticleFilter<'m> {
    /// Creates a filter of `count` zeroed particles with the default seed.
    pub fn new(count: usize, map: &'m EnhancedMap<'m>) -> Self {
        ParticleFilter::with_seed(count, map, DEFAULT_SEED)
    }

    pub fn with_seed(count: usize, map: &'m EnhancedMap<'m>, seed: u64) -> Self {
        ParticleFilter {
            particles: vec![
                Particle {
                    lat: 0.0,
                    lon: 0.0,
                    heading: 0.0,
                    weight: 0.0,
                };
                count
            ],
            map,
            rng: StdRng::seed_from_u64(seed),
            total_weight: 1.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether the last weighting pass found zero total mass. Weights are
    /// left unnormalized in that state; callers typically re-initialize.
    pub fn diverged(&self) -> bool {
        self.total_weight == 0.0
    }

    /// Effective sample size `1 / Σ wᵢ²`, between 1 and the population size.
    pub fn effective_count(&self) -> f64 {
        let sum_squared: f64 = self.particles.iter().map(|p| p.weight * p.weight).sum();
        if sum_squared == 0.0 { 0.0 } else { 1.0 / sum_squared }
    }

    /// Weighted mean pose `(lat, lon, heading)`; the heading is a circular
    /// mean so populations straddling north average correctly.
    pub fn estimate(&self) -> Option<(f64, f64, f64)> {
        if self.particles.is_empty() {
            return None;
        }

        let mut lat = 0.0;
        let mut lon = 0.0;
        let mut sin_sum = 0.0;
        let mut cos_sum = 0.0;

        for p in &self.particles {
            lat += p.weight * p.lat;
            lon += p.weight * p.lon;
            sin_sum += p.weight * p.heading.to_radians().sin();
            cos_sum += p.weight * p.heading.to_radians().cos();
        }

        let heading = normalize_bearing(sin_sum.atan2(cos_sum).to_degrees());
        Some((lat, lon, heading))
    }

    fn gaussian(&mut self, sigma: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        sigma * z
    }

    /// Scatters the population around a position prior with `sigma_m` meters
    /// of Gaussian spread and uniformly random headings.
    pub fn init_around(&mut self, lat: f64, lon: f64, sigma_m: f64) {
        let count = self.particles.len();
        let weight = 1.0 / count as f64;

        for i in 0..count {
            let lat_noise = self.gaussian(sigma_m) / LAT_METERS_PER_DEGREE;
            let lon_noise = self.gaussian(sigma_m) / LAT_METERS_PER_DEGREE;
            let heading = self.rng.random::<f64>() * 360.0;

            self.particles[i] = Particle {
                lat: lat + lat_noise,
                lon: lon + lon_noise,
                heading,
                weight,
            };
        }

        self.total_weight = 1.0;
    }

    /// Distributes the population along the road network for global
    /// initialization: `max(1, N/|ways|)` particles per way, then uniform
    /// re-draws over ways until the population is full.
    pub fn init_on_ways(&mut self) -> Result<(), FilterError> {
        let map = self.map;
        let ways = map.ways();

        if ways.is_empty() {
            return Err(FilterError::NoWays);
        }

        let count = self.particles.len();
        let weight = 1.0 / count as f64;
        let per_way = usize::max(1, count / ways.len());

        let mut placed = 0;
        let mut ways_seeded = 0;

        for way in ways {
            if way.nodes.len() < 2 {
                continue;
            }

            for _ in 0..per_way {
                if placed == count {
                    break;
                }
                if let Some(particle) = self.sample_on_way(way, weight, true) {
                    self.particles[placed] = particle;
                    placed += 1;
                }
            }
            ways_seeded += 1;
        }

        while placed < count {
            let way = &ways[self.rng.random_range(0..ways.len())];
            if way.nodes.len() < 2 {
                continue;
            }

            if let Some(particle) = self.sample_on_way(way, weight, false) {
                self.particles[placed] = particle;
                placed += 1;
            }
        }

        debug!("initialized {placed} particles across {ways_seeded} ways");
        self.total_weight = 1.0;
        Ok(())
    }

    /// Draws a particle on a uniformly random segment of the way. Ways are
    /// bidirectional, so the segment bearing is flipped with probability 0.5.
    fn sample_on_way(&mut self, way: &Way, weight: f64, perturb: bool) -> Option<Particle> {
        let nodes = self.map.nodes();

        let segment = self.rng.random_range(0..way.nodes.len() - 1);
        let a = nodes.get(&way.nodes[segment])?;
        let b = nodes.get(&way.nodes[segment + 1])?;

        let t: f64 = self.rng.random();
        let lat = a.lat + t * (b.lat - a.lat);
        let lon = a.lon + t * (b.lon - a.lon);

        let mut heading = bearing(a.lat, a.lon, b.lat, b.lon);
        if self.rng.random_bool(0.5) {
            heading += 180.0;
        }
        if perturb {
            heading += self.gaussian(INIT_HEADING_SIGMA);
        }

        Some(Particle {
            lat,
            lon,
            heading: normalize_bearing(heading),
            weight,
        })
    }

    /// Motion update: rotates every particle by the reading's heading delta
    /// and advances it along its new heading by the reading's distance.
    ///
    /// The model is deterministic; diversity comes from the resampling
    /// jitter, not from here.
    pub fn predict(&mut self, reading: VoReading) {
        for particle in &mut self.particles {
            particle.heading = normalize_bearing(particle.heading + reading.angle);

            if reading.distance > 0.0 {
                let (lat, lon) = destination_point(
                    CoordinateDecimal::latitude(particle.lat),
                    CoordinateDecimal::longitude(particle.lon),
                    particle.heading,
                    reading.distance,
                );

                particle.lat = lat.degrees;
                particle.lon = lon.degrees;
            }
        }
    }

    /// Measurement update: weights every particle by its agreement with the
    /// nearest way, combining lateral distance and heading alignment
    /// likelihoods, then normalizes.
    ///
    /// Zero total mass (divergence) leaves the weights unnormalized and is
    /// reported by [`ParticleFilter::diverged`].
    pub fn update_weights(&mut self) {
        let map = self.map;
        let mut total = 0.0;

        for particle in &mut self.particles {
            let Some((way, distance)) =
                map.find_nearest_way(particle.lat, particle.lon, NEAREST_WAY_RADIUS)
            else {
                particle.weight = MIN_WEIGHT;
                total += particle.weight;
                continue;
            };

            let distance_likelihood = gaussian_probability(DISTANCE_SIGMA, distance);

            let way_bearing = way_heading_at(way, particle.lat, particle.lon, map.nodes());
            let alignment = bearing_difference(particle.heading, way_bearing).abs();
            let bearing_likelihood = gaussian_probability(HEADING_SIGMA, alignment);

            particle.weight = (distance_likelihood * bearing_likelihood).max(MIN_WEIGHT);
            total += particle.weight;
        }

        self.total_weight = total;

        if total > 0.0 {
            for particle in &mut self.particles {
                particle.weight /= total;
            }
        }
    }

    /// Systematic (low-variance) resampling with Gaussian jitter.
    ///
    /// A single uniform draw in [0, 1/N) plus evenly spaced offsets selects
    /// survivors along the cumulative weights in O(N). With an all-zero
    /// population this degenerates to copies of the first particle.
    pub fn resample(&mut self) {
        let count = self.particles.len();
        if count == 0 {
            return;
        }

        let mut cumulative = Vec::with_capacity(count);
        let mut sum = 0.0;
        for particle in &self.particles {
            sum += particle.weight;
            cumulative.push(sum);
        }

        let step = 1.0 / count as f64;
        let start = self.rng.random::<f64>() * step;

        let mut resampled = Vec::with_capacity(count);
        let mut index = 0;

        for i in 0..count {
            let target = start + i as f64 * step;
            while index < count - 1 && cumulative[index] < target {
                index += 1;
            }

            let mut particle = self.particles[index];
            particle.lat += self.gaussian(JITTER_POS_SIGMA);
            particle.lon += self.gaussian(JITTER_POS_SIGMA);
            particle.heading = normalize_bearing(particle.heading + self.gaussian(JITTER_HEADING_SIGMA));
            particle.weight = step;
            resampled.push(particle);
        }

        self.particles = resampled;
    }
}
