/// A single pose hypothesis: position, heading and normalized weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub lat: f64,
    pub lon: f64,
    /// Compass heading in degrees, [0, 360).
    pub heading: f64,
    /// Non-negative; sums to 1 across the population after weighting.
    pub weight: f64,
}

/// One incremental motion estimate, from visual odometry or equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoReading {
    /// Distance travelled in meters, ≥ 0.
    pub distance: f64,
    /// Heading change in degrees, any sign.
    pub angle: f64,
}

impl VoReading {
    pub fn new(distance: f64, angle: f64) -> Self {
        VoReading { distance, angle }
    }
}
