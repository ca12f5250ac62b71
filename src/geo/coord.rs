//! Coordinate representations: sexagesimal (degree/minute/second) and signed
//! decimal degrees, with conversions in both directions.

use std::fmt;

/// Axis a decimal coordinate is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Compass hemisphere of a sexagesimal coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    fn symbol(self) -> char {
        match self {
            Cardinal::North => 'N',
            Cardinal::South => 'S',
            Cardinal::East => 'E',
            Cardinal::West => 'W',
        }
    }
}

/// A sexagesimal coordinate. Carries a hemisphere rather than a sign, so the
/// degree component is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub direction: Cardinal,
}

/// A signed decimal-degree coordinate with a declared axis.
///
/// Longitudes are wrapped into (-180, 180] on construction; latitudes are
/// stored as given and callers must keep them in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateDecimal {
    pub degrees: f64,
    pub axis: Axis,
}

/// Wraps a longitude into (-180, 180].
///
/// The antimeridian folds to +180 so round-tripping a map edge keeps a single
/// representation.
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 540.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Builds a decimal coordinate from sexagesimal components.
pub fn dms(degrees: u32, minutes: u32, seconds: u32, direction: Cardinal) -> CoordinateDecimal {
    Coordinate {
        degrees,
        minutes,
        seconds,
        direction,
    }
    .to_decimal()
}

/// Builds a decimal bearing from sexagesimal components.
pub fn dms_bearing(degrees: u32, minutes: u32, seconds: u32) -> f64 {
    degrees as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0
}

impl CoordinateDecimal {
    pub fn new(degrees: f64, axis: Axis) -> Self {
        let degrees = match axis {
            Axis::Longitude => normalize_lon(degrees),
            Axis::Latitude => degrees,
        };

        CoordinateDecimal { degrees, axis }
    }

    pub fn latitude(degrees: f64) -> Self {
        CoordinateDecimal::new(degrees, Axis::Latitude)
    }

    pub fn longitude(degrees: f64) -> Self {
        CoordinateDecimal::new(degrees, Axis::Longitude)
    }

    /// Converts to the sexagesimal form, rounding the seconds component and
    /// carrying overflow up through minutes and degrees.
    pub fn to_dms(self) -> Coordinate {
        let direction = match self.axis {
            Axis::Latitude if self.degrees >= 0.0 => Cardinal::North,
            Axis::Latitude => Cardinal::South,
            Axis::Longitude if self.degrees >= 0.0 => Cardinal::East,
            Axis::Longitude => Cardinal::West,
        };

        let absolute = self.degrees.abs();
        let mut degrees = absolute.trunc() as u32;

        let decimal_minutes = (absolute - degrees as f64) * 60.0;
        let mut minutes = decimal_minutes.trunc() as u32;

        let mut seconds = ((decimal_minutes - minutes as f64) * 60.0).round() as u32;

        if seconds == 60 {
            minutes += 1;
            seconds = 0;
        }
        if minutes == 60 {
            degrees += 1;
            minutes = 0;
        }

        Coordinate {
            degrees,
            minutes,
            seconds,
            direction,
        }
    }
}

impl Coordinate {
    /// Converts to the signed decimal form. Western and southern hemispheres
    /// produce negative degrees; longitudes are wrapped.
    pub fn to_decimal(self) -> CoordinateDecimal {
        let mut degrees =
            self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds as f64 / 3600.0;

        if matches!(self.direction, Cardinal::West | Cardinal::South) {
            degrees = -degrees;
        }

        let axis = match self.direction {
            Cardinal::East | Cardinal::West => Axis::Longitude,
            Cardinal::North | Cardinal::South => Axis::Latitude,
        };

        CoordinateDecimal::new(degrees, axis)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{}'{}\" {}",
            self.degrees,
            self.minutes,
            self.seconds,
            self.direction.symbol()
        )
    }
}

impl fmt::Display for CoordinateDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_dms().fmt(f)
    }
}
