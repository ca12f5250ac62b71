//! Great-circle geodesy on the WGS-84 sphere.
//!
//! Everything here works in decimal degrees at the API surface and radians
//! internally. Distances are meters, bearings are compass degrees
//! (0° = north, clockwise).

pub mod bearing;
pub mod coord;
pub mod distance;
pub mod project;


#[doc(inline)]
pub use bearing::{bearing, bearing_difference, normalize_bearing};
#[doc(inline)]
pub use coord::{Axis, Cardinal, Coordinate, CoordinateDecimal, dms, dms_bearing, normalize_lon};
#[doc(inline)]
pub use distance::{EARTH_RADIUS, destination_point, haversine_distance};
#[doc(inline)]
pub use project::distance_to_segment;
