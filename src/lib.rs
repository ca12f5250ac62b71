//! Map-aided vehicle localization over OpenStreetMap road networks.
//!
//! The crate ingests a drivable road map from an `.osm.pbf` extract, splits it
//! into edges at topological intersections, indexes it for fast proximity
//! queries and estimates a vehicle pose (latitude, longitude, heading) from a
//! stream of incremental motion readings using a Monte-Carlo particle filter.
//!
//! Data flows in one direction:
//!
//! ```text
//! .osm.pbf ─> RoadMap ─> EnhancedMap (grid index + adjacency) ─> ParticleFilter
//! ```
//!
//! [`RoadMap`] exclusively owns its nodes and ways, [`EnhancedMap`] borrows the
//! map for its entire lifetime, and [`ParticleFilter`] borrows the enhanced map
//! while owning its particle population. All derived structures are read-only
//! once built.

pub mod geo;
pub mod locate;
pub mod map;
pub mod snapshot;

#[doc(inline)]
pub use locate::{FilterError, Particle, ParticleFilter, VoReading};
#[doc(inline)]
pub use map::{EnhancedMap, IngestError, RoadMap};
#[doc(inline)]
pub use snapshot::SnapshotError;

use thiserror::Error;

/// Top-level error, covering every fallible surface of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub type Result<T> = std::result::Result<T, Error>;
