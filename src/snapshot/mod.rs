//! Persistence of filtered road maps: a JSON snapshot for fast reload and an
//! `.osm.pbf` writeback any standard OSM consumer can read.

pub mod error;
pub mod json;
pub mod pbf;

pub(crate) mod proto;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use error::SnapshotError;
#[doc(inline)]
pub use json::{load_json, save_json};
#[doc(inline)]
pub use pbf::write_pbf;
