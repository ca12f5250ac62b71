use thiserror::Error;

/// Raised when an `.osm.pbf` source cannot be opened or decoded.
///
/// Ingestion is all-or-nothing: on error no partial map is produced.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("could not open map source: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode pbf stream: {0}")]
    Pbf(#[from] osmpbf::Error),
}
