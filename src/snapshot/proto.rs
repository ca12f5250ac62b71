//! Hand-written prost bindings for the subset of the OSM PBF wire schema the
//! writer emits: blob framing (`fileformat.proto`) and header, dense-node and
//! way blocks (`osmformat.proto`). Field tags follow the published schema.

/// Envelope preceding every blob in the file, length-prefixed with a
/// big-endian u32.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BlobHeader {
    #[prost(string, required, tag = "1")]
    pub r#type: String,

    #[prost(bytes = "vec", optional, tag = "2")]
    pub indexdata: Option<Vec<u8>>,

    #[prost(int32, required, tag = "3")]
    pub datasize: i32,
}

/// A compressed (or raw) serialized block.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Blob {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub raw: Option<Vec<u8>>,

    #[prost(int32, optional, tag = "2")]
    pub raw_size: Option<i32>,

    #[prost(bytes = "vec", optional, tag = "3")]
    pub zlib_data: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HeaderBlock {
    #[prost(message, optional, tag = "1")]
    pub bbox: Option<HeaderBBox>,

    #[prost(string, repeated, tag = "4")]
    pub required_features: Vec<String>,

    #[prost(string, repeated, tag = "5")]
    pub optional_features: Vec<String>,

    #[prost(string, optional, tag = "16")]
    pub writingprogram: Option<String>,

    #[prost(string, optional, tag = "17")]
    pub source: Option<String>,
}

/// Bounding box in nanodegrees.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HeaderBBox {
    #[prost(sint64, required, tag = "1")]
    pub left: i64,

    #[prost(sint64, required, tag = "2")]
    pub right: i64,

    #[prost(sint64, required, tag = "3")]
    pub top: i64,

    #[prost(sint64, required, tag = "4")]
    pub bottom: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PrimitiveBlock {
    #[prost(message, required, tag = "1")]
    pub stringtable: StringTable,

    #[prost(message, repeated, tag = "2")]
    pub primitivegroup: Vec<PrimitiveGroup>,

    /// Units of nanodegrees per coordinate tick.
    #[prost(int32, optional, tag = "17")]
    pub granularity: Option<i32>,

    #[prost(int32, optional, tag = "18")]
    pub date_granularity: Option<i32>,

    #[prost(int64, optional, tag = "19")]
    pub lat_offset: Option<i64>,

    #[prost(int64, optional, tag = "20")]
    pub lon_offset: Option<i64>,
}

/// Interned strings for the block; index 0 is reserved for the empty string.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StringTable {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub s: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PrimitiveGroup {
    #[prost(message, optional, tag = "2")]
    pub dense: Option<DenseNodes>,

    #[prost(message, repeated, tag = "3")]
    pub ways: Vec<Way>,
}

/// Delta-coded parallel arrays of node ids and coordinates.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DenseNodes {
    #[prost(sint64, repeated, tag = "1")]
    pub id: Vec<i64>,

    #[prost(sint64, repeated, tag = "8")]
    pub lat: Vec<i64>,

    #[prost(sint64, repeated, tag = "9")]
    pub lon: Vec<i64>,

    /// Interleaved key/value string indices, node runs separated by 0.
    #[prost(int32, repeated, tag = "10")]
    pub keys_vals: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Way {
    #[prost(int64, required, tag = "1")]
    pub id: i64,

    #[prost(uint32, repeated, tag = "2")]
    pub keys: Vec<u32>,

    #[prost(uint32, repeated, tag = "3")]
    pub vals: Vec<u32>,

    /// Delta-coded node references.
    #[prost(sint64, repeated, tag = "8")]
    pub refs: Vec<i64>,
}
