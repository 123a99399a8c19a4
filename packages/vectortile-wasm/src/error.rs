//! Error definitions for vector tile decoding.
use thiserror::Error;

/// Errors raised while decoding a vector tile buffer.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The geometry command stream contained a command id other than
    /// MoveTo (1), LineTo (2) or ClosePath (7).
    #[error("unknown command {0}")]
    UnknownCommand(u32),

    /// `Layer::feature` was asked for an index outside `[0, length)`.
    #[error("feature index out of bounds: {index} (layer has {length} features)")]
    FeatureIndexOutOfBounds { index: i64, length: usize },

    /// A feature's tag list referenced a key or value the layer does not have.
    #[error("feature tag references {table} index {index}, table has {length} entries")]
    TagIndexOutOfBounds {
        table: &'static str,
        index: u64,
        length: usize,
    },

    /// A read ran past the end of the buffer.
    #[error("unexpected end of buffer at byte {0}")]
    UnexpectedEof(usize),

    /// Malformed protobuf wire data: an overlong or truncated varint, an
    /// invalid key, or a skipped field running past the buffer.
    #[error("malformed protobuf data: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// Group wire types and reserved wire types cannot be skipped.
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    /// Gzip decompression of the tile failed.
    #[error("failed to decompress gzipped tile: {0}")]
    Decompress(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
