//! Encoded polyline coordinate codec.
//!
//! Routing providers ship route geometry as a compact ASCII string: every
//! point is stored as a pair of zig-zag encoded deltas (latitude first) split
//! into 5-bit chunks, each offset by 63 so the output stays printable. This
//! crate decodes those strings into longitude-first [`Coordinate`] values and
//! encodes them back for fixtures and round-trip checks.
//!
//! Decoding is strict: input that ends inside a value, or that contains bytes
//! outside the codec alphabet, fails with [`DecodeError`] instead of reading
//! past the end of the buffer.
//!
//! # Example
//!
//! ```
//! use polyline_codec::{Coordinate, decode, encode};
//!
//! let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").expect("valid polyline");
//! assert_eq!(points.len(), 3);
//! assert!(points[0].approx_eq(Coordinate::new(-120.2, 38.5), 1e-5));
//!
//! let encoded = encode(&points);
//! assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
//! ```

mod coordinate;
mod decode;
mod encode;
mod error;

pub use coordinate::{Coordinate, CoordinateShapeError};
pub use decode::{decode, decode_with_precision};
pub use encode::{encode, encode_with_precision};
pub use error::DecodeError;

/// Decimal precision used by the classic polyline format (1e-5 degrees).
pub const DEFAULT_PRECISION: u8 = 5;

/// Highest precision accepted; larger requests are clamped to this value.
pub const MAX_PRECISION: u8 = 10;

/// Scale factor turning degrees into integer codec units.
fn precision_factor(precision: u8) -> f64 {
    10_f64.powi(i32::from(precision.min(MAX_PRECISION)))
}

/// ASCII offset added to every 6-bit chunk.
const CHUNK_OFFSET: u8 = 63;
/// Continuation flag carried by every chunk except the last of a value.
const CONTINUATION_BIT: u64 = 0x20;
/// Payload bits carried by one chunk.
const CHUNK_MASK: u64 = 0x1f;
/// Bits of payload per chunk.
const CHUNK_BITS: u32 = 5;
