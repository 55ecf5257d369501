//! Polyline decoding.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::{
    CHUNK_BITS, CHUNK_MASK, CHUNK_OFFSET, CONTINUATION_BIT, Coordinate, DEFAULT_PRECISION,
    DecodeError, precision_factor,
};

/// Chunks allowed per value; twelve chunks already carry 60 bits.
const MAX_CHUNKS_PER_VALUE: u32 = 12;

/// Decode a precision-5 polyline into longitude-first coordinates.
///
/// Empty input decodes to an empty vector.
///
/// # Errors
///
/// Returns [`DecodeError`] when the input is truncated, contains characters
/// outside the codec alphabet, or describes values that overflow.
///
/// # Examples
///
/// ```
/// use polyline_codec::{DecodeError, decode};
///
/// assert!(decode("").expect("empty input").is_empty());
/// assert!(matches!(decode("_p~iF"), Err(DecodeError::Truncated { .. })));
/// ```
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decode a polyline encoded with `precision` decimal places.
///
/// Precisions above [`crate::MAX_PRECISION`] are clamped.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_precision(encoded: &str, precision: u8) -> Result<Vec<Coordinate>, DecodeError> {
    let factor = precision_factor(precision);
    let mut reader = ChunkReader::new(encoded);
    let mut coordinates = Vec::new();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while !reader.is_exhausted() {
        let lat_start = reader.offset();
        lat = lat
            .checked_add(reader.read_delta()?)
            .ok_or(DecodeError::Overflow { offset: lat_start })?;
        let lng_start = reader.offset();
        lng = lng
            .checked_add(reader.read_delta()?)
            .ok_or(DecodeError::Overflow { offset: lng_start })?;

        coordinates.push(Coordinate::new(lng as f64 / factor, lat as f64 / factor));
    }

    Ok(coordinates)
}

/// Sequential reader over the encoded characters.
struct ChunkReader<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> ChunkReader<'a> {
    fn new(encoded: &'a str) -> Self {
        Self {
            chars: encoded.char_indices().peekable(),
            len: encoded.len(),
        }
    }

    fn is_exhausted(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |(offset, _)| *offset)
    }

    /// Read one zig-zag encoded signed delta.
    fn read_delta(&mut self) -> Result<i64, DecodeError> {
        let start = self.offset();
        let raw = self.read_varint(start)?;
        let magnitude = i64::try_from(raw >> 1).map_err(|_| DecodeError::Overflow { offset: start })?;
        if raw & 1 == 1 {
            Ok(!magnitude)
        } else {
            Ok(magnitude)
        }
    }

    /// Read chunks until one arrives without the continuation flag.
    fn read_varint(&mut self, start: usize) -> Result<u64, DecodeError> {
        let mut value: u64 = 0;
        for chunk_index in 0..MAX_CHUNKS_PER_VALUE {
            let Some((offset, character)) = self.chars.next() else {
                return Err(DecodeError::Truncated { offset: start });
            };
            let chunk = chunk_value(offset, character)?;
            value |= (chunk & CHUNK_MASK) << (chunk_index * CHUNK_BITS);
            if chunk & CONTINUATION_BIT == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::Overflow { offset: start })
    }
}

fn chunk_value(offset: usize, character: char) -> Result<u64, DecodeError> {
    u8::try_from(character)
        .ok()
        .and_then(|byte| byte.checked_sub(CHUNK_OFFSET))
        .filter(|chunk| *chunk <= 0x3f)
        .map(u64::from)
        .ok_or(DecodeError::InvalidCharacter { offset, character })
}
