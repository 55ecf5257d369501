//! Polyline encoding, the structural inverse of [`crate::decode`].

use crate::{
    CHUNK_BITS, CHUNK_MASK, CHUNK_OFFSET, CONTINUATION_BIT, Coordinate, DEFAULT_PRECISION,
    precision_factor,
};

/// Encode coordinates at precision 5.
///
/// Each axis is rounded to the nearest 1e-5 degree before encoding, so
/// decoding the result reproduces the input within that tolerance.
///
/// # Examples
///
/// ```
/// use polyline_codec::{Coordinate, encode};
///
/// let encoded = encode(&[Coordinate::new(-120.2, 38.5)]);
/// assert_eq!(encoded, "_p~iF~ps|U");
/// ```
#[must_use]
pub fn encode(coordinates: &[Coordinate]) -> String {
    encode_with_precision(coordinates, DEFAULT_PRECISION)
}

/// Encode coordinates with `precision` decimal places.
///
/// Precisions above [`crate::MAX_PRECISION`] are clamped. Non-finite axes
/// encode as zero.
#[must_use]
pub fn encode_with_precision(coordinates: &[Coordinate], precision: u8) -> String {
    let factor = precision_factor(precision);
    let mut encoded = String::with_capacity(coordinates.len() * 8);
    let mut previous_lat: i64 = 0;
    let mut previous_lng: i64 = 0;

    for coordinate in coordinates {
        let lat = to_units(coordinate.lat, factor);
        let lng = to_units(coordinate.lng, factor);
        push_delta(&mut encoded, lat.wrapping_sub(previous_lat));
        push_delta(&mut encoded, lng.wrapping_sub(previous_lng));
        previous_lat = lat;
        previous_lng = lng;
    }

    encoded
}

fn to_units(degrees: f64, factor: f64) -> i64 {
    if degrees.is_finite() {
        (degrees * factor).round() as i64
    } else {
        0
    }
}

fn push_delta(encoded: &mut String, delta: i64) {
    let shifted = delta << 1;
    let zigzag = if delta < 0 { !shifted } else { shifted };
    let mut value = zigzag as u64;

    while value >= CONTINUATION_BIT {
        encoded.push(chunk_char((value & CHUNK_MASK) | CONTINUATION_BIT));
        value >>= CHUNK_BITS;
    }
    encoded.push(chunk_char(value));
}

fn chunk_char(chunk: u64) -> char {
    // `chunk` never exceeds 0x3f, so the offset value stays within `?`..=`~`.
    char::from(CHUNK_OFFSET + (chunk & 0x3f) as u8)
}
