//! Error types for polyline decoding.

use thiserror::Error;

/// Errors raised while decoding an encoded polyline.
///
/// Offsets are byte offsets into the input string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before a value's final chunk, or a latitude was not
    /// followed by its longitude.
    #[error("polyline truncated: value starting at byte {offset} is unterminated")]
    Truncated {
        /// Offset where the unterminated value starts.
        offset: usize,
    },
    /// A character outside the codec alphabet (`?` through `~`) was found.
    #[error("invalid polyline character {character:?} at byte {offset}")]
    InvalidCharacter {
        /// Offset of the rejected character.
        offset: usize,
        /// The rejected character.
        character: char,
    },
    /// A value used more chunks than a 64-bit accumulator can hold, or the
    /// running position overflowed.
    #[error("polyline value starting at byte {offset} overflows")]
    Overflow {
        /// Offset where the oversized value starts.
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_formats_offset() {
        let err = DecodeError::Truncated { offset: 4 };
        assert_eq!(
            err.to_string(),
            "polyline truncated: value starting at byte 4 is unterminated"
        );
    }

    #[test]
    fn invalid_character_formats_character() {
        let err = DecodeError::InvalidCharacter {
            offset: 2,
            character: ' ',
        };
        assert_eq!(err.to_string(), "invalid polyline character ' ' at byte 2");
    }
}
