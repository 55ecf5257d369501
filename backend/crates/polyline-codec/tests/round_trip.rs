//! Property coverage for the encode/decode pair.

use polyline_codec::{
    Coordinate, DecodeError, decode, decode_with_precision, encode, encode_with_precision,
};
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_coordinate()
        (lng in -180.0_f64..=180.0, lat in -90.0_f64..=90.0)
        -> Coordinate
    {
        Coordinate::new(lng, lat)
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode_within_one_unit(
        points in prop::collection::vec(arbitrary_coordinate(), 1..64)
    ) {
        let decoded = decode(&encode(&points)).expect("encoded output must decode");
        prop_assert_eq!(decoded.len(), points.len());
        for (actual, expected) in decoded.iter().zip(&points) {
            prop_assert!(
                actual.approx_eq(*expected, 1e-5),
                "{:?} drifted from {:?}", actual, expected
            );
        }
    }

    #[test]
    fn precision_six_round_trips_within_one_unit(
        points in prop::collection::vec(arbitrary_coordinate(), 1..32)
    ) {
        let decoded = decode_with_precision(&encode_with_precision(&points, 6), 6)
            .expect("encoded output must decode");
        for (actual, expected) in decoded.iter().zip(&points) {
            prop_assert!(actual.approx_eq(*expected, 1e-6));
        }
    }

    #[test]
    fn prefixes_decode_to_leading_points_or_truncate(
        points in prop::collection::vec(arbitrary_coordinate(), 1..8),
        cut in 0_usize..64
    ) {
        let encoded = encode(&points);
        let full = decode(&encoded).expect("encoded output must decode");
        let prefix = encoded.get(..cut.min(encoded.len())).unwrap_or_default();

        match decode(prefix) {
            Ok(decoded) => {
                prop_assert!(decoded.len() <= full.len());
                prop_assert_eq!(
                    decoded.as_slice(),
                    full.get(..decoded.len()).unwrap_or_default()
                );
            }
            Err(error) => prop_assert!(
                matches!(error, DecodeError::Truncated { .. }),
                "prefix of {} bytes failed with {:?}", cut, error
            ),
        }
    }
}
