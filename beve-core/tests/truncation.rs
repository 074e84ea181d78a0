mod common;

use beve_core::Error;
use common::arb_value;
use proptest::prelude::*;

proptest! {
    // Testable Property 6: every strict prefix of a valid encoded buffer
    // fails with Truncated.
    #[test]
    fn every_prefix_of_a_valid_buffer_truncates(value in arb_value()) {
        let bytes = beve_core::encode(&value).unwrap();
        for k in 0..bytes.len() {
            let err = beve_core::decode(&bytes[..k]).unwrap_err();
            prop_assert!(matches!(err, Error::Truncated { .. }));
        }
    }
}

#[test]
fn empty_buffer_is_truncated() {
    assert_eq!(beve_core::decode(&[]), Err(Error::Truncated { offset: 0 }));
}
