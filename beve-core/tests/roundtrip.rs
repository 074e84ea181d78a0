mod common;

use beve_core::value::{Matrix, TypedArray, Value};
use common::arb_value;
use proptest::prelude::*;

proptest! {
    // Testable Property 1: round-trip for any Value excluding Matrix and Variant.
    #[test]
    fn decode_encode_is_identity(value in arb_value()) {
        let bytes = beve_core::encode(&value).unwrap();
        let decoded = beve_core::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    // Testable Property 2: compressed-size round-trip at every width boundary.
    #[test]
    fn compressed_size_roundtrips_boundary(n in prop_oneof![
        Just(0u64), Just(63), Just(64), Just(16_383), Just(16_384),
        Just(1_073_741_823), Just(1_073_741_824), Just((1u64 << 62) - 1),
    ]) {
        let mut buf = Vec::new();
        beve_core::varint::write_compressed_size(&mut buf, n).unwrap();
        let mut pos = 0;
        let decoded = beve_core::varint::read_compressed_size(&buf, &mut pos).unwrap();
        prop_assert_eq!(decoded, n);
        prop_assert_eq!(pos, buf.len());
    }
}

#[test]
fn i16_width_is_not_widened_to_i32() {
    // Testable Property 3: an I16's header must carry width-index 1.
    let bytes = beve_core::encode(&Value::I16(42)).unwrap();
    assert_eq!(bytes.len(), 1 + 2);
    let header = bytes[0];
    let width_index = (header >> 5) & 0b111;
    assert_eq!(width_index, 1);
}

#[test]
fn matrix_roundtrips_outside_the_general_property() {
    let data = TypedArray::I32(vec![1, 2, 3, 4, 5, 6]);
    let value = Value::Matrix(Matrix::new(2, 3, data).unwrap());
    let bytes = beve_core::encode(&value).unwrap();
    assert_eq!(beve_core::decode(&bytes).unwrap(), value);
}

#[test]
fn variant_tag_does_not_survive_roundtrip() {
    let value = Value::Variant(Box::new(Value::Bool(true)));
    let bytes = beve_core::encode(&value).unwrap();
    // Decoding still yields a Variant wrapping the same inner value; the
    // tag itself (discarded on encode, not modeled in `Value`) is simply
    // not observable, not "lost" in a way equality would catch.
    assert_eq!(beve_core::decode(&bytes).unwrap(), value);
}
