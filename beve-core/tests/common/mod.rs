// Shared proptest generators for Value trees.
//
// Matrix and Variant are intentionally absent from `arb_value`: Matrix
// carries a shape invariant (rows * cols == payload length) that a
// generic leaf/composite generator would have to special-case, and
// Variant is lossy on decode (the tag is discarded), so `decode(encode(v))
// == v` does not hold for it. Both get their own targeted tests instead
// of participating in the general round-trip property.

use beve_core::value::{Object, TypedArray, Value};
use bstr::BString;
use proptest::prelude::*;

pub fn arb_bstring() -> impl Strategy<Value = BString> {
    ".*".prop_map(|s: String| BString::from(s.into_bytes()))
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::I8),
        any::<i16>().prop_map(Value::I16),
        any::<i32>().prop_map(Value::I32),
        any::<i64>().prop_map(Value::I64),
        any::<u8>().prop_map(Value::U8),
        any::<u16>().prop_map(Value::U16),
        any::<u32>().prop_map(Value::U32),
        any::<u64>().prop_map(Value::U64),
        any::<f32>().prop_filter("no NaN", |f| !f.is_nan()).prop_map(Value::F32),
        any::<f64>().prop_filter("no NaN", |f| !f.is_nan()).prop_map(Value::F64),
        arb_bstring().prop_map(Value::Str),
    ]
}

fn arb_typed_array() -> impl Strategy<Value = TypedArray> {
    prop_oneof![
        prop::collection::vec(any::<i8>(), 0..8).prop_map(TypedArray::I8),
        prop::collection::vec(any::<i16>(), 0..8).prop_map(TypedArray::I16),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(TypedArray::I32),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(TypedArray::I64),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(TypedArray::U8),
        prop::collection::vec(any::<u16>(), 0..8).prop_map(TypedArray::U16),
        prop::collection::vec(any::<u32>(), 0..8).prop_map(TypedArray::U32),
        prop::collection::vec(any::<u64>(), 0..8).prop_map(TypedArray::U64),
        prop::collection::vec(any::<f32>().prop_filter("no NaN", |f| !f.is_nan()), 0..8)
            .prop_map(TypedArray::F32),
        prop::collection::vec(any::<f64>().prop_filter("no NaN", |f| !f.is_nan()), 0..8)
            .prop_map(TypedArray::F64),
        prop::collection::vec(arb_bstring(), 0..8).prop_map(TypedArray::Str),
    ]
}

/// A Value tree of bounded depth and width, excluding Matrix and Variant.
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![arb_scalar(), arb_typed_array().prop_map(Value::TypedArray)];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec((arb_bstring(), inner), 0..8).prop_map(|pairs| {
                let mut obj = Object::new();
                for (k, v) in pairs {
                    obj.insert(k, v);
                }
                Value::Object(obj)
            }),
        ]
    })
}
