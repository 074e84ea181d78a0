use beve_core::Error;

// Testable Property 7: a synthetic buffer nesting untyped arrays 2048
// deep must fail with TooDeep rather than overflow the stack.
#[test]
fn deeply_nested_array_trips_recursion_cap() {
    let mut buf = Vec::new();
    for _ in 0..2048 {
        buf.push(0b0000_0101); // T=5, untyped array
        buf.push(0x04); // compressed count 1
    }
    buf.push(0x00); // innermost value: null
    assert_eq!(beve_core::decode(&buf), Err(Error::TooDeep));
}

#[test]
fn moderately_nested_array_is_fine() {
    let mut buf = Vec::new();
    for _ in 0..16 {
        buf.push(0b0000_0101);
        buf.push(0x04);
    }
    buf.push(0x00);
    assert!(beve_core::decode(&buf).is_ok());
}
