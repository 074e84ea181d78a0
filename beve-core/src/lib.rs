//! BEVE (Binary Efficient Versatile Encoding) codec.
//!
//! A self-describing, type-tagged binary format: [`Value`] is the decoded
//! value tree, [`decode`] parses a buffer into one, [`encode`] serializes
//! one back out.

pub mod error;
pub mod reader;
pub mod value;
pub mod varint;
pub mod writer;

pub use error::{Error, Result, UnsupportedKind};
pub use value::{Matrix, Object, TypedArray, Value};

use reader::Reader;

/// Decode one value from the start of `buf`.
///
/// Trailing bytes after the value are not an error — callers that expect
/// the buffer to contain exactly one value and nothing else should check
/// [`Reader::position`] themselves via [`reader::Reader`] directly.
pub fn decode(buf: &[u8]) -> Result<Value> {
    Reader::new(buf).read_value()
}

/// Encode `value` into a freshly allocated buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    writer::encode(value)
}
