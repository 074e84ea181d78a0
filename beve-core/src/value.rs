// The value tree shared by the reader and the writer (spec section 3).

use bstr::BString;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// A string-keyed, order-preserving, last-write-wins map.
///
/// Decode order is not required to match encode order (repeated keys are
/// resolved last-write-wins by `IndexMap::insert`), but the writer emits
/// entries in the map's iteration order, which for a value built by
/// insertion equals insertion order.
pub type Object = IndexMap<BString, Value>;

/// A dynamically-typed BEVE value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Opaque byte run; not required to be valid UTF-8 at this layer.
    Str(BString),
    /// Heterogeneous ordered sequence.
    Array(Vec<Value>),
    /// Homogeneous sequence; element kind and width are part of the type.
    TypedArray(TypedArray),
    Object(Object),
    Matrix(Matrix),
    Complex { re: f64, im: f64 },
    /// Tag is discarded on decode and always written as 0 on encode — see
    /// the Variant tag loss design note.
    Variant(Box<Value>),
}

/// A homogeneous sequence, one element kind per variant so width and
/// signedness are structural rather than checked at use.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Str(Vec<BString>),
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            TypedArray::I8(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::I64(v) => v.len(),
            TypedArray::U8(v) => v.len(),
            TypedArray::U16(v) => v.len(),
            TypedArray::U32(v) => v.len(),
            TypedArray::U64(v) => v.len(),
            TypedArray::F32(v) => v.len(),
            TypedArray::F64(v) => v.len(),
            TypedArray::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A 2-D matrix: row/column counts plus a column-major typed-array payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: TypedArray,
}

impl Matrix {
    /// Build a matrix, enforcing the `rows * cols == len(payload)` invariant.
    pub fn new(rows: usize, cols: usize, data: TypedArray) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            Error::Malformed(format!(
                "matrix extents {}x{} overflow when multiplied",
                rows, cols
            ))
        })?;
        if expected != data.len() {
            return Err(Error::Malformed(format!(
                "matrix extents {}x{} do not match payload length {}",
                rows,
                cols,
                data.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_rejects_mismatched_extents() {
        let data = TypedArray::I32(vec![1, 2, 3, 4, 5]);
        assert!(Matrix::new(2, 3, data).is_err());
    }

    #[test]
    fn matrix_accepts_matching_extents() {
        let data = TypedArray::I32(vec![1, 2, 3, 4, 5, 6]);
        let m = Matrix::new(2, 3, data).unwrap();
        assert_eq!(m.rows, 2);
        assert_eq!(m.cols, 3);
    }

    #[test]
    fn object_last_write_wins_preserves_first_position() {
        let mut obj = Object::new();
        obj.insert(BString::from("a"), Value::I32(1));
        obj.insert(BString::from("b"), Value::I32(2));
        obj.insert(BString::from("a"), Value::I32(3));
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get(&BString::from("a")), Some(&Value::I32(3)));
    }
}
