// The reader: a single recursive `read_value` over an immutable byte
// buffer and cursor (spec section 4.2).

use bstr::BString;

use crate::error::{Error, Result, UnsupportedKind};
use crate::value::{Matrix, Object, TypedArray, Value};
use crate::varint::read_compressed_size;

/// Recursion cap preventing stack exhaustion on hostile nested input.
const MAX_DEPTH: u32 = 1024;

/// Maps a 3-bit width-index field to a byte count. Only 0..=3 are valid,
/// corresponding to widths 1, 2, 4, 8; any other raw value is rejected.
fn width_from_index(idx: u8) -> Result<usize> {
    match idx {
        0 => Ok(1),
        1 => Ok(2),
        2 => Ok(4),
        3 => Ok(8),
        _ => Err(Error::Unsupported(UnsupportedKind::Width(idx))),
    }
}

/// Owns an immutable byte buffer and a mutable cursor over it.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: u32,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader {
            buf,
            pos: 0,
            depth: 0,
        }
    }

    /// Current cursor position, i.e. how many bytes have been consumed.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let start = self.pos;
        let end = start
            .checked_add(n)
            .filter(|&e| e <= self.buf.len())
            .ok_or(Error::Truncated { offset: start })?;
        let slice = &self.buf[start..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_le<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.take(N)?;
        Ok(bytes.try_into().unwrap())
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_le::<1>()?[0])
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_le::<8>()?))
    }

    fn read_compressed(&mut self) -> Result<u64> {
        read_compressed_size(self.buf, &mut self.pos)
    }

    fn read_string(&mut self) -> Result<BString> {
        let len = self.read_compressed()? as usize;
        Ok(BString::from(self.take(len)?.to_vec()))
    }

    /// Consume one tagged value from the current position, advancing the
    /// cursor just past it.
    pub fn read_value(&mut self) -> Result<Value> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(Error::TooDeep);
        }
        let result = self.read_value_inner();
        self.depth -= 1;
        result
    }

    fn read_value_inner(&mut self) -> Result<Value> {
        let header = self.read_u8()?;
        match header & 0b111 {
            0 => self.read_null_or_bool(header),
            1 => self.read_scalar(header),
            2 => self.read_string().map(Value::Str),
            3 => self.read_object(header),
            4 => self.read_typed_array(header).map(Value::TypedArray),
            5 => self.read_untyped_array(),
            6 => self.read_extension(header),
            t => Err(Error::Unsupported(UnsupportedKind::Type(t))),
        }
    }

    fn read_null_or_bool(&mut self, header: u8) -> Result<Value> {
        if (header >> 3) & 1 == 1 {
            Ok(Value::Bool((header >> 4) & 1 == 1))
        } else {
            Ok(Value::Null)
        }
    }

    fn read_scalar(&mut self, header: u8) -> Result<Value> {
        let kind = (header >> 3) & 0b11;
        let width_index = (header >> 5) & 0b111;
        let width = width_from_index(width_index)?;
        match (kind, width) {
            (0, 4) => Ok(Value::F32(f32::from_le_bytes(self.read_le::<4>()?))),
            (0, 8) => Ok(Value::F64(f64::from_le_bytes(self.read_le::<8>()?))),
            (0, _) => Err(Error::Unsupported(UnsupportedKind::Width(width_index))),
            (1, 1) => Ok(Value::I8(i8::from_le_bytes(self.read_le::<1>()?))),
            (1, 2) => Ok(Value::I16(i16::from_le_bytes(self.read_le::<2>()?))),
            (1, 4) => Ok(Value::I32(i32::from_le_bytes(self.read_le::<4>()?))),
            (1, 8) => Ok(Value::I64(i64::from_le_bytes(self.read_le::<8>()?))),
            (2, 1) => Ok(Value::U8(u8::from_le_bytes(self.read_le::<1>()?))),
            (2, 2) => Ok(Value::U16(u16::from_le_bytes(self.read_le::<2>()?))),
            (2, 4) => Ok(Value::U32(u32::from_le_bytes(self.read_le::<4>()?))),
            (2, 8) => Ok(Value::U64(u64::from_le_bytes(self.read_le::<8>()?))),
            _ => Err(Error::Malformed(format!("invalid numeric kind {}", kind))),
        }
    }

    fn read_object(&mut self, header: u8) -> Result<Value> {
        let key_kind = (header >> 3) & 0b11;
        if key_kind != 0 {
            return Err(Error::Unsupported(UnsupportedKind::IntegerKeys));
        }
        let n = self.read_compressed()? as usize;
        let mut obj = Object::new();
        for _ in 0..n {
            let key = self.read_string()?;
            let value = self.read_value()?;
            // Last-write-wins: IndexMap::insert overwrites in place.
            obj.insert(key, value);
        }
        Ok(Value::Object(obj))
    }

    fn read_typed_array(&mut self, header: u8) -> Result<TypedArray> {
        let elem_kind = (header >> 3) & 0b11;

        // The source's mask shifts here are inconsistent with the width
        // index already occupying bits 5-7; per the spec's resolution,
        // bit 5 is reinterpreted as the string-vs-bool flag in this branch
        // and no width is read.
        if elem_kind == 3 {
            if (header >> 5) & 1 != 1 {
                return Err(Error::Unsupported(UnsupportedKind::BoolArray));
            }
            let n = self.read_compressed()? as usize;
            let mut out = Vec::with_capacity(n);
            for _ in 0..n {
                out.push(self.read_string()?);
            }
            return Ok(TypedArray::Str(out));
        }

        let width_index = (header >> 5) & 0b111;
        let width = width_from_index(width_index)?;
        let n = self.read_compressed()? as usize;
        match (elem_kind, width) {
            (0, 4) => self.read_vec(n, |b| f32::from_le_bytes(b)).map(TypedArray::F32),
            (0, 8) => self.read_vec(n, |b| f64::from_le_bytes(b)).map(TypedArray::F64),
            (0, _) => Err(Error::Unsupported(UnsupportedKind::Width(width_index))),
            (1, 1) => self.read_vec(n, |b| i8::from_le_bytes(b)).map(TypedArray::I8),
            (1, 2) => self.read_vec(n, |b| i16::from_le_bytes(b)).map(TypedArray::I16),
            (1, 4) => self.read_vec(n, |b| i32::from_le_bytes(b)).map(TypedArray::I32),
            (1, 8) => self.read_vec(n, |b| i64::from_le_bytes(b)).map(TypedArray::I64),
            (2, 1) => self.read_vec(n, |b| u8::from_le_bytes(b)).map(TypedArray::U8),
            (2, 2) => self.read_vec(n, |b| u16::from_le_bytes(b)).map(TypedArray::U16),
            (2, 4) => self.read_vec(n, |b| u32::from_le_bytes(b)).map(TypedArray::U32),
            (2, 8) => self.read_vec(n, |b| u64::from_le_bytes(b)).map(TypedArray::U64),
            _ => unreachable!("elem_kind is masked to 0..=3 and 3 is handled above"),
        }
    }

    fn read_vec<T, const N: usize>(
        &mut self,
        n: usize,
        from_le: impl Fn([u8; N]) -> T,
    ) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(from_le(self.read_le::<N>()?));
        }
        Ok(out)
    }

    fn read_untyped_array(&mut self) -> Result<Value> {
        let n = self.read_compressed()? as usize;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_value()?);
        }
        Ok(Value::Array(out))
    }

    fn read_extension(&mut self, header: u8) -> Result<Value> {
        match header >> 3 {
            1 => {
                let _tag = self.read_compressed()?; // discarded, see Variant tag loss
                Ok(Value::Variant(Box::new(self.read_value()?)))
            }
            2 => self.read_matrix(),
            3 => {
                let re = self.read_f64()?;
                let im = self.read_f64()?;
                Ok(Value::Complex { re, im })
            }
            e => Err(Error::Unsupported(UnsupportedKind::Extension(e))),
        }
    }

    fn read_matrix(&mut self) -> Result<Value> {
        let layout = self.read_u8()?;
        if layout & 1 == 0 {
            return Err(Error::Unsupported(UnsupportedKind::RowMajor));
        }
        let (rows, cols) = extents_from_value(&self.read_value()?)?;
        let data = match self.read_value()? {
            Value::TypedArray(t) => t,
            other => {
                return Err(Error::Malformed(format!(
                    "matrix payload must be a typed array, got {:?}",
                    other
                )))
            }
        };
        Ok(Value::Matrix(Matrix::new(rows, cols, data)?))
    }
}

fn extents_from_value(value: &Value) -> Result<(usize, usize)> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::Malformed(format!(
                "matrix extents must be an untyped array, got {:?}",
                other
            )))
        }
    };
    if items.len() != 2 {
        return Err(Error::Malformed(format!(
            "matrix extents must have exactly 2 elements, got {}",
            items.len()
        )));
    }
    Ok((extent_to_usize(&items[0])?, extent_to_usize(&items[1])?))
}

fn extent_to_usize(value: &Value) -> Result<usize> {
    let n: i128 = match *value {
        Value::I8(n) => n as i128,
        Value::I16(n) => n as i128,
        Value::I32(n) => n as i128,
        Value::I64(n) => n as i128,
        Value::U8(n) => n as i128,
        Value::U16(n) => n as i128,
        Value::U32(n) => n as i128,
        Value::U64(n) => n as i128,
        ref other => {
            return Err(Error::Malformed(format!(
                "matrix extent must be an integer, got {:?}",
                other
            )))
        }
    };
    if n < 0 {
        return Err(Error::Malformed(format!(
            "matrix extent must be non-negative, got {}",
            n
        )));
    }
    Ok(n as usize)
}
