// The writer: serializes a `Value` tree into the BEVE wire format (spec
// section 4.3). The inverse of `reader::Reader::read_value`.

use crate::error::Result;
use crate::value::{Matrix, TypedArray, Value};
use crate::varint::write_compressed_size;

/// Width-index field for a given byte width; the inverse of the reader's
/// `width_from_index`.
fn index_from_width(width: usize) -> u8 {
    match width {
        1 => 0,
        2 => 1,
        4 => 2,
        8 => 3,
        _ => unreachable!("typed array widths are always 1, 2, 4 or 8"),
    }
}

pub fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.push(0b0000_0000),
        Value::Bool(b) => out.push(if *b { 0b0001_1000 } else { 0b0000_1000 }),
        Value::I8(n) => write_scalar(out, 1, 1, &n.to_le_bytes()),
        Value::I16(n) => write_scalar(out, 1, 2, &n.to_le_bytes()),
        Value::I32(n) => write_scalar(out, 1, 4, &n.to_le_bytes()),
        Value::I64(n) => write_scalar(out, 1, 8, &n.to_le_bytes()),
        Value::U8(n) => write_scalar(out, 2, 1, &n.to_le_bytes()),
        Value::U16(n) => write_scalar(out, 2, 2, &n.to_le_bytes()),
        Value::U32(n) => write_scalar(out, 2, 4, &n.to_le_bytes()),
        Value::U64(n) => write_scalar(out, 2, 8, &n.to_le_bytes()),
        Value::F32(n) => write_scalar(out, 0, 4, &n.to_le_bytes()),
        Value::F64(n) => write_scalar(out, 0, 8, &n.to_le_bytes()),
        Value::Str(s) => write_string(out, s.as_ref()),
        Value::Array(items) => write_untyped_array(out, items)?,
        Value::TypedArray(t) => write_typed_array(out, t),
        Value::Object(obj) => {
            out.push(0b0000_0011);
            write_compressed_size(out, obj.len() as u64)?;
            for (key, val) in obj.iter() {
                write_string(out, key.as_ref());
                write_value(out, val)?;
            }
        }
        Value::Matrix(m) => write_matrix(out, m)?,
        Value::Complex { re, im } => {
            out.push((3 << 3) | 6);
            out.extend_from_slice(&re.to_le_bytes());
            out.extend_from_slice(&im.to_le_bytes());
        }
        Value::Variant(inner) => {
            out.push((1 << 3) | 6);
            // The tag is always written as 0; see the Variant tag loss note.
            write_compressed_size(out, 0)?;
            write_value(out, inner)?;
        }
    }
    Ok(())
}

fn write_scalar(out: &mut Vec<u8>, kind: u8, width: usize, bytes: &[u8]) {
    let header = 0b001 | (kind << 3) | (index_from_width(width) << 5);
    out.push(header);
    out.extend_from_slice(bytes);
}

fn write_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(0b010);
    write_compressed_size(out, bytes.len() as u64).expect("string length fits in compressed size");
    out.extend_from_slice(bytes);
}

fn write_untyped_array(out: &mut Vec<u8>, items: &[Value]) -> Result<()> {
    out.push(0b101);
    write_compressed_size(out, items.len() as u64)?;
    for item in items {
        write_value(out, item)?;
    }
    Ok(())
}

fn write_typed_array(out: &mut Vec<u8>, t: &TypedArray) {
    match t {
        TypedArray::Str(items) => {
            out.push(0b100 | (3 << 3) | (1 << 5));
            write_compressed_size(out, items.len() as u64)
                .expect("typed array length fits in compressed size");
            for s in items {
                write_string_payload(out, s.as_ref());
            }
        }
        TypedArray::F32(items) => write_typed_numeric(out, 0, 4, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::F64(items) => write_typed_numeric(out, 0, 8, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::I8(items) => write_typed_numeric(out, 1, 1, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::I16(items) => write_typed_numeric(out, 1, 2, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::I32(items) => write_typed_numeric(out, 1, 4, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::I64(items) => write_typed_numeric(out, 1, 8, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::U8(items) => write_typed_numeric(out, 2, 1, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::U16(items) => write_typed_numeric(out, 2, 2, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::U32(items) => write_typed_numeric(out, 2, 4, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
        TypedArray::U64(items) => write_typed_numeric(out, 2, 8, items.len(), |buf| {
            for n in items {
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }),
    }
}

fn write_typed_numeric(
    out: &mut Vec<u8>,
    kind: u8,
    width: usize,
    len: usize,
    write_elements: impl FnOnce(&mut Vec<u8>),
) {
    let header = 0b100 | (kind << 3) | (index_from_width(width) << 5);
    out.push(header);
    write_compressed_size(out, len as u64).expect("typed array length fits in compressed size");
    write_elements(out);
}

/// A string within a typed array shares the outer element-count framing
/// but each element still carries its own length prefix.
fn write_string_payload(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compressed_size(out, bytes.len() as u64).expect("string length fits in compressed size");
    out.extend_from_slice(bytes);
}

fn write_matrix(out: &mut Vec<u8>, m: &Matrix) -> Result<()> {
    out.push((2 << 3) | 6);
    out.push(0b1); // layout byte: bit 0 set selects column-major
    let extents: Vec<Value> = vec![Value::U64(m.rows as u64), Value::U64(m.cols as u64)];
    write_untyped_array(out, &extents)?;
    write_typed_array(out, &m.data);
    Ok(())
}

pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}
