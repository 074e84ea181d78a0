// Error types for the BEVE codec

use std::error::Error as StdError;
use std::fmt;

/// A recognized but in-core-unimplemented construct.
///
/// These are constructs the header bit-layout can name but that the
/// reference behavior requires rejecting rather than guessing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// Object header selected a non-string key kind.
    IntegerKeys,
    /// Typed array header selected kind 3 with the bool sub-flag.
    BoolArray,
    /// Matrix layout byte selected row-major (bit 0 == 0).
    RowMajor,
    /// Extension selector (T=6) named an extension other than 1, 2, 3.
    Extension(u8),
    /// Top-level type family selected the reserved value (T=7).
    Type(u8),
    /// A width index resolved to a byte count not in {1, 2, 4, 8}, or a
    /// float width other than 4 or 8.
    Width(u8),
    /// Writer was asked to encode a `Value` variant it has no header for.
    ValueKind,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedKind::IntegerKeys => write!(f, "integer object keys are not supported"),
            UnsupportedKind::BoolArray => write!(f, "boolean typed arrays are not supported"),
            UnsupportedKind::RowMajor => write!(f, "row-major matrices are not supported"),
            UnsupportedKind::Extension(e) => write!(f, "unsupported extension selector {}", e),
            UnsupportedKind::Type(t) => write!(f, "unsupported top-level type {}", t),
            UnsupportedKind::Width(w) => write!(f, "unsupported width {}", w),
            UnsupportedKind::ValueKind => write!(f, "value has no BEVE encoding"),
        }
    }
}

/// Errors produced by the BEVE reader and writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read consumed past the end of the buffer. `offset` is the cursor
    /// position at the start of the read that failed.
    Truncated { offset: usize },
    /// A recognized but unimplemented construct was encountered.
    Unsupported(UnsupportedKind),
    /// A value was structurally present but outside permitted ranges, e.g.
    /// matrix extents that aren't a 2-element non-negative integer array.
    Malformed(String),
    /// A compressed-size integer exceeded 2^62 - 1 on encode.
    OutOfRange,
    /// Recursion depth cap (see the reader's recursion guard) was exceeded.
    TooDeep,
}

impl StdError for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated { offset } => {
                write!(f, "buffer exhausted reading at offset {}", offset)
            }
            Error::Unsupported(kind) => write!(f, "unsupported: {}", kind),
            Error::Malformed(msg) => write!(f, "malformed value: {}", msg),
            Error::OutOfRange => write!(f, "value out of range for compressed-size encoding"),
            Error::TooDeep => write!(f, "recursion depth exceeded"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
