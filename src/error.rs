//! Error types for record definition and field access.
//!
//! This module contains the [`Error`] type which represents all possible errors
//! that can occur when defining a record layout, binding a view to a buffer,
//! or reading and writing fields through a view.
//!
//! Every variant belongs to one of four families, reported by [`Error::kind`]:
//!
//! | [`ErrorKind`] | Raised by |
//! |---------------|-----------|
//! | `Configuration` | `define_object_record`, `define_array_record`, the builder |
//! | `Construction` | `view` |
//! | `Value` | field and element setters |
//! | `Immutability` | setters targeting nested records or missing fields/indices |
//!
//! # Example
//!
//! ```
//! use bitrec::{define_object_record, ErrorKind, RecordOptions};
//!
//! let ty = define_object_record("Flags", [("mode", "bit3")], RecordOptions::default()).unwrap();
//! let mut bytes = [0u8; 1];
//! let view = ty.view(&mut bytes, 0).unwrap();
//!
//! let err = view.set("mode", 8).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Value);
//! assert_eq!(err.to_string(), "field `mode` expects a value in [0..7], got 8");
//! ```

use std::fmt::{self, Display};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The family an [`Error`] belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// The record declaration is invalid. Raised while defining a type.
    Configuration,
    /// The buffer window passed to `view` is invalid.
    Construction,
    /// A write was rejected because the value is outside the field's domain.
    Value,
    /// A write targeted something that cannot be written.
    Immutability,
}

/// This type represents all possible errors raised by record definition and access.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Record names must be PascalCase (`[A-Z][A-Za-z0-9]*`).
    InvalidRecordName(String),

    /// A field name is not a valid identifier.
    InvalidFieldName { record: String, field: String },

    /// A field name collides with a reserved name such as `constructor` or `toJSON`.
    ReservedFieldName { record: String, field: String },

    /// The same field name was declared twice.
    DuplicateField { record: String, field: String },

    /// A type keyword that does not name any accessor.
    UnknownType(String),

    /// A string field declared with a byte length of zero.
    InvalidStringLength { encoding: String, byte_length: usize },

    /// A string field was declared but the registry has no text encoder.
    MissingTextEncoder { encoding: String },

    /// The installed text encoder does not support the named encoding.
    UnsupportedEncoding(String),

    /// A non-bit field would start at a bit offset that is not a multiple of 8.
    MisalignedField {
        record: String,
        field: String,
        accessor: String,
        bit_offset: usize,
    },

    /// An explicit bit length is smaller than the fields require.
    BitLengthTooSmall {
        record: String,
        declared: usize,
        required: usize,
    },

    /// The size in bits of a record or string type does not fit in a `usize`.
    LayoutTooLarge { record: String },

    /// The view window does not fit in the buffer.
    OutOfBounds {
        byte_offset: usize,
        byte_length: usize,
        buffer_length: usize,
    },

    /// A numeric write outside the field's `[min..max]` domain.
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: String,
    },

    /// A non-integer value was written to an integer or bit field.
    NotAnInteger { field: String, actual: String },

    /// A non-numeric value was written to a float field.
    NotANumber { field: String, actual: String },

    /// A non-string value was written to a string field.
    NotAString { field: String, actual: String },

    /// The encoded string does not fit the field's byte capacity.
    StringTooLong {
        field: String,
        capacity: usize,
        actual: usize,
    },

    /// The text encoder could not encode the string.
    Encoding { field: String, message: String },

    /// Nested record fields cannot be reassigned, only their own fields.
    ReadOnlyField { field: String },

    /// A write to a field the record does not declare.
    UnknownField { record: String, field: String },

    /// A write to an index outside an array's fixed length.
    IndexOutOfBounds { index: usize, length: usize },
}

impl Error {
    /// Returns the family this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRecordName(_)
            | Error::InvalidFieldName { .. }
            | Error::ReservedFieldName { .. }
            | Error::DuplicateField { .. }
            | Error::UnknownType(_)
            | Error::InvalidStringLength { .. }
            | Error::MissingTextEncoder { .. }
            | Error::UnsupportedEncoding(_)
            | Error::MisalignedField { .. }
            | Error::BitLengthTooSmall { .. }
            | Error::LayoutTooLarge { .. } => ErrorKind::Configuration,
            Error::OutOfBounds { .. } => ErrorKind::Construction,
            Error::OutOfRange { .. }
            | Error::NotAnInteger { .. }
            | Error::NotANumber { .. }
            | Error::NotAString { .. }
            | Error::StringTooLong { .. }
            | Error::Encoding { .. } => ErrorKind::Value,
            Error::ReadOnlyField { .. }
            | Error::UnknownField { .. }
            | Error::IndexOutOfBounds { .. } => ErrorKind::Immutability,
        }
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidRecordName(name) => {
                write!(formatter, "record name `{name}` must be PascalCase")
            }
            Error::InvalidFieldName { record, field } => write!(
                formatter,
                "field name `{field}` in record `{record}` is not a valid identifier"
            ),
            Error::ReservedFieldName { record, field } => write!(
                formatter,
                "field name `{field}` in record `{record}` is reserved"
            ),
            Error::DuplicateField { record, field } => write!(
                formatter,
                "field `{field}` is declared more than once in record `{record}`"
            ),
            Error::UnknownType(token) => write!(formatter, "unknown field type `{token}`"),
            Error::InvalidStringLength {
                encoding,
                byte_length,
            } => write!(
                formatter,
                "string field ({encoding}) expects a byte length >= 1, got {byte_length}"
            ),
            Error::MissingTextEncoder { encoding } => write!(
                formatter,
                "string field ({encoding}) declared but no text encoder is installed"
            ),
            Error::UnsupportedEncoding(encoding) => {
                write!(formatter, "text encoding `{encoding}` is not supported")
            }
            Error::MisalignedField {
                record,
                field,
                accessor,
                bit_offset,
            } => write!(
                formatter,
                "field `{field}` ({accessor}) in record `{record}` must be byte aligned, but starts at bit {bit_offset}"
            ),
            Error::BitLengthTooSmall {
                record,
                declared,
                required,
            } => write!(
                formatter,
                "record `{record}` declares {declared} bits but its fields require {required}"
            ),
            Error::LayoutTooLarge { record } => {
                write!(formatter, "`{record}` is too large to lay out")
            }
            Error::OutOfBounds {
                byte_offset,
                byte_length,
                buffer_length,
            } => write!(
                formatter,
                "view of {byte_length} bytes at offset {byte_offset} exceeds buffer of {buffer_length} bytes"
            ),
            Error::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                formatter,
                "field `{field}` expects a value in [{min}..{max}], got {actual}"
            ),
            Error::NotAnInteger { field, actual } => {
                write!(formatter, "field `{field}` expects an integer, got {actual}")
            }
            Error::NotANumber { field, actual } => {
                write!(formatter, "field `{field}` expects a number, got {actual}")
            }
            Error::NotAString { field, actual } => {
                write!(formatter, "field `{field}` expects a string, got {actual}")
            }
            Error::StringTooLong {
                field,
                capacity,
                actual,
            } => write!(
                formatter,
                "field `{field}` holds at most {capacity} bytes, got {actual} encoded bytes"
            ),
            Error::Encoding { field, message } => {
                write!(formatter, "field `{field}` could not be encoded: {message}")
            }
            Error::ReadOnlyField { field } => {
                write!(formatter, "field `{field}` is a nested record and is read-only")
            }
            Error::UnknownField { record, field } => {
                write!(formatter, "record `{record}` has no field `{field}`")
            }
            Error::IndexOutOfBounds { index, length } => write!(
                formatter,
                "index {index} is out of bounds for array of length {length}"
            ),
        }
    }
}

impl std::error::Error for Error {}
