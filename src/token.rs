use crate::{ArrayRecordType, ObjectRecordType, RecordType};

/// A field type declaration, resolved to an [`Accessor`](crate::Accessor) by a
/// [`Registry`](crate::Registry).
///
/// Keywords: `bit1` to `bit7`, `int8`, `int16`, `int32`, `uint8`, `uint16`,
/// `uint32`, `float32` (alias `float`) and `float64` (alias `double`).
///
/// ```
/// use bitrec::TypeToken;
///
/// let flags = TypeToken::from("bit3");
/// let name = TypeToken::string("utf8", 15);
/// let matrix = TypeToken::array(TypeToken::array("int16", 3), 3);
/// # let _ = (flags, name, matrix);
/// ```
#[derive(Clone, Debug)]
pub enum TypeToken {
    Keyword(String),
    String { encoding: String, byte_length: usize },
    Record(RecordType),
    Array(Box<TypeToken>, usize),
}

impl TypeToken {
    /// A fixed-capacity string field.
    pub fn string(encoding: impl Into<String>, byte_length: usize) -> Self {
        TypeToken::String {
            encoding: encoding.into(),
            byte_length,
        }
    }

    /// Shorthand for a fixed-length array of `element`.
    pub fn array(element: impl Into<TypeToken>, length: usize) -> Self {
        TypeToken::Array(Box::new(element.into()), length)
    }
}

impl From<&str> for TypeToken {
    #[inline]
    fn from(keyword: &str) -> Self {
        TypeToken::Keyword(keyword.to_owned())
    }
}

impl From<String> for TypeToken {
    #[inline]
    fn from(keyword: String) -> Self {
        TypeToken::Keyword(keyword)
    }
}

impl From<RecordType> for TypeToken {
    #[inline]
    fn from(record: RecordType) -> Self {
        TypeToken::Record(record)
    }
}

impl From<ObjectRecordType> for TypeToken {
    #[inline]
    fn from(record: ObjectRecordType) -> Self {
        TypeToken::Record(RecordType::Object(record))
    }
}

impl From<&ObjectRecordType> for TypeToken {
    #[inline]
    fn from(record: &ObjectRecordType) -> Self {
        TypeToken::Record(RecordType::Object(record.clone()))
    }
}

impl From<ArrayRecordType> for TypeToken {
    #[inline]
    fn from(record: ArrayRecordType) -> Self {
        TypeToken::Record(RecordType::Array(record))
    }
}

impl From<&ArrayRecordType> for TypeToken {
    #[inline]
    fn from(record: &ArrayRecordType) -> Self {
        TypeToken::Record(RecordType::Array(record.clone()))
    }
}
