use std::{cmp::Ordering, fmt};

use crate::{ArrayView, ObjectView, RecordView};

/// A field value read from, or written to, a view.
///
/// Bit, integer and unsigned fields read as [`Value::Int`]; float fields read
/// as [`Value::Float`]; string fields as [`Value::String`]; nested records as
/// the cached sub-view bound to the parent's buffer.
#[derive(Clone, Debug)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    String(String),
    Object(ObjectView<'a>),
    Array(ArrayView<'a>),
}

impl<'a> Value<'a> {
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectView<'a>> {
        match self {
            Value::Object(view) => Some(view),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&ArrayView<'a>> {
        match self {
            Value::Array(view) => Some(view),
            _ => None,
        }
    }

    /// Recursive owned copy of the value.
    pub fn to_json(&self) -> Snapshot {
        match self {
            Value::Int(value) => Snapshot::Int(*value),
            Value::Float(value) => Snapshot::Float(*value),
            Value::String(value) => Snapshot::String(value.clone()),
            Value::Object(view) => view.to_json(),
            Value::Array(view) => view.to_json(),
        }
    }

    /// Short rendering used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::String(value) => format!("{value:?}"),
            Value::Object(view) => format!("record `{}`", view.name()),
            Value::Array(view) => format!("record `{}`", view.name()),
        }
    }

    /// Ordering used by [`FixedSequence::sort`](crate::FixedSequence::sort):
    /// numbers compare numerically, then strings lexicographically, then records
    /// by their snapshots.
    pub fn total_cmp(&self, other: &Value<'_>) -> Ordering {
        fn rank(value: &Value<'_>) -> u8 {
            match value {
                Value::Int(_) | Value::Float(_) => 0,
                Value::String(_) => 1,
                Value::Object(_) | Value::Array(_) => 2,
            }
        }

        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) if rank(a) == 0 && rank(b) == 0 => {
                let (a, b) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
                a.total_cmp(&b)
            }
            (a, b) if rank(a) == 2 && rank(b) == 2 => a.to_json().total_cmp(&b.to_json()),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }

    /// Equality that also treats NaN as equal to NaN.
    pub(crate) fn same_value_zero(&self, other: &Value<'_>) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan() => true,
            _ => self == other,
        }
    }
}

impl PartialEq<Value<'_>> for Value<'_> {
    fn eq(&self, other: &Value<'_>) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.to_json() == b.to_json(),
            (Value::Array(a), Value::Array(b)) => a.to_json() == b.to_json(),
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Object(view) => write!(f, "{}", view.to_json()),
            Value::Array(view) => write!(f, "{}", view.to_json()),
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value<'_> {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32, bool);

impl From<f32> for Value<'_> {
    #[inline]
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value<'_> {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value<'_> {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value<'_> {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<'a> From<ObjectView<'a>> for Value<'a> {
    #[inline]
    fn from(view: ObjectView<'a>) -> Self {
        Value::Object(view)
    }
}

impl<'a> From<ArrayView<'a>> for Value<'a> {
    #[inline]
    fn from(view: ArrayView<'a>) -> Self {
        Value::Array(view)
    }
}

impl<'a> From<RecordView<'a>> for Value<'a> {
    #[inline]
    fn from(view: RecordView<'a>) -> Self {
        match view {
            RecordView::Object(view) => Value::Object(view),
            RecordView::Array(view) => Value::Array(view),
        }
    }
}

/// A recursive, owned, buffer-independent copy of a view.
///
/// Objects keep their fields in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub enum Snapshot {
    Int(i64),
    Float(f64),
    String(String),
    Object(Vec<(String, Snapshot)>),
    Array(Vec<Snapshot>),
}

impl Snapshot {
    /// Looks up an object field by name.
    pub fn get(&self, key: &str) -> Option<&Snapshot> {
        match self {
            Snapshot::Object(entries) => entries
                .iter()
                .find_map(|(name, value)| (name == key).then_some(value)),
            _ => None,
        }
    }

    fn total_cmp(&self, other: &Snapshot) -> Ordering {
        match (self, other) {
            (Snapshot::Int(a), Snapshot::Int(b)) => a.cmp(b),
            (Snapshot::Float(a), Snapshot::Float(b)) => a.total_cmp(b),
            (Snapshot::String(a), Snapshot::String(b)) => a.cmp(b),
            (Snapshot::Array(a), Snapshot::Array(b)) => a
                .iter()
                .zip(b)
                .map(|(a, b)| a.total_cmp(b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Snapshot::Object(a), Snapshot::Object(b)) => a
                .iter()
                .zip(b)
                .map(|((_, a), (_, b))| a.total_cmp(b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Snapshot::Int(_) => 0,
            Snapshot::Float(_) => 1,
            Snapshot::String(_) => 2,
            Snapshot::Array(_) => 3,
            Snapshot::Object(_) => 4,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Int(value) => write!(f, "{value}"),
            Snapshot::Float(value) => write!(f, "{value}"),
            Snapshot::String(value) => write!(f, "{value:?}"),
            Snapshot::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Snapshot::Object(entries) => {
                f.write_str("{")?;
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
