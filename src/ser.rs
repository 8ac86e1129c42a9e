//! [`serde::Serialize`] for views and snapshots.
//!
//! Object records serialize as maps in field declaration order, arrays as
//! sequences. Views serialize straight from the buffer without building a
//! [`Snapshot`] first.
//!
//! ```
//! use bitrec::{define_object_record, RecordOptions};
//!
//! let point = define_object_record("Point", [("x", "int8"), ("y", "int8")], RecordOptions::default()).unwrap();
//! let mut bytes = [0x01, 0xFF];
//! let view = point.view(&mut bytes, 0).unwrap();
//! assert_eq!(serde_json::to_string(&view).unwrap(), r#"{"x":1,"y":-1}"#);
//! ```

use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::{ArrayView, FixedSequence, ObjectView, RecordView, Snapshot, Value};

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Snapshot::Int(value) => serializer.serialize_i64(*value),
            Snapshot::Float(value) => serializer.serialize_f64(*value),
            Snapshot::String(value) => serializer.serialize_str(value),
            Snapshot::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Snapshot::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, value) in entries {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Value<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Object(view) => view.serialize(serializer),
            Value::Array(view) => view.serialize(serializer),
        }
    }
}

impl Serialize for ObjectView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in &entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for ArrayView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self.iter() {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

impl Serialize for RecordView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RecordView::Object(view) => view.serialize(serializer),
            RecordView::Array(view) => view.serialize(serializer),
        }
    }
}
