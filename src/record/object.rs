use std::{cell::Cell, fmt, rc::Rc, sync::Arc};

use crate::{
    Error, FieldSpec, IntoBuffer, RecordView, Result, Snapshot, Value, buffer::Window, cold_path,
    layout::Shape,
};

/// A record type with named fields, produced by
/// [`define_object_record`](crate::define_object_record).
#[derive(Clone)]
pub struct ObjectRecordType {
    shape: Arc<Shape>,
}

impl ObjectRecordType {
    pub(crate) fn from_shape(shape: Arc<Shape>) -> Self {
        Self { shape }
    }

    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.shape.name()
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.shape.bit_length()
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.shape.byte_length()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        self.shape.fields()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.shape.field(name)
    }

    /// Binds a view to `[byte_offset, byte_offset + byte_length)` of `buffer`.
    ///
    /// Fails with [`Error::OutOfBounds`] when the window does not fit.
    pub fn view<'a>(
        &self,
        buffer: impl IntoBuffer<'a>,
        byte_offset: usize,
    ) -> Result<ObjectView<'a>> {
        let window = Window::new(buffer.into_buffer(), byte_offset, self.byte_length())?;
        tracing::trace!(record = self.name(), byte_offset, "object view bound");
        Ok(ObjectView::bind(self.shape.clone(), window))
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.shape.fields().iter().map(FieldSpec::name)
    }

    pub fn values<'a>(&self, view: &ObjectView<'a>) -> Vec<Value<'a>> {
        view.values()
    }

    pub fn entries<'v, 'a>(&self, view: &'v ObjectView<'a>) -> Vec<(&'v str, Value<'a>)> {
        view.entries()
    }
}

impl PartialEq for ObjectRecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape)
    }
}

impl fmt::Debug for ObjectRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRecordType")
            .field("name", &self.name())
            .field("bit_length", &self.bit_length())
            .field("byte_length", &self.byte_length())
            .finish()
    }
}

/// A view of an object record bound to a borrowed buffer.
///
/// Views are cheap to clone; clones share the bound window and the nested
/// record cache. Every read goes to the buffer, nothing is cached but the
/// nested sub-views themselves.
#[derive(Clone)]
pub struct ObjectView<'a> {
    shape: Arc<Shape>,
    window: Window<'a>,
    nested: Rc<[Option<RecordView<'a>>]>,
}

impl<'a> ObjectView<'a> {
    pub(crate) fn bind(shape: Arc<Shape>, window: Window<'a>) -> Self {
        let nested = shape
            .fields()
            .iter()
            .map(|field| field.accessor().bind(&window, field.bit_offset()))
            .collect();
        Self {
            shape,
            window,
            nested,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    #[inline]
    pub fn record_type(&self) -> ObjectRecordType {
        ObjectRecordType::from_shape(self.shape.clone())
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.shape.name()
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.shape.bit_length()
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.shape.byte_length()
    }

    fn read(&self, index: usize) -> Value<'a> {
        match &self.nested[index] {
            Some(record) => record.clone().into(),
            None => {
                let field = &self.shape.fields()[index];
                field.accessor().read(&self.window, field.bit_offset())
            }
        }
    }

    /// Reads a field. `None` if the record has no such field.
    pub fn get(&self, name: &str) -> Option<Value<'a>> {
        self.shape.field_index(name).map(|index| self.read(index))
    }

    /// The cached sub-view of a nested record field.
    pub fn record(&self, name: &str) -> Option<&RecordView<'a>> {
        self.shape
            .field_index(name)
            .and_then(|index| self.nested[index].as_ref())
    }

    /// Validates and writes a field. The buffer is untouched on error.
    pub fn set<'v>(&self, name: &str, value: impl Into<Value<'v>>) -> Result<()> {
        let Some(field) = self.shape.field(name) else {
            cold_path();
            return Err(Error::UnknownField {
                record: self.name().to_owned(),
                field: name.to_owned(),
            });
        };
        field
            .accessor()
            .write(&self.window, field.bit_offset(), name, &value.into())
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.shape.fields().iter().map(FieldSpec::name)
    }

    pub fn values(&self) -> Vec<Value<'a>> {
        (0..self.shape.fields().len())
            .map(|index| self.read(index))
            .collect()
    }

    pub fn entries(&self) -> Vec<(&str, Value<'a>)> {
        self.shape
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), self.read(index)))
            .collect()
    }

    /// Recursive owned snapshot of every field.
    pub fn to_json(&self) -> Snapshot {
        Snapshot::Object(
            self.entries()
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value.to_json()))
                .collect(),
        )
    }

    /// The bound bytes, shared with the underlying buffer.
    #[inline]
    pub fn raw_bytes(&self) -> &'a [Cell<u8>] {
        self.window.bytes()
    }

    /// A copy of the bound bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.window.to_vec()
    }
}

impl fmt::Debug for ObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.name()).field(&self.to_json()).finish()
    }
}
