use std::{cell::Cell, fmt, rc::Rc, sync::Arc};

use crate::{
    Accessor, Error, FixedSequence, IntoBuffer, RecordView, Result, SequenceIter, Snapshot,
    Value, buffer::Window, cold_path,
    layout::{Shape, ShapeKind},
};

/// A fixed-length array record type, produced by
/// [`define_array_record`](crate::define_array_record).
///
/// Arrays nest: an array type used as the element token of another array
/// yields a multi-dimensional array.
#[derive(Clone)]
pub struct ArrayRecordType {
    shape: Arc<Shape>,
}

impl ArrayRecordType {
    pub(crate) fn from_shape(shape: Arc<Shape>) -> Self {
        Self { shape }
    }

    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// `element$length`, e.g. `int16$2` or `int16$3$3`.
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
    pub fn element(&self) -> &Arc<Accessor> {
        element_of(&self.shape).0
    }

    #[inline]
    pub fn len(&self) -> usize {
        element_of(&self.shape).1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Binds a view to `[byte_offset, byte_offset + byte_length)` of `buffer`.
    pub fn view<'a>(&self, buffer: impl IntoBuffer<'a>, byte_offset: usize) -> Result<ArrayView<'a>> {
        let window = Window::new(buffer.into_buffer(), byte_offset, self.byte_length())?;
        tracing::trace!(record = self.name(), byte_offset, "array view bound");
        Ok(ArrayView::bind(self.shape.clone(), window))
    }
}

impl PartialEq for ArrayRecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape)
    }
}

impl fmt::Debug for ArrayRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRecordType")
            .field("name", &self.name())
            .field("length", &self.len())
            .field("byte_length", &self.byte_length())
            .finish()
    }
}

fn element_of(shape: &Shape) -> (&Arc<Accessor>, usize) {
    match shape.kind() {
        ShapeKind::Array { element, length } => (element, *length),
        ShapeKind::Object(_) => unreachable!("array record bound to an object shape"),
    }
}

/// A fixed-length indexed view bound to a borrowed buffer.
///
/// Besides indexed [`get`](ArrayView::get)/[`set`](ArrayView::set), the full
/// sequence surface comes from [`FixedSequence`].
///
/// ```
/// use bitrec::{define_array_record, FixedSequence, Value};
///
/// let ty = define_array_record("int16", 2).unwrap();
/// let mut bytes = [0x01, 0x02, 0x03, 0x04];
/// let view = ty.view(&mut bytes, 0).unwrap();
/// assert_eq!(view.get(0), Some(Value::Int(258)));
/// assert_eq!(view.map(|value, _| value.as_i64().unwrap() * 2), [516, 1544]);
/// ```
#[derive(Clone)]
pub struct ArrayView<'a> {
    shape: Arc<Shape>,
    window: Window<'a>,
    nested: Rc<[Option<RecordView<'a>>]>,
}

impl<'a> ArrayView<'a> {
    pub(crate) fn bind(shape: Arc<Shape>, window: Window<'a>) -> Self {
        let (element, length) = element_of(&shape);
        let nested = if element.is_record() {
            (0..length)
                .map(|index| element.bind(&window, index * element.bits()))
                .collect()
        } else {
            Rc::from([])
        };
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
    pub fn record_type(&self) -> ArrayRecordType {
        ArrayRecordType::from_shape(self.shape.clone())
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.shape.name()
    }

    #[inline]
    pub fn element(&self) -> &Arc<Accessor> {
        element_of(&self.shape).0
    }

    #[inline]
    pub fn len(&self) -> usize {
        element_of(&self.shape).1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.shape.bit_length()
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.shape.byte_length()
    }

    /// Reads element `index`. `None` past the end.
    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        if index >= self.len() {
            return None;
        }
        Some(match self.nested.get(index) {
            Some(Some(record)) => record.clone().into(),
            _ => {
                let element = self.element();
                element.read(&self.window, index * element.bits())
            }
        })
    }

    /// The cached sub-view of a record element.
    pub fn record(&self, index: usize) -> Option<&RecordView<'a>> {
        self.nested.get(index).and_then(Option::as_ref)
    }

    /// Validates and writes element `index`.
    ///
    /// Indices past the end fail with [`Error::IndexOutOfBounds`]; a
    /// zero-length array rejects every write.
    pub fn set<'v>(&self, index: usize, value: impl Into<Value<'v>>) -> Result<()> {
        let length = self.len();
        if index >= length {
            cold_path();
            return Err(Error::IndexOutOfBounds { index, length });
        }
        let element = self.element();
        element.write(
            &self.window,
            index * element.bits(),
            &format!("{}[{index}]", self.name()),
            &value.into(),
        )
    }

    /// Recursive owned snapshot of every element.
    pub fn to_json(&self) -> Snapshot {
        Snapshot::Array(self.iter().map(|value| value.to_json()).collect())
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

impl<'a> FixedSequence<'a> for ArrayView<'a> {
    #[inline]
    fn len(&self) -> usize {
        ArrayView::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Value<'a>> {
        ArrayView::get(self, index)
    }

    #[inline]
    fn set(&self, index: usize, value: Value<'_>) -> Result<()> {
        ArrayView::set(self, index, value)
    }
}

impl<'s, 'a> IntoIterator for &'s ArrayView<'a> {
    type Item = Value<'a>;
    type IntoIter = SequenceIter<'s, 'a, ArrayView<'a>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for ArrayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.name()).field(&self.to_json()).finish()
    }
}
