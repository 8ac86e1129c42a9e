//! Record types and the views they bind to byte buffers.
//!
//! A record type wraps a memoized [`Shape`]. Calling `view(buffer, byte_offset)`
//! validates the window once and returns a view whose getters and setters go
//! straight to the borrowed bytes. Nested record fields are bound eagerly when
//! the parent view is built and handed out from that cache afterwards.

use std::{cell::Cell, sync::Arc};

use crate::{
    IntoBuffer, Result, Snapshot,
    buffer::Window,
    layout::{Shape, ShapeKind},
};

mod array;
mod object;
mod sequence;

pub use array::*;
pub use object::*;
pub use sequence::*;

/// Either kind of record type. Usable wherever a nested type token is expected.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordType {
    Object(ObjectRecordType),
    Array(ArrayRecordType),
}

impl RecordType {
    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        match self {
            RecordType::Object(record) => record.shape(),
            RecordType::Array(record) => record.shape(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.shape().name()
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.shape().bit_length()
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.shape().byte_length()
    }

    pub fn view<'a>(&self, buffer: impl IntoBuffer<'a>, byte_offset: usize) -> Result<RecordView<'a>> {
        let window = Window::new(buffer.into_buffer(), byte_offset, self.byte_length())?;
        Ok(RecordView::bind(self.shape(), window))
    }
}

impl From<ObjectRecordType> for RecordType {
    #[inline]
    fn from(record: ObjectRecordType) -> Self {
        RecordType::Object(record)
    }
}

impl From<ArrayRecordType> for RecordType {
    #[inline]
    fn from(record: ArrayRecordType) -> Self {
        RecordType::Array(record)
    }
}

/// A bound view of either kind.
#[derive(Clone, Debug)]
pub enum RecordView<'a> {
    Object(ObjectView<'a>),
    Array(ArrayView<'a>),
}

impl<'a> RecordView<'a> {
    pub(crate) fn bind(shape: &Arc<Shape>, window: Window<'a>) -> Self {
        match shape.kind() {
            ShapeKind::Object(_) => RecordView::Object(ObjectView::bind(shape.clone(), window)),
            ShapeKind::Array { .. } => RecordView::Array(ArrayView::bind(shape.clone(), window)),
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectView<'a>> {
        match self {
            RecordView::Object(view) => Some(view),
            RecordView::Array(_) => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&ArrayView<'a>> {
        match self {
            RecordView::Array(view) => Some(view),
            RecordView::Object(_) => None,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        match self {
            RecordView::Object(view) => view.shape(),
            RecordView::Array(view) => view.shape(),
        }
    }

    #[inline]
    pub fn raw_bytes(&self) -> &'a [Cell<u8>] {
        match self {
            RecordView::Object(view) => view.raw_bytes(),
            RecordView::Array(view) => view.raw_bytes(),
        }
    }

    pub fn to_json(&self) -> Snapshot {
        match self {
            RecordView::Object(view) => view.to_json(),
            RecordView::Array(view) => view.to_json(),
        }
    }
}
