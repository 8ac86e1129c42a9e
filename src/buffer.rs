//! Borrowed byte buffers and the bounds-checked window a view is bound to.
//!
//! Views never own memory. They borrow `&'a [Cell<u8>]`, which lets any number
//! of views alias the same bytes while still allowing writes: a write through
//! one view is immediately visible through every other view of that memory.
//! `Cell` is `!Sync`, so aliasing views cannot be shared across threads.

use std::cell::Cell;

use zerocopy::{BigEndian, byteorder};

use crate::{Error, Result, cold_path};

/// Reinterprets a mutable byte slice as aliasable cells.
///
/// Use this when several views should share one buffer:
///
/// ```
/// use bitrec::{byte_cells, define_array_record};
///
/// let ty = define_array_record("uint8", 2).unwrap();
/// let mut bytes = [0u8; 3];
/// let cells = byte_cells(&mut bytes);
///
/// let a = ty.view(cells, 0).unwrap();
/// let b = ty.view(cells, 1).unwrap();
/// a.set(1, 7).unwrap();
/// assert_eq!(b.get(0).unwrap().as_i64(), Some(7));
/// ```
#[inline]
pub fn byte_cells(bytes: &mut [u8]) -> &[Cell<u8>] {
    Cell::from_mut(bytes).as_slice_of_cells()
}

/// Conversion into the aliasable byte buffer a view borrows.
pub trait IntoBuffer<'a> {
    fn into_buffer(self) -> &'a [Cell<u8>];
}

impl<'a> IntoBuffer<'a> for &'a [Cell<u8>] {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        self
    }
}

impl<'a, const N: usize> IntoBuffer<'a> for &'a [Cell<u8>; N] {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        self.as_slice()
    }
}

impl<'a> IntoBuffer<'a> for &'a mut [u8] {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        byte_cells(self)
    }
}

impl<'a, const N: usize> IntoBuffer<'a> for &'a mut [u8; N] {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        byte_cells(self.as_mut_slice())
    }
}

impl<'a> IntoBuffer<'a> for &'a mut Vec<u8> {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        byte_cells(self.as_mut_slice())
    }
}

#[cfg(feature = "bytes")]
impl<'a> IntoBuffer<'a> for &'a mut bytes::BytesMut {
    #[inline]
    fn into_buffer(self) -> &'a [Cell<u8>] {
        byte_cells(&mut self[..])
    }
}

/// The `[byte_offset, byte_offset + byte_length)` range of a buffer a view is bound to.
///
/// All offsets taken by the load/store helpers are relative to the window start.
#[derive(Clone, Copy)]
pub(crate) struct Window<'a> {
    bytes: &'a [Cell<u8>],
}

impl<'a> Window<'a> {
    pub(crate) fn new(
        buffer: &'a [Cell<u8>],
        byte_offset: usize,
        byte_length: usize,
    ) -> Result<Self> {
        match byte_offset.checked_add(byte_length) {
            Some(end) if end <= buffer.len() => Ok(Self {
                bytes: &buffer[byte_offset..end],
            }),
            _ => {
                cold_path();
                Err(Error::OutOfBounds {
                    byte_offset,
                    byte_length,
                    buffer_length: buffer.len(),
                })
            }
        }
    }

    /// Narrows the window. Layouts guarantee the range is in bounds.
    #[inline]
    pub(crate) fn sub(&self, byte_offset: usize, byte_length: usize) -> Window<'a> {
        Window {
            bytes: &self.bytes[byte_offset..byte_offset + byte_length],
        }
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &'a [Cell<u8>] {
        self.bytes
    }

    #[inline]
    pub(crate) fn load<const N: usize>(&self, byte_offset: usize) -> [u8; N] {
        let cells = &self.bytes[byte_offset..byte_offset + N];
        std::array::from_fn(|i| cells[i].get())
    }

    #[inline]
    pub(crate) fn store<const N: usize>(&self, byte_offset: usize, bytes: [u8; N]) {
        let cells = &self.bytes[byte_offset..byte_offset + N];
        for (cell, byte) in cells.iter().zip(bytes) {
            cell.set(byte);
        }
    }

    #[inline]
    pub(crate) fn load_u8(&self, byte_offset: usize) -> u8 {
        self.bytes[byte_offset].get()
    }

    #[inline]
    pub(crate) fn store_u8(&self, byte_offset: usize, value: u8) {
        self.bytes[byte_offset].set(value)
    }

    #[inline]
    pub(crate) fn load_u16(&self, byte_offset: usize) -> u16 {
        byteorder::U16::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_u16(&self, byte_offset: usize, value: u16) {
        self.store(byte_offset, byteorder::U16::<BigEndian>::new(value).to_bytes())
    }

    #[inline]
    pub(crate) fn load_i16(&self, byte_offset: usize) -> i16 {
        byteorder::I16::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_i16(&self, byte_offset: usize, value: i16) {
        self.store(byte_offset, byteorder::I16::<BigEndian>::new(value).to_bytes())
    }

    #[inline]
    pub(crate) fn load_u32(&self, byte_offset: usize) -> u32 {
        byteorder::U32::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_u32(&self, byte_offset: usize, value: u32) {
        self.store(byte_offset, byteorder::U32::<BigEndian>::new(value).to_bytes())
    }

    #[inline]
    pub(crate) fn load_i32(&self, byte_offset: usize) -> i32 {
        byteorder::I32::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_i32(&self, byte_offset: usize, value: i32) {
        self.store(byte_offset, byteorder::I32::<BigEndian>::new(value).to_bytes())
    }

    #[inline]
    pub(crate) fn load_f32(&self, byte_offset: usize) -> f32 {
        byteorder::F32::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_f32(&self, byte_offset: usize, value: f32) {
        self.store(byte_offset, byteorder::F32::<BigEndian>::new(value).to_bytes())
    }

    #[inline]
    pub(crate) fn load_f64(&self, byte_offset: usize) -> f64 {
        byteorder::F64::<BigEndian>::from_bytes(self.load(byte_offset)).get()
    }

    #[inline]
    pub(crate) fn store_f64(&self, byte_offset: usize, value: f64) {
        self.store(byte_offset, byteorder::F64::<BigEndian>::new(value).to_bytes())
    }

    pub(crate) fn to_vec(&self) -> Vec<u8> {
        self.bytes.iter().map(Cell::get).collect()
    }
}
