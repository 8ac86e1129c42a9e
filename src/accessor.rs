//! Per-field read/write logic.
//!
//! An [`Accessor`] knows how to read and write one kind of field at any bit
//! offset inside a [`Window`]. Accessors are created once by the
//! [`Registry`](crate::Registry) and shared by every field and array element
//! of that kind, so two declarations of `"int16"` yield the same `Arc`.

use std::{fmt, sync::Arc};

use crate::{
    Error, RecordType, RecordView, Result, TextEncoder, Value, buffer::Window, cold_path,
};

/// The variant of an [`Accessor`].
#[derive(Clone)]
pub enum AccessorKind {
    /// An unsigned sub-byte field of 1 to 7 bits. May start at any bit.
    Bit(u8),
    /// A signed big-endian integer of 8, 16 or 32 bits.
    Int(u8),
    /// An unsigned big-endian integer of 8, 16 or 32 bits.
    Uint(u8),
    /// An IEEE-754 big-endian float of 32 or 64 bits.
    Float(u8),
    /// A zero-terminated string of at most `byte_length` encoded bytes.
    String {
        encoding: String,
        byte_length: usize,
        encoder: Arc<dyn TextEncoder>,
    },
    /// A nested record. Read-only: only its own fields can be written.
    Record(RecordType),
}

impl fmt::Debug for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKind::Bit(bits) => f.debug_tuple("Bit").field(bits).finish(),
            AccessorKind::Int(bits) => f.debug_tuple("Int").field(bits).finish(),
            AccessorKind::Uint(bits) => f.debug_tuple("Uint").field(bits).finish(),
            AccessorKind::Float(bits) => f.debug_tuple("Float").field(bits).finish(),
            AccessorKind::String {
                encoding,
                byte_length,
                ..
            } => f
                .debug_struct("String")
                .field("encoding", encoding)
                .field("byte_length", byte_length)
                .finish_non_exhaustive(),
            AccessorKind::Record(record) => f.debug_tuple("Record").field(&record.name()).finish(),
        }
    }
}

/// Placement of a sub-byte field inside its 8- or 16-bit storage unit.
///
/// A field that fits in the byte holding its first bit uses an 8-bit unit;
/// one that straddles into the next byte uses a 16-bit big-endian unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BitPlacement {
    pub byte_offset: usize,
    pub storage_bits: u8,
    pub shift: u32,
    pub mask: u16,
}

impl BitPlacement {
    pub const fn new(bit_offset: usize, width: u8) -> Self {
        let in_byte = (bit_offset % 8) as u32;
        let width = width as u32;
        let storage_bits: u8 = if in_byte + width <= 8 { 8 } else { 16 };
        let shift = storage_bits as u32 - (in_byte + width);
        Self {
            byte_offset: bit_offset >> 3,
            storage_bits,
            shift,
            mask: (((1u32 << width) - 1) << shift) as u16,
        }
    }

    #[inline]
    fn load(&self, window: &Window<'_>) -> u16 {
        if self.storage_bits == 8 {
            u16::from(window.load_u8(self.byte_offset))
        } else {
            window.load_u16(self.byte_offset)
        }
    }

    #[inline]
    fn store(&self, window: &Window<'_>, unit: u16) {
        if self.storage_bits == 8 {
            window.store_u8(self.byte_offset, unit as u8)
        } else {
            window.store_u16(self.byte_offset, unit)
        }
    }

    #[inline]
    pub(crate) fn read(&self, window: &Window<'_>) -> u16 {
        (self.load(window) & self.mask) >> self.shift
    }

    #[inline]
    pub(crate) fn write(&self, window: &Window<'_>, value: u16) {
        let unit = self.load(window);
        self.store(window, (unit & !self.mask) | ((value << self.shift) & self.mask));
    }
}

/// Read/write logic for one kind of field.
pub struct Accessor {
    name: String,
    key: String,
    kind: AccessorKind,
    bits: usize,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bits", &self.bits)
            .finish()
    }
}

impl Accessor {
    pub(crate) fn bit(width: u8) -> Self {
        Self::scalar(format!("bit{width}"), AccessorKind::Bit(width), width as usize)
    }

    pub(crate) fn int(width: u8) -> Self {
        Self::scalar(format!("int{width}"), AccessorKind::Int(width), width as usize)
    }

    pub(crate) fn uint(width: u8) -> Self {
        Self::scalar(format!("uint{width}"), AccessorKind::Uint(width), width as usize)
    }

    pub(crate) fn float(width: u8) -> Self {
        Self::scalar(format!("float{width}"), AccessorKind::Float(width), width as usize)
    }

    fn scalar(name: String, kind: AccessorKind, bits: usize) -> Self {
        Self {
            key: name.clone(),
            name,
            kind,
            bits,
        }
    }

    pub(crate) fn string(
        encoding: &str,
        byte_length: usize,
        encoder: Arc<dyn TextEncoder>,
    ) -> Result<Self> {
        let name = Self::string_key(encoding, byte_length);
        let Some(bits) = byte_length.checked_mul(8) else {
            cold_path();
            return Err(Error::LayoutTooLarge { record: name });
        };
        Ok(Self::scalar(
            name,
            AccessorKind::String {
                encoding: encoding.to_owned(),
                byte_length,
                encoder,
            },
            bits,
        ))
    }

    pub(crate) fn string_key(encoding: &str, byte_length: usize) -> String {
        format!("string({encoding}:{byte_length})")
    }

    /// Nested records always occupy whole bytes.
    pub(crate) fn record(record: RecordType) -> Result<Self> {
        let Some(bits) = record.byte_length().checked_mul(8) else {
            cold_path();
            return Err(Error::LayoutTooLarge {
                record: record.name().to_owned(),
            });
        };
        Ok(Self {
            name: record.name().to_owned(),
            key: Self::record_key(&record),
            bits,
            kind: AccessorKind::Record(record),
        })
    }

    pub(crate) fn record_key(record: &RecordType) -> String {
        format!("record:{}", record.shape().key())
    }

    /// Display name, e.g. `bit3`, `int16`, `string(utf8:15)`, or the nested record's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity key the registry memoizes this accessor under.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> &AccessorKind {
        &self.kind
    }

    /// Number of bits the field occupies.
    #[inline]
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Only bit accessors may start at an offset that is not a multiple of 8.
    #[inline]
    pub fn requires_alignment(&self) -> bool {
        !matches!(self.kind, AccessorKind::Bit(_))
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, AccessorKind::Record(_))
    }

    /// Inclusive integer domain of bit, int and uint accessors.
    pub fn domain(&self) -> Option<(i64, i64)> {
        match self.kind {
            AccessorKind::Bit(bits) | AccessorKind::Uint(bits) => Some((0, (1i64 << bits) - 1)),
            AccessorKind::Int(bits) => Some((-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)),
            _ => None,
        }
    }

    /// Binds a sub-view for a nested record field.
    pub(crate) fn bind<'a>(&self, window: &Window<'a>, bit_offset: usize) -> Option<RecordView<'a>> {
        match &self.kind {
            AccessorKind::Record(record) => Some(RecordView::bind(
                record.shape(),
                window.sub(bit_offset >> 3, record.byte_length()),
            )),
            _ => None,
        }
    }

    pub(crate) fn read<'a>(&self, window: &Window<'a>, bit_offset: usize) -> Value<'a> {
        let byte_offset = bit_offset >> 3;
        match &self.kind {
            AccessorKind::Bit(width) => {
                Value::Int(i64::from(BitPlacement::new(bit_offset, *width).read(window)))
            }
            AccessorKind::Int(8) => Value::Int(i64::from(window.load_u8(byte_offset) as i8)),
            AccessorKind::Int(16) => Value::Int(i64::from(window.load_i16(byte_offset))),
            AccessorKind::Int(_) => Value::Int(i64::from(window.load_i32(byte_offset))),
            AccessorKind::Uint(8) => Value::Int(i64::from(window.load_u8(byte_offset))),
            AccessorKind::Uint(16) => Value::Int(i64::from(window.load_u16(byte_offset))),
            AccessorKind::Uint(_) => Value::Int(i64::from(window.load_u32(byte_offset))),
            AccessorKind::Float(32) => Value::Float(f64::from(window.load_f32(byte_offset))),
            AccessorKind::Float(_) => Value::Float(window.load_f64(byte_offset)),
            AccessorKind::String {
                encoding,
                byte_length,
                encoder,
            } => {
                let bytes: Vec<u8> = window.bytes()[byte_offset..byte_offset + byte_length]
                    .iter()
                    .map(|cell| cell.get())
                    .take_while(|&byte| byte != 0)
                    .collect();
                Value::String(encoder.decode(&bytes, encoding).into_owned())
            }
            AccessorKind::Record(record) => RecordView::bind(
                record.shape(),
                window.sub(byte_offset, record.byte_length()),
            )
            .into(),
        }
    }

    /// Validates `value` against the field's domain, then writes it.
    ///
    /// Nothing is written when validation fails.
    pub(crate) fn write(
        &self,
        window: &Window<'_>,
        bit_offset: usize,
        field: &str,
        value: &Value<'_>,
    ) -> Result<()> {
        let byte_offset = bit_offset >> 3;
        match &self.kind {
            AccessorKind::Bit(width) => {
                let value = self.checked_integer(field, value)?;
                BitPlacement::new(bit_offset, *width).write(window, value as u16);
            }
            AccessorKind::Int(8) | AccessorKind::Uint(8) => {
                let value = self.checked_integer(field, value)?;
                window.store_u8(byte_offset, value as u8);
            }
            AccessorKind::Int(16) => {
                let value = self.checked_integer(field, value)?;
                window.store_i16(byte_offset, value as i16);
            }
            AccessorKind::Uint(16) => {
                let value = self.checked_integer(field, value)?;
                window.store_u16(byte_offset, value as u16);
            }
            AccessorKind::Int(_) => {
                let value = self.checked_integer(field, value)?;
                window.store_i32(byte_offset, value as i32);
            }
            AccessorKind::Uint(_) => {
                let value = self.checked_integer(field, value)?;
                window.store_u32(byte_offset, value as u32);
            }
            AccessorKind::Float(32) => {
                window.store_f32(byte_offset, number(field, value)? as f32);
            }
            AccessorKind::Float(_) => {
                window.store_f64(byte_offset, number(field, value)?);
            }
            AccessorKind::String {
                encoding,
                byte_length,
                encoder,
            } => {
                let Value::String(text) = value else {
                    cold_path();
                    return Err(Error::NotAString {
                        field: field.to_owned(),
                        actual: value.describe(),
                    });
                };
                let encoded = encoder
                    .encode(text, encoding)
                    .map_err(|message| Error::Encoding {
                        field: field.to_owned(),
                        message,
                    })?;
                if encoded.len() > *byte_length {
                    cold_path();
                    return Err(Error::StringTooLong {
                        field: field.to_owned(),
                        capacity: *byte_length,
                        actual: encoded.len(),
                    });
                }
                let cells = &window.bytes()[byte_offset..byte_offset + byte_length];
                for (i, cell) in cells.iter().enumerate() {
                    cell.set(encoded.get(i).copied().unwrap_or(0));
                }
            }
            AccessorKind::Record(_) => {
                cold_path();
                return Err(Error::ReadOnlyField {
                    field: field.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Returns the value as an integer inside [`Accessor::domain`].
    fn checked_integer(&self, field: &str, value: &Value<'_>) -> Result<i64> {
        let integer = match value {
            Value::Int(value) => Some(*value),
            Value::Float(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            _ => None,
        };
        let Some(integer) = integer else {
            cold_path();
            return Err(Error::NotAnInteger {
                field: field.to_owned(),
                actual: value.describe(),
            });
        };
        // every integer accessor has a domain
        let (min, max) = self.domain().unwrap_or((i64::MIN, i64::MAX));
        if integer < min || integer > max {
            cold_path();
            return Err(Error::OutOfRange {
                field: field.to_owned(),
                min,
                max,
                actual: value.describe(),
            });
        }
        Ok(integer)
    }
}

fn number(field: &str, value: &Value<'_>) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        cold_path();
        Error::NotANumber {
            field: field.to_owned(),
            actual: value.describe(),
        }
    })
}
