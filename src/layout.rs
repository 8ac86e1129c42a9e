//! Shapes: the resolved, immutable layout of a record.
//!
//! The layout pass walks the declared fields in order with a bit cursor
//! starting at 0. A skip advances the cursor without emitting a field; a real
//! field resolves its accessor, takes `bit_offset = cursor`, and advances the
//! cursor by the accessor's width. Only bit accessors may land on an offset
//! that is not a multiple of 8.

use std::{collections::HashSet, sync::Arc};

use crate::{
    Accessor, Error, Registry, Result, TypeToken, cold_path,
    util::{is_identifier, is_pascal_case, is_reserved},
};

/// One declared field: a name bound to an accessor at a fixed bit offset.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    name: String,
    accessor: Arc<Accessor>,
    bit_offset: usize,
}

impl FieldSpec {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn accessor(&self) -> &Arc<Accessor> {
        &self.accessor
    }

    /// Bit offset from the start of the record.
    #[inline]
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }
}

#[derive(Clone, Debug)]
pub enum ShapeKind {
    Object(Vec<FieldSpec>),
    Array {
        element: Arc<Accessor>,
        length: usize,
    },
}

/// The resolved layout of a record type.
///
/// Shapes are memoized by their [`key`](Shape::key) in the defining
/// [`Registry`], so structurally identical declarations share one `Arc<Shape>`.
#[derive(Debug)]
pub struct Shape {
    name: String,
    key: String,
    kind: ShapeKind,
    bit_length: usize,
    byte_length: usize,
}

impl Shape {
    pub(crate) fn object(name: String, fields: Vec<FieldSpec>, bit_length: usize) -> Self {
        let signature = fields
            .iter()
            .map(|field| format!("{}:{}@{}", field.name, field.accessor.key(), field.bit_offset))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            key: format!("{name}{{{signature}}}/{bit_length}"),
            name,
            kind: ShapeKind::Object(fields),
            bit_length,
            byte_length: bit_length.div_ceil(8),
        }
    }

    pub(crate) fn array(element: Arc<Accessor>, length: usize) -> Result<Self> {
        let name = format!("{}${length}", element.name());
        let Some(bit_length) = element.bits().checked_mul(length) else {
            cold_path();
            return Err(Error::LayoutTooLarge { record: name });
        };
        Ok(Self {
            name,
            key: Self::array_key(&element, length),
            kind: ShapeKind::Array { element, length },
            bit_length,
            byte_length: bit_length.div_ceil(8),
        })
    }

    pub(crate) fn array_key(element: &Accessor, length: usize) -> String {
        format!("{}${length}", element.key())
    }

    /// The record name, or `element$length` for arrays.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical memoization key over the field/accessor/offset composition.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Declared fields of an object shape. Empty for arrays.
    pub fn fields(&self) -> &[FieldSpec] {
        match &self.kind {
            ShapeKind::Object(fields) => fields,
            ShapeKind::Array { .. } => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().iter().find(|field| field.name == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|field| field.name == name)
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// `ceil(bit_length / 8)`
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }
}

/// Options for [`Registry::define_object_record`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Total bit length. Pads the record when larger than its fields; an
    /// error when smaller.
    pub bit_length: Option<usize>,
}

impl RecordOptions {
    pub const fn bit_length(bit_length: usize) -> Self {
        Self {
            bit_length: Some(bit_length),
        }
    }
}

/// One entry of a record declaration.
#[derive(Clone, Debug)]
pub enum FieldDecl {
    Field { name: String, token: TypeToken },
    /// Advances the cursor by this many bits without declaring a field.
    Skip(usize),
}

impl FieldDecl {
    pub fn field(name: impl Into<String>, token: impl Into<TypeToken>) -> Self {
        FieldDecl::Field {
            name: name.into(),
            token: token.into(),
        }
    }

    pub const fn skip(bits: usize) -> Self {
        FieldDecl::Skip(bits)
    }
}

impl<N: Into<String>, T: Into<TypeToken>> From<(N, T)> for FieldDecl {
    #[inline]
    fn from((name, token): (N, T)) -> Self {
        FieldDecl::field(name, token)
    }
}

/// Runs the layout pass for an object record.
pub(crate) fn layout_object(
    registry: &Registry,
    name: &str,
    decls: Vec<FieldDecl>,
    options: RecordOptions,
) -> Result<Shape> {
    if !is_pascal_case(name) {
        cold_path();
        return Err(Error::InvalidRecordName(name.to_owned()));
    }

    let mut cursor = 0usize;
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(decls.len());
    for decl in decls {
        let (field, token) = match decl {
            FieldDecl::Skip(bits) => {
                cursor = advance(name, cursor, bits)?;
                continue;
            }
            FieldDecl::Field { name, token } => (name, token),
        };

        if !is_identifier(&field) {
            cold_path();
            return Err(Error::InvalidFieldName {
                record: name.to_owned(),
                field,
            });
        }
        if is_reserved(&field) {
            cold_path();
            return Err(Error::ReservedFieldName {
                record: name.to_owned(),
                field,
            });
        }
        if !seen.insert(field.clone()) {
            cold_path();
            return Err(Error::DuplicateField {
                record: name.to_owned(),
                field,
            });
        }

        let accessor = registry.accessor(&token)?;
        if accessor.requires_alignment() && cursor % 8 != 0 {
            cold_path();
            return Err(Error::MisalignedField {
                record: name.to_owned(),
                field,
                accessor: accessor.name().to_owned(),
                bit_offset: cursor,
            });
        }

        let bits = accessor.bits();
        fields.push(FieldSpec {
            name: field,
            accessor,
            bit_offset: cursor,
        });
        cursor = advance(name, cursor, bits)?;
    }

    let bit_length = match options.bit_length {
        Some(declared) if declared < cursor => {
            cold_path();
            return Err(Error::BitLengthTooSmall {
                record: name.to_owned(),
                declared,
                required: cursor,
            });
        }
        Some(declared) => declared,
        None => cursor,
    };

    Ok(Shape::object(name.to_owned(), fields, bit_length))
}

fn advance(record: &str, cursor: usize, bits: usize) -> Result<usize> {
    cursor.checked_add(bits).ok_or_else(|| {
        cold_path();
        Error::LayoutTooLarge {
            record: record.to_owned(),
        }
    })
}
