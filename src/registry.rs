//! Accessor and shape memoization, and the record definition entry points.
//!
//! A [`Registry`] maps type tokens to singleton [`Accessor`]s and canonical
//! shape keys to singleton [`Shape`]s. Tables only grow; insertion takes the
//! write lock and keeps whichever entry got there first, so concurrent first
//! use converges on one representative per key.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;

use crate::{
    Accessor, ArrayRecordType, Error, FieldDecl, ObjectRecordType, RecordOptions, RecordType,
    Result, StandardTextEncoder, TextEncoder, TypeToken, cold_path,
    layout::{Shape, layout_object},
};

/// Definition context: the installed text encoder plus the memo tables.
pub struct Registry {
    text_encoder: Option<Arc<dyn TextEncoder>>,
    accessors: RwLock<HashMap<String, Arc<Accessor>>>,
    shapes: RwLock<HashMap<String, Arc<Shape>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("text_encoder", &self.text_encoder.is_some())
            .field("accessors", &self.accessors.read().len())
            .field("shapes", &self.shapes.read().len())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry without a text encoder. Declaring a string field fails.
    pub fn new() -> Self {
        Self {
            text_encoder: None,
            accessors: RwLock::new(HashMap::new()),
            shapes: RwLock::new(HashMap::new()),
        }
    }

    /// A registry that resolves string fields through `encoder`.
    pub fn with_text_encoder(encoder: impl TextEncoder + 'static) -> Self {
        Self::with_shared_text_encoder(Arc::new(encoder))
    }

    /// Like [`with_text_encoder`](Registry::with_text_encoder), sharing an
    /// encoder between registries.
    pub fn with_shared_text_encoder(encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            text_encoder: Some(encoder),
            ..Self::new()
        }
    }

    /// The process-wide registry behind [`define_object_record`] and
    /// [`define_array_record`], with [`StandardTextEncoder`] installed.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| Registry::with_text_encoder(StandardTextEncoder))
    }

    #[inline]
    pub fn text_encoder(&self) -> Option<&Arc<dyn TextEncoder>> {
        self.text_encoder.as_ref()
    }

    /// Resolves a type token to its singleton accessor.
    pub fn accessor(&self, token: &TypeToken) -> Result<Arc<Accessor>> {
        match token {
            TypeToken::Keyword(keyword) => {
                let make: fn(u8) -> Accessor;
                let width: u8;
                match keyword.as_str() {
                    "bit1" | "bit2" | "bit3" | "bit4" | "bit5" | "bit6" | "bit7" => {
                        make = Accessor::bit;
                        width = keyword.as_bytes()[3] - b'0';
                    }
                    "int8" | "int16" | "int32" => {
                        make = Accessor::int;
                        width = keyword[3..].parse().unwrap_or_default();
                    }
                    "uint8" | "uint16" | "uint32" => {
                        make = Accessor::uint;
                        width = keyword[4..].parse().unwrap_or_default();
                    }
                    "float32" | "float" => {
                        make = Accessor::float;
                        width = 32;
                    }
                    "float64" | "double" => {
                        make = Accessor::float;
                        width = 64;
                    }
                    _ => {
                        cold_path();
                        return Err(Error::UnknownType(keyword.clone()));
                    }
                }
                let accessor = make(width);
                Ok(self.memo_accessor(accessor.key().to_owned(), || accessor))
            }
            TypeToken::String {
                encoding,
                byte_length,
            } => {
                if *byte_length == 0 {
                    cold_path();
                    return Err(Error::InvalidStringLength {
                        encoding: encoding.clone(),
                        byte_length: *byte_length,
                    });
                }
                let Some(encoder) = &self.text_encoder else {
                    cold_path();
                    return Err(Error::MissingTextEncoder {
                        encoding: encoding.clone(),
                    });
                };
                if !encoder.encoding_exists(encoding) {
                    cold_path();
                    return Err(Error::UnsupportedEncoding(encoding.clone()));
                }
                let accessor = Accessor::string(encoding, *byte_length, encoder.clone())?;
                Ok(self.memo_accessor(accessor.key().to_owned(), || accessor))
            }
            TypeToken::Record(record) => {
                let accessor = Accessor::record(record.clone())?;
                Ok(self.memo_accessor(accessor.key().to_owned(), || accessor))
            }
            TypeToken::Array(element, length) => {
                let record = RecordType::Array(self.define_array_record((**element).clone(), *length)?);
                self.accessor(&TypeToken::Record(record))
            }
        }
    }

    fn memo_accessor(&self, key: String, make: impl FnOnce() -> Accessor) -> Arc<Accessor> {
        if let Some(accessor) = self.accessors.read().get(&key) {
            tracing::trace!(key = %key, "accessor memo hit");
            return accessor.clone();
        }
        self.accessors
            .write()
            .entry(key)
            .or_insert_with_key(|key| {
                let accessor = make();
                tracing::debug!(key = %key, bits = accessor.bits(), "accessor created");
                Arc::new(accessor)
            })
            .clone()
    }

    fn memo_shape(&self, key: String, make: impl FnOnce() -> Shape) -> Arc<Shape> {
        if let Some(shape) = self.shapes.read().get(&key) {
            tracing::trace!(key = %key, "shape memo hit");
            return shape.clone();
        }
        self.shapes
            .write()
            .entry(key)
            .or_insert_with(|| {
                let shape = make();
                tracing::debug!(
                    name = shape.name(),
                    bit_length = shape.bit_length(),
                    byte_length = shape.byte_length(),
                    "shape created"
                );
                Arc::new(shape)
            })
            .clone()
    }

    /// Defines an object record from an ordered field list.
    ///
    /// ```
    /// use bitrec::{FieldDecl, RecordOptions, Registry, StandardTextEncoder, TypeToken};
    ///
    /// let registry = Registry::with_text_encoder(StandardTextEncoder);
    /// let header = registry
    ///     .define_object_record(
    ///         "Header",
    ///         [
    ///             FieldDecl::field("version", "bit4"),
    ///             FieldDecl::field("flags", "bit4"),
    ///             FieldDecl::field("length", "uint16"),
    ///             FieldDecl::field("tag", TypeToken::string("ascii", 4)),
    ///         ],
    ///         RecordOptions::default(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(header.byte_length(), 7);
    /// ```
    pub fn define_object_record<I>(
        &self,
        name: &str,
        fields: I,
        options: RecordOptions,
    ) -> Result<ObjectRecordType>
    where
        I: IntoIterator,
        I::Item: Into<FieldDecl>,
    {
        let decls = fields.into_iter().map(Into::into).collect();
        let shape = layout_object(self, name, decls, options)?;
        Ok(ObjectRecordType::from_shape(
            self.memo_shape(shape.key().to_owned(), || shape),
        ))
    }

    /// Defines a fixed-length array record of `element`.
    pub fn define_array_record(
        &self,
        element: impl Into<TypeToken>,
        length: usize,
    ) -> Result<ArrayRecordType> {
        let element = self.accessor(&element.into())?;
        let shape = Shape::array(element, length)?;
        let shape = self.memo_shape(shape.key().to_owned(), || shape);
        Ok(ArrayRecordType::from_shape(shape))
    }

    /// Starts a builder for an object record.
    pub fn object_record(&self, name: impl Into<String>) -> ObjectRecordBuilder<'_> {
        ObjectRecordBuilder {
            registry: self,
            name: name.into(),
            fields: Vec::new(),
            options: RecordOptions::default(),
        }
    }
}

/// Incremental form of [`Registry::define_object_record`].
///
/// ```
/// use bitrec::Registry;
///
/// let registry = Registry::new();
/// let ty = registry
///     .object_record("Flags")
///     .field("ready", "bit1")
///     .skip(6)
///     .field("error", "bit1")
///     .bit_length(16)
///     .define()
///     .unwrap();
/// assert_eq!(ty.byte_length(), 2);
/// ```
#[must_use]
pub struct ObjectRecordBuilder<'r> {
    registry: &'r Registry,
    name: String,
    fields: Vec<FieldDecl>,
    options: RecordOptions,
}

impl ObjectRecordBuilder<'_> {
    pub fn field(mut self, name: impl Into<String>, token: impl Into<TypeToken>) -> Self {
        self.fields.push(FieldDecl::field(name, token));
        self
    }

    pub fn skip(mut self, bits: usize) -> Self {
        self.fields.push(FieldDecl::Skip(bits));
        self
    }

    pub fn bit_length(mut self, bit_length: usize) -> Self {
        self.options.bit_length = Some(bit_length);
        self
    }

    pub fn define(self) -> Result<ObjectRecordType> {
        self.registry
            .define_object_record(&self.name, self.fields, self.options)
    }
}

/// Defines an object record in the [global](Registry::global) registry.
///
/// ```
/// use bitrec::{define_object_record, RecordOptions};
///
/// let ty = define_object_record("R", [("a", "bit3"), ("b", "bit3")], RecordOptions::default()).unwrap();
/// let mut bytes = [0u8];
/// let view = ty.view(&mut bytes, 0).unwrap();
/// view.set("a", 5).unwrap();
/// view.set("b", 2).unwrap();
/// assert_eq!(view.to_vec(), [0xA8]);
/// ```
pub fn define_object_record<I>(
    name: &str,
    fields: I,
    options: RecordOptions,
) -> Result<ObjectRecordType>
where
    I: IntoIterator,
    I::Item: Into<FieldDecl>,
{
    Registry::global().define_object_record(name, fields, options)
}

/// Defines an array record in the [global](Registry::global) registry.
pub fn define_array_record(element: impl Into<TypeToken>, length: usize) -> Result<ArrayRecordType> {
    Registry::global().define_array_record(element, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_accessors_are_singletons() {
        let registry = Registry::new();
        let a = registry.accessor(&"int16".into()).unwrap();
        let b = registry.accessor(&"int16".into()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let float = registry.accessor(&"float".into()).unwrap();
        let float32 = registry.accessor(&"float32".into()).unwrap();
        assert!(Arc::ptr_eq(&float, &float32));

        let double = registry.accessor(&"double".into()).unwrap();
        assert_eq!(double.name(), "float64");
        assert_eq!(double.bits(), 64);
    }

    #[test]
    fn unknown_keywords() {
        let registry = Registry::new();
        for keyword in ["bit0", "bit8", "int64", "uint", "char", ""] {
            assert_eq!(
                registry.accessor(&keyword.into()).unwrap_err(),
                Error::UnknownType(keyword.to_owned())
            );
        }
    }

    #[test]
    fn bit_widths() {
        let registry = Registry::new();
        for width in 1..=7u8 {
            let accessor = registry.accessor(&format!("bit{width}").into()).unwrap();
            assert_eq!(accessor.bits(), width as usize);
            assert!(!accessor.requires_alignment());
        }
    }

    #[test]
    fn array_shapes_are_memoized() {
        let registry = Registry::new();
        let a = registry.define_array_record("int16", 2).unwrap();
        let b = registry.define_array_record("int16", 2).unwrap();
        assert!(Arc::ptr_eq(a.shape(), b.shape()));
        assert_eq!(a.name(), "int16$2");
    }
}
