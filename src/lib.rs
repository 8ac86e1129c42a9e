//! Typed, bounds-checked, zero-copy views of bit-packed binary records.
//!
//! Declare a record layout once, then bind it to any region of a borrowed
//! byte buffer. Fields are read from and written to the buffer directly, in
//! big-endian order, with every write validated against the field's domain.
//!
//! ```
//! use bitrec::{define_array_record, define_object_record, RecordOptions, TypeToken, Value};
//!
//! let pixel = define_object_record(
//!     "Pixel",
//!     [("r", "bit5"), ("g", "bit6"), ("b", "bit5")],
//!     RecordOptions::default(),
//! )
//! .unwrap();
//! let sprite = define_object_record(
//!     "Sprite",
//!     [
//!         ("name", TypeToken::string("utf8", 8)),
//!         ("palette", TypeToken::array(&pixel, 2)),
//!         ("x", "int16".into()),
//!     ],
//!     RecordOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(sprite.byte_length(), 14);
//!
//! let mut bytes = vec![0u8; 14];
//! {
//!     let view = sprite.view(&mut bytes, 0).unwrap();
//!     view.set("name", "ghost").unwrap();
//!     view.set("x", -2).unwrap();
//!
//!     let palette = view.get("palette").unwrap();
//!     let first = palette.as_array().unwrap().get(0).unwrap();
//!     first.as_object().unwrap().set("g", 63).unwrap();
//!
//!     assert_eq!(view.get("name"), Some(Value::String("ghost".into())));
//! }
//! assert_eq!(&bytes[8..10], &[0x07, 0xE0]);
//! assert_eq!(&bytes[12..14], &[0xFF, 0xFE]);
//! ```
//!
//! # Modules
//!
//! - [`Registry`]: accessor and shape memoization, record definition
//! - [`Accessor`]: per-field bit arithmetic and value validation
//! - [`Shape`]: resolved field offsets and lengths
//! - [`ObjectView`] / [`ArrayView`]: bound views; arrays implement [`FixedSequence`]
//! - [`TextEncoder`]: the backend used by string fields

mod accessor;
mod buffer;
mod encoding;
mod error;
mod layout;
mod record;
mod registry;
#[cfg(feature = "serde")]
mod ser;
mod token;
mod util;
mod value;

pub use accessor::*;
pub use buffer::{IntoBuffer, byte_cells};
pub use encoding::*;
pub use error::*;
pub use layout::{FieldDecl, FieldSpec, RecordOptions, Shape, ShapeKind};
pub use record::*;
pub use registry::*;
pub use token::*;
pub(crate) use util::cold_path;
pub use value::*;
