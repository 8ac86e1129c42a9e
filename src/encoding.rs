//! Text encoding backends for fixed-capacity string fields.
//!
//! String fields never encode or decode text themselves. They delegate to a
//! [`TextEncoder`] installed on the [`Registry`](crate::Registry) that defines
//! the record. The encoder is consulted once at definition time (to check that
//! the encoding exists) and then on every string read and write.

use std::borrow::Cow;

/// A text encoding backend.
///
/// Implementations must be thread-safe because a registry (and every record
/// type it produces) may be shared between threads.
pub trait TextEncoder: Send + Sync {
    /// Returns `true` if `encoding` names an encoding this backend supports.
    fn encoding_exists(&self, encoding: &str) -> bool;

    /// Encodes `text` to bytes. Returns a human-readable message on failure.
    fn encode<'a>(&self, text: &'a str, encoding: &str) -> Result<Cow<'a, [u8]>, String>;

    /// Decodes `bytes`, which already stop before the first zero byte or at
    /// the field capacity.
    fn decode<'a>(&self, bytes: &'a [u8], encoding: &str) -> Cow<'a, str>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Encoding {
    Utf8,
    Mutf8,
    Ascii,
    Latin1,
}

impl Encoding {
    fn lookup(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(Encoding::Utf8),
            "mutf8" | "mutf-8" => Some(Encoding::Mutf8),
            "ascii" | "us-ascii" => Some(Encoding::Ascii),
            "latin1" | "iso-8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }
}

/// The default [`TextEncoder`].
///
/// Supported encodings (case-insensitive):
///
/// | Name | Notes |
/// |------|-------|
/// | `utf8`, `utf-8` | invalid input decodes to U+FFFD |
/// | `mutf8`, `mutf-8` | Java modified UTF-8; NUL encodes as `C0 80`, so it survives the zero terminator |
/// | `ascii`, `us-ascii` | characters above U+007F are rejected on encode |
/// | `latin1`, `iso-8859-1` | characters above U+00FF are rejected on encode |
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardTextEncoder;

impl TextEncoder for StandardTextEncoder {
    fn encoding_exists(&self, encoding: &str) -> bool {
        Encoding::lookup(encoding).is_some()
    }

    fn encode<'a>(&self, text: &'a str, encoding: &str) -> Result<Cow<'a, [u8]>, String> {
        match Encoding::lookup(encoding) {
            Some(Encoding::Utf8) => Ok(Cow::Borrowed(text.as_bytes())),
            Some(Encoding::Mutf8) => Ok(simd_cesu8::mutf8::encode(text)),
            Some(Encoding::Ascii) => {
                if text.is_ascii() {
                    Ok(Cow::Borrowed(text.as_bytes()))
                } else {
                    Err(format!("{text:?} contains non-ASCII characters"))
                }
            }
            Some(Encoding::Latin1) => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| format!("character {c:?} is not representable in latin1"))
                })
                .collect::<Result<Vec<u8>, String>>()
                .map(Cow::Owned),
            None => Err(format!("unsupported encoding `{encoding}`")),
        }
    }

    fn decode<'a>(&self, bytes: &'a [u8], encoding: &str) -> Cow<'a, str> {
        match Encoding::lookup(encoding) {
            Some(Encoding::Mutf8) => simd_cesu8::mutf8::decode_lossy(bytes),
            Some(Encoding::Latin1) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
            // ascii is a subset of utf8; anything else was rejected at definition time
            _ => String::from_utf8_lossy(bytes),
        }
    }
}
