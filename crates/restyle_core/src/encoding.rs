//! Character encodings accepted by the reader and writer.
//!
//! Labels are looked up in the WHATWG Encoding Standard registry through
//! `encoding_rs`. The standard has no UTF-16 encoder (its encoders fall back
//! to UTF-8), so both UTF-16 byte orders are encoded here directly. No BOM is
//! ever added or removed: a leading U+FEFF in the text is encoded like any
//! other character, and decoding keeps it in the text.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

use crate::error::{ResourceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Any other single- or multi-byte encoding with its own encoder
    Legacy(&'static Encoding),
}

impl TextEncoding {
    /// Look up an encoding by label, e.g. `utf-8`, `UTF_8`, `utf-16be`, `latin1`.
    pub fn for_label(label: &str) -> Result<Self> {
        let normalized = label.trim().replace('_', "-");
        let encoding = Encoding::for_label(normalized.as_bytes())
            .ok_or_else(|| ResourceError::encoding(label, "unknown encoding"))?;

        if encoding == UTF_8 {
            Ok(TextEncoding::Utf8)
        } else if encoding == UTF_16LE {
            Ok(TextEncoding::Utf16Le)
        } else if encoding == UTF_16BE {
            Ok(TextEncoding::Utf16Be)
        } else if encoding.output_encoding() == encoding {
            Ok(TextEncoding::Legacy(encoding))
        } else {
            // e.g. the "replacement" encoding, which can only decode
            Err(ResourceError::encoding(label, "encoding cannot be used for output"))
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_encoding().name()
    }

    fn as_encoding(&self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::Utf16Be => UTF_16BE,
            TextEncoding::Legacy(encoding) => *encoding,
        }
    }

    /// Encode `text` to bytes. Fails rather than substituting characters the
    /// encoding cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        match self {
            TextEncoding::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
            TextEncoding::Utf16Le => {
                Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()))
            }
            TextEncoding::Utf16Be => {
                Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()))
            }
            TextEncoding::Legacy(encoding) => {
                let (bytes, _, had_unmappable) = encoding.encode(text);
                if had_unmappable {
                    let ch = text
                        .chars()
                        .find(|c| encoding.encode(c.encode_utf8(&mut [0; 4])).2)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    return Err(ResourceError::encoding(
                        encoding.name(),
                        format!("character {:?} (U+{:04X}) cannot be encoded", ch, ch as u32),
                    ));
                }
                Ok(bytes)
            }
        }
    }

    /// Decode `bytes` without BOM sniffing or stripping. Malformed input is an
    /// error.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        let encoding = self.as_encoding();
        encoding.decode_without_bom_handling_and_without_replacement(bytes).ok_or_else(|| {
            ResourceError::encoding(encoding.name(), "input is not valid in this encoding")
        })
    }
}
