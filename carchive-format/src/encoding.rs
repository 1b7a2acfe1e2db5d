use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_16LE, WINDOWS_1252};

use crate::{Error, Result};

/// How string payload bytes are interpreted.
///
/// Strings are either stored as UTF-16LE (flagged on the wire by the unicode marker) or in
/// a legacy code page that the reader has to know about out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Le,
    CodePage(&'static Encoding),
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf16Le
    }
}

impl TextEncoding {
    /// Looks up an encoding by its WHATWG label, e.g. `windows-1252`, `shift_jis` or `utf-16le`.
    pub fn for_label(label: &str) -> Result<TextEncoding> {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utf-16le" | "utf-16-le" | "utf16le" | "utf-16" | "unicode" => {
                return Ok(TextEncoding::Utf16Le)
            }
            _ => {}
        }

        let encoding = Encoding::for_label(trimmed.as_bytes())
            .ok_or_else(|| Error::UnsupportedEncoding(trimmed.to_string()))?;
        TextEncoding::from_encoding(encoding)
            .ok_or_else(|| Error::UnsupportedEncoding(trimmed.to_string()))
    }

    /// Wraps an `encoding_rs` encoding. Returns `None` for encodings that cannot be
    /// produced by an encoder (UTF-16BE and `replacement`).
    pub fn from_encoding(encoding: &'static Encoding) -> Option<TextEncoding> {
        if encoding == UTF_16LE {
            return Some(TextEncoding::Utf16Le);
        }
        if encoding.output_encoding() != encoding {
            return None;
        }
        Some(TextEncoding::CodePage(encoding))
    }

    pub fn is_utf16(self) -> bool {
        self == TextEncoding::Utf16Le
    }

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf16Le => UTF_16LE.name(),
            TextEncoding::CodePage(encoding) => encoding.name(),
        }
    }

    /// Encodes `text` into payload bytes. Characters the code page cannot represent are
    /// an error rather than being replaced.
    pub fn encode<'a>(self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        match self {
            TextEncoding::Utf16Le => Ok(Cow::Owned(
                text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect(),
            )),
            TextEncoding::CodePage(encoding) => {
                let (bytes, used, had_errors) = encoding.encode(text);
                if used != encoding {
                    return Err(Error::UnsupportedEncoding(encoding.name().to_string()));
                }
                if had_errors {
                    return Err(Error::Unmappable(encoding.name()));
                }
                Ok(bytes)
            }
        }
    }

    /// Decodes payload bytes. `offset` is the stream position of the payload, reported
    /// on malformed input.
    pub fn decode(self, bytes: &[u8], offset: u64) -> Result<String> {
        let encoding = match self {
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::CodePage(encoding) => encoding,
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or(Error::Decode {
                encoding: encoding.name(),
                offset,
            })
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supplies the code page for strings that carry no unicode marker.
///
/// Consulted once for every string read that resolves to the default encoding, so a
/// provider may change its answer between reads.
pub trait EncodingProvider {
    fn preferred_encoding(&self) -> &'static Encoding;
}

impl EncodingProvider for &'static Encoding {
    fn preferred_encoding(&self) -> &'static Encoding {
        *self
    }
}

impl<F> EncodingProvider for F
where
    F: Fn() -> &'static Encoding,
{
    fn preferred_encoding(&self) -> &'static Encoding {
        self()
    }
}

/// The ANSI code page of Western-European Windows installs, where most MFC archives come from.
pub fn default_code_page() -> &'static Encoding {
    WINDOWS_1252
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use encoding_rs::{SHIFT_JIS, UTF_16BE, UTF_8};

    #[test]
    fn labels() {
        assert_eq!(TextEncoding::for_label("utf-16-le").unwrap(), TextEncoding::Utf16Le);
        assert_eq!(TextEncoding::for_label("UTF-16LE").unwrap(), TextEncoding::Utf16Le);
        assert_eq!(
            TextEncoding::for_label("cp1252").unwrap(),
            TextEncoding::CodePage(WINDOWS_1252)
        );
        assert_eq!(
            TextEncoding::for_label("sjis").unwrap(),
            TextEncoding::CodePage(SHIFT_JIS)
        );
        assert_eq!(
            TextEncoding::for_label(" utf-8 ").unwrap(),
            TextEncoding::CodePage(UTF_8)
        );

        let err = TextEncoding::for_label("utf-16be").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedEncoding);
        let err = TextEncoding::for_label("klingon").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedEncoding);

        assert_eq!(TextEncoding::from_encoding(UTF_16BE), None);
    }

    #[test]
    fn code_pages_without_an_encoder_are_refused() {
        for &encoding in [UTF_16BE, UTF_16LE].iter() {
            let err = TextEncoding::CodePage(encoding).encode("hi").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedEncoding);
        }
        assert_eq!(
            &*TextEncoding::CodePage(UTF_8).encode("hé").unwrap(),
            b"h\xc3\xa9"
        );
    }

    #[test]
    fn utf16_encodes_code_units() {
        let bytes = TextEncoding::Utf16Le.encode("hé").unwrap();
        assert_eq!(&*bytes, b"h\x00\xe9\x00");

        let bytes = TextEncoding::Utf16Le.encode("\u{1F600}").unwrap();
        assert_eq!(&*bytes, b"\x3d\xd8\x00\xde");
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes, 0).unwrap(), "\u{1F600}");
    }

    #[test]
    fn code_page_round_trip() {
        let cp = TextEncoding::CodePage(WINDOWS_1252);
        let bytes = cp.encode("café").unwrap();
        assert_eq!(&*bytes, b"caf\xe9");
        assert_eq!(cp.decode(&bytes, 0).unwrap(), "café");
    }

    #[test]
    fn unmappable_and_malformed() {
        let cp = TextEncoding::CodePage(WINDOWS_1252);
        assert_eq!(cp.encode("日本").unwrap_err().kind(), ErrorKind::Unmappable);

        let err = TextEncoding::CodePage(UTF_8).decode(b"\xc3", 12).unwrap_err();
        match err {
            Error::Decode { encoding, offset } => {
                assert_eq!(encoding, "UTF-8");
                assert_eq!(offset, 12);
            }
            e => panic!("unexpected {:?}", e),
        }

        // Unpaired high surrogate.
        let err = TextEncoding::Utf16Le.decode(b"\x3d\xd8", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn providers() {
        fn resolve<P: EncodingProvider>(p: P) -> &'static Encoding {
            p.preferred_encoding()
        }

        assert_eq!(resolve(default_code_page()), WINDOWS_1252);
        assert_eq!(resolve(|| SHIFT_JIS), SHIFT_JIS);
    }
}
