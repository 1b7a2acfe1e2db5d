use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::counting::Counting;
use crate::encoding::TextEncoding;
use crate::header::{write_header, ESCAPE32};
use crate::{Error, LogicalType, Result, Value};

/// A type that can be written to an archive stream.
pub trait Encode {
    const TYPE: LogicalType;

    fn encode<W: Write>(&self, writer: &mut Counting<W>) -> Result<()>;
}

macro_rules! encode_fixed {
    ($($ty:ty => $logical:ident, $write:ident;)*) => {
        $(
            impl Encode for $ty {
                const TYPE: LogicalType = LogicalType::$logical;

                fn encode<W: Write>(&self, writer: &mut Counting<W>) -> Result<()> {
                    writer.$write::<LittleEndian>(*self)?;
                    Ok(())
                }
            }
        )*
    };
}

encode_fixed! {
    u16 => Uint16, write_u16;
    u32 => Uint32, write_u32;
    u64 => Uint64, write_u64;
    i16 => Int16, write_i16;
    i32 => Int32, write_i32;
    i64 => Int64, write_i64;
    f32 => Float32, write_f32;
    f64 => Float64, write_f64;
}

/// Strings written through [`Encode`] are stored as UTF-16LE.
impl Encode for str {
    const TYPE: LogicalType = LogicalType::String;

    fn encode<W: Write>(&self, writer: &mut Counting<W>) -> Result<()> {
        write_string(writer, self, TextEncoding::Utf16Le)
    }
}

impl Encode for String {
    const TYPE: LogicalType = LogicalType::String;

    fn encode<W: Write>(&self, writer: &mut Counting<W>) -> Result<()> {
        self.as_str().encode(writer)
    }
}

/// Writes `text` in `encoding`, prefixed with its length.
///
/// UTF-16 strings get the unicode marker and a length in code units. Code page strings
/// get a single length in encoded bytes. Nothing is written if the text cannot be
/// encoded or is too long to describe.
pub fn write_string<W: Write>(
    writer: &mut Counting<W>,
    text: &str,
    encoding: TextEncoding,
) -> Result<()> {
    let payload = encoding.encode(text)?;
    let count = match encoding {
        TextEncoding::Utf16Le => payload.len() as u64 / 2,
        TextEncoding::CodePage(_) => payload.len() as u64,
    };
    if count >= ESCAPE32 as u64 {
        return Err(Error::range(
            LogicalType::String,
            format_args!("of length {}", count),
        ));
    }

    let start = writer.position();
    write_header(writer, encoding, payload.len() as u64)?;
    let header_len = writer.position() - start;
    writer.write_all(&payload)?;

    let end = writer.position();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        header = header_len,
        encoding = encoding.name(),
        "serialized String"
    );
    Ok(())
}

/// Writes a value that has already been coerced to its target type.
pub fn encode_value<W: Write>(
    writer: &mut Counting<W>,
    value: &Value,
    encoding: TextEncoding,
) -> Result<()> {
    match value {
        Value::U16(v) => v.encode(writer),
        Value::U32(v) => v.encode(writer),
        Value::U64(v) => v.encode(writer),
        Value::I16(v) => v.encode(writer),
        Value::I32(v) => v.encode(writer),
        Value::I64(v) => v.encode(writer),
        Value::F32(v) => v.encode(writer),
        Value::F64(v) => v.encode(writer),
        Value::String(v) => write_string(writer, v, encoding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

    fn encoded<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut writer = Counting::new(Vec::<u8>::new());
        value.encode(&mut writer).unwrap();
        writer.into_inner()
    }

    fn string(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
        let mut writer = Counting::new(Vec::<u8>::new());
        write_string(&mut writer, text, encoding)?;
        Ok(writer.into_inner())
    }

    #[test]
    fn fixed_width_little_endian() {
        assert_eq!(encoded(&1u16), b"\x01\x00");
        assert_eq!(encoded(&-1i16), b"\xff\xff");
        assert_eq!(encoded(&0x1234_5678u32), b"\x78\x56\x34\x12");
        assert_eq!(encoded(&i64::MIN), b"\x00\x00\x00\x00\x00\x00\x00\x80");
        assert_eq!(encoded(&0.1f32), b"\xcd\xcc\xcc\x3d");
        assert_eq!(encoded(&0.1f64), b"\x9a\x99\x99\x99\x99\x99\xb9\x3f");
    }

    #[test]
    fn code_page_strings() {
        let cp = TextEncoding::CodePage(WINDOWS_1252);
        assert_eq!(string("hello", cp).unwrap(), b"\x05hello");
        assert_eq!(string("", cp).unwrap(), b"\x00");
        assert_eq!(string("café", cp).unwrap(), b"\x04caf\xe9");

        // Length counts encoded bytes, not characters.
        let sjis = string("日本", TextEncoding::CodePage(SHIFT_JIS)).unwrap();
        assert_eq!(sjis[0], 4);
        assert_eq!(sjis.len(), 5);

        let long = "a".repeat(1000);
        let bytes = string(&long, cp).unwrap();
        assert_eq!(&bytes[..3], b"\xff\xe8\x03");
        assert_eq!(&bytes[3..], long.as_bytes());
    }

    #[test]
    fn utf16_strings() {
        assert_eq!(
            encoded("hello"),
            b"\xff\xfe\xff\x05h\x00e\x00l\x00l\x00o\x00"
        );
        assert_eq!(encoded(&String::new()), b"\xff\xfe\xff\x00");

        let long = "x".repeat(300);
        let bytes = encoded(long.as_str());
        assert_eq!(&bytes[..6], b"\xff\xfe\xff\xff\x2c\x01");
        assert_eq!(bytes.len(), 6 + 600);
    }

    #[test]
    fn unmappable_string_writes_nothing() {
        let mut writer = Counting::new(Vec::<u8>::new());
        let err = write_string(&mut writer, "日本", TextEncoding::CodePage(WINDOWS_1252))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmappable);
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn dispatch() {
        let mut writer = Counting::new(Vec::<u8>::new());
        encode_value(&mut writer, &Value::U16(1), TextEncoding::Utf16Le).unwrap();
        encode_value(&mut writer, &Value::I32(-2), TextEncoding::Utf16Le).unwrap();
        encode_value(
            &mut writer,
            &Value::from("ok"),
            TextEncoding::CodePage(WINDOWS_1252),
        )
        .unwrap();
        assert_eq!(
            writer.into_inner(),
            b"\x01\x00\xfe\xff\xff\xff\x02ok"
        );
    }
}
