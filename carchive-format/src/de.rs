use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};

use crate::counting::Counting;
use crate::encoding::EncodingProvider;
use crate::header::read_header;
use crate::{Error, LogicalType, Result, Value};

/// A type that can be read from an archive stream.
pub trait Decode: Sized {
    const TYPE: LogicalType;

    fn decode<R: Read, P: EncodingProvider + ?Sized>(
        reader: &mut Counting<R>,
        provider: &P,
    ) -> Result<Self>;
}

macro_rules! decode_fixed {
    ($($ty:ty => $logical:ident, $width:expr, $read:ident;)*) => {
        $(
            impl Decode for $ty {
                const TYPE: LogicalType = LogicalType::$logical;

                fn decode<R: Read, P: EncodingProvider + ?Sized>(
                    reader: &mut Counting<R>,
                    _provider: &P,
                ) -> Result<Self> {
                    let mut buf = [0u8; $width];
                    reader.fill(&mut buf)?;
                    Ok(LittleEndian::$read(&buf))
                }
            }
        )*
    };
}

decode_fixed! {
    u16 => Uint16, 2, read_u16;
    u32 => Uint32, 4, read_u32;
    u64 => Uint64, 8, read_u64;
    i16 => Int16, 2, read_i16;
    i32 => Int32, 4, read_i32;
    i64 => Int64, 8, read_i64;
    f32 => Float32, 4, read_f32;
    f64 => Float64, 8, read_f64;
}

impl Decode for String {
    const TYPE: LogicalType = LogicalType::String;

    fn decode<R: Read, P: EncodingProvider + ?Sized>(
        reader: &mut Counting<R>,
        provider: &P,
    ) -> Result<Self> {
        let start = reader.position();
        let header = read_header(reader, provider)?;

        let payload_offset = reader.position();
        let payload = reader.read_vec(header.byte_count)?;
        let text = header.encoding.decode(&payload, payload_offset)?;

        let end = reader.position();
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            header = header.header_len,
            encoding = header.encoding.name(),
            "deserialized String"
        );

        Ok(text)
    }
}

/// Reads one value of type `ty`.
pub fn decode_value<R: Read, P: EncodingProvider + ?Sized>(
    ty: LogicalType,
    reader: &mut Counting<R>,
    provider: &P,
) -> Result<Value> {
    use LogicalType::*;

    let value = match ty {
        Uint16 => Value::U16(u16::decode(reader, provider)?),
        Uint32 => Value::U32(u32::decode(reader, provider)?),
        Uint64 => Value::U64(u64::decode(reader, provider)?),
        Int16 => Value::I16(i16::decode(reader, provider)?),
        Int32 => Value::I32(i32::decode(reader, provider)?),
        Int64 => Value::I64(i64::decode(reader, provider)?),
        Float32 => Value::F32(f32::decode(reader, provider)?),
        Float64 => Value::F64(f64::decode(reader, provider)?),
        String => Value::String(<std::string::String>::decode(reader, provider)?),
        Unknown => return Err(Error::UnsupportedType(ty)),
    };

    Ok(value)
}
