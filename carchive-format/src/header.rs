//! The variable-width length prefix that precedes every string payload.
//!
//! Small counts are stored inline in one byte. `0xFF` escapes to a 16-bit count, and a
//! 16-bit `0xFFFF` escapes again to a 32-bit count. A 16-bit `0xFFFE` is not a count at
//! all: it marks the string as UTF-16LE, and a second length prefix (counting UTF-16 code
//! units rather than bytes) follows.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::counting::Counting;
use crate::encoding::{EncodingProvider, TextEncoding};
use crate::{Error, LogicalType, Result};

pub const ESCAPE: u8 = 0xFF;
pub const UNICODE_MARKER: u16 = 0xFFFE;
pub const ESCAPE16: u16 = 0xFFFF;
pub const ESCAPE32: u32 = 0xFFFF_FFFF;

/// Bytes written ahead of a UTF-16LE string: the escape byte followed by the marker.
pub const UNICODE_PREFIX: [u8; 3] = [ESCAPE, 0xFE, 0xFF];

/// Decoded length prefix of a single string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringHeader {
    /// Number of payload bytes that follow the header.
    pub byte_count: u64,
    pub encoding: TextEncoding,
    /// Number of bytes the header itself took up.
    pub header_len: u64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    Escape16,
    Escape32 { unicode: bool },
    UnicodeStart,
    UnicodeEscape16,
}

fn read_u8<R: Read>(reader: &mut Counting<R>) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.fill(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut Counting<R>) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.fill(&mut buf)?;
    Ok(LittleEndian::read_u16(&buf))
}

fn read_u32<R: Read>(reader: &mut Counting<R>) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.fill(&mut buf)?;
    Ok(LittleEndian::read_u32(&buf))
}

/// Reads a string length prefix, consulting `provider` when the string turns out to be
/// stored in the default code page.
pub fn read_header<R: Read, P: EncodingProvider + ?Sized>(
    reader: &mut Counting<R>,
    provider: &P,
) -> Result<StringHeader> {
    let start = reader.position();
    let mut state = State::Start;

    let (count, unicode) = loop {
        tracing::trace!(?state, offset = reader.position(), "string header");

        state = match state {
            State::Start => match read_u8(reader)? {
                ESCAPE => State::Escape16,
                n => break (n as u64, false),
            },
            State::Escape16 => match read_u16(reader)? {
                UNICODE_MARKER => State::UnicodeStart,
                ESCAPE16 => State::Escape32 { unicode: false },
                n => break (n as u64, false),
            },
            State::UnicodeStart => match read_u8(reader)? {
                ESCAPE => State::UnicodeEscape16,
                n => break (n as u64, true),
            },
            State::UnicodeEscape16 => match read_u16(reader)? {
                ESCAPE16 => State::Escape32 { unicode: true },
                n => break (n as u64, true),
            },
            State::Escape32 { unicode } => break (read_u32(reader)? as u64, unicode),
        };
    };

    let (byte_count, encoding) = if unicode {
        (count * 2, TextEncoding::Utf16Le)
    } else {
        (
            count,
            TextEncoding::CodePage(provider.preferred_encoding()),
        )
    };

    Ok(StringHeader {
        byte_count,
        encoding,
        header_len: reader.position() - start,
    })
}

/// Writes `count` using the narrowest tier that can hold it.
///
/// The 16-bit tier stops short of `0xFFFE` so a count can never be mistaken for the
/// unicode marker.
pub fn write_length<W: Write>(writer: &mut Counting<W>, count: u64) -> Result<()> {
    if count < ESCAPE as u64 {
        writer.write_u8(count as u8)?;
    } else if count < UNICODE_MARKER as u64 {
        writer.write_u8(ESCAPE)?;
        writer.write_u16::<LittleEndian>(count as u16)?;
    } else if count < ESCAPE32 as u64 {
        writer.write_u8(ESCAPE)?;
        writer.write_u16::<LittleEndian>(ESCAPE16)?;
        writer.write_u32::<LittleEndian>(count as u32)?;
    } else {
        return Err(Error::range(
            LogicalType::String,
            format_args!("of length {}", count),
        ));
    }
    Ok(())
}

/// Writes the full prefix for a payload of `byte_count` bytes in `encoding`.
pub fn write_header<W: Write>(
    writer: &mut Counting<W>,
    encoding: TextEncoding,
    byte_count: u64,
) -> Result<()> {
    match encoding {
        TextEncoding::Utf16Le => {
            writer.write_all(&UNICODE_PREFIX)?;
            write_length(writer, byte_count / 2)
        }
        TextEncoding::CodePage(_) => write_length(writer, byte_count),
    }
}
