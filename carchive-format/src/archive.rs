use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use encoding_rs::Encoding;

use crate::counting::Counting;
use crate::de::{decode_value, Decode};
use crate::encoding::{default_code_page, EncodingProvider, TextEncoding};
use crate::ser::{encode_value, write_string, Encode};
use crate::{Error, LogicalType, Result, Value};

/// Direction an archive was opened in. Fixed for the lifetime of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => f.write_str("read"),
            Mode::Write => f.write_str("write"),
        }
    }
}

/// A handle over one byte stream that reads or writes archive primitives.
///
/// The handle owns the stream; dropping it releases the stream on every exit path.
/// Call [`CArchive::finish`] to flush a write-mode handle and get the stream back.
pub struct CArchive<S, P = &'static Encoding> {
    stream: Counting<S>,
    mode: Mode,
    provider: P,
}

impl<S, P: EncodingProvider> fmt::Debug for CArchive<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CArchive")
            .field("mode", &self.mode)
            .field("position", &self.stream.position())
            .field("default_encoding", &self.provider.preferred_encoding().name())
            .finish_non_exhaustive()
    }
}

impl<S> CArchive<S> {
    /// Wraps `stream`, reading unmarked strings as windows-1252.
    pub fn new(stream: S, mode: Mode) -> Self {
        CArchive::with_provider(stream, mode, default_code_page())
    }

    pub fn reader(stream: S) -> Self {
        CArchive::new(stream, Mode::Read)
    }

    pub fn writer(stream: S) -> Self {
        CArchive::new(stream, Mode::Write)
    }
}

impl CArchive<BufReader<File>> {
    /// Opens the archive at `path` for reading.
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(CArchive::reader(BufReader::new(file)))
    }
}

impl CArchive<BufWriter<File>> {
    /// Creates (or truncates) the archive at `path` for writing.
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(CArchive::writer(BufWriter::new(file)))
    }
}

impl<S, P: EncodingProvider> CArchive<S, P> {
    /// Wraps `stream`, asking `provider` for the code page of every unmarked string read.
    pub fn with_provider(stream: S, mode: Mode, provider: P) -> Self {
        CArchive {
            stream: Counting::new(stream),
            mode,
            provider,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of bytes read or written through this handle so far.
    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    /// Returns the stream without flushing it.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    fn expect_mode(&self, expected: Mode) -> Result<()> {
        if self.mode != expected {
            return Err(Error::Mode {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }
}

impl<S: Read, P: EncodingProvider> CArchive<S, P> {
    /// Reads one value of type `ty`.
    pub fn read(&mut self, ty: LogicalType) -> Result<Value> {
        self.expect_mode(Mode::Read)?;
        decode_value(ty, &mut self.stream, &self.provider)
    }

    /// Reads one value as the Rust type `T`.
    pub fn read_as<T: Decode>(&mut self) -> Result<T> {
        self.expect_mode(Mode::Read)?;
        T::decode(&mut self.stream, &self.provider)
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.read_as()
    }
}

impl<S: Write, P: EncodingProvider> CArchive<S, P> {
    /// Writes `value` as type `ty`, storing strings as UTF-16LE. Returns the number of
    /// bytes written.
    pub fn write<V: Into<Value>>(&mut self, ty: LogicalType, value: V) -> Result<usize> {
        self.write_with_encoding(ty, value, TextEncoding::Utf16Le)
    }

    /// Writes `value` as type `ty`, storing strings in `encoding`.
    ///
    /// Integers outside the range of `ty` are rejected, never wrapped.
    pub fn write_with_encoding<V: Into<Value>>(
        &mut self,
        ty: LogicalType,
        value: V,
        encoding: TextEncoding,
    ) -> Result<usize> {
        self.expect_mode(Mode::Write)?;
        if ty == LogicalType::Unknown {
            return Err(Error::UnsupportedType(ty));
        }

        let value = value.into().coerce(ty)?;
        let start = self.stream.position();
        encode_value(&mut self.stream, &value, encoding)?;
        Ok((self.stream.position() - start) as usize)
    }

    /// Writes `value` using its own logical type.
    pub fn write_as<T: Encode + ?Sized>(&mut self, value: &T) -> Result<usize> {
        self.expect_mode(Mode::Write)?;
        let start = self.stream.position();
        value.encode(&mut self.stream)?;
        Ok((self.stream.position() - start) as usize)
    }

    pub fn write_str(&mut self, text: &str, encoding: TextEncoding) -> Result<usize> {
        self.expect_mode(Mode::Write)?;
        let start = self.stream.position();
        write_string(&mut self.stream, text, encoding)?;
        Ok((self.stream.position() - start) as usize)
    }

    /// Flushes the stream and hands it back.
    pub fn finish(mut self) -> Result<S> {
        self.stream.flush()?;
        tracing::debug!(bytes = self.stream.position(), "finished archive");
        Ok(self.stream.into_inner())
    }
}
