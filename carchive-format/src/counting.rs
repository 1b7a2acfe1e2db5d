//! Stream wrapper that tracks how many bytes have passed through it.

use std::io::{self, Read, Write};

use crate::{Error, Result};

/// Payload buffers start at most this large and grow as bytes actually arrive, so a
/// corrupt length prefix cannot force a huge allocation up front.
const MAX_PREALLOC: u64 = 64 * 1024;

/// A reader or writer wrapper that counts bytes moved through it.
///
/// The count doubles as the stream offset reported in errors and logs, relative to
/// where the stream was when it was wrapped.
#[derive(Debug)]
pub struct Counting<S> {
    inner: S,
    position: u64,
}

impl<S> Counting<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, position: 0 }
    }

    /// Total number of bytes read or written through this wrapper.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<R: Read> Counting<R> {
    /// Fills `buf` completely or fails with [`Error::TruncatedStream`]. Bytes read before
    /// the stream ran dry stay consumed.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.position;
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::TruncatedStream {
                        offset: start,
                        expected: buf.len() as u64,
                        actual: filled as u64,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Reads exactly `len` bytes into a fresh buffer.
    pub fn read_vec(&mut self, len: u64) -> Result<Vec<u8>> {
        let start = self.position;
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
        self.by_ref().take(len).read_to_end(&mut buf)?;

        if (buf.len() as u64) < len {
            return Err(Error::TruncatedStream {
                offset: start,
                expected: len,
                actual: buf.len() as u64,
            });
        }
        Ok(buf)
    }
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_writes() {
        let mut writer = Counting::new(Vec::<u8>::new());

        writer.write_all(b"hello").unwrap();
        assert_eq!(writer.position(), 5);

        writer.write_all(b" world").unwrap();
        assert_eq!(writer.position(), 11);

        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), b"hello world");
    }

    #[test]
    fn fill_reports_short_reads() {
        let mut reader = Counting::new(Cursor::new(b"\x01\x02\x03".to_vec()));

        let mut buf = [0u8; 2];
        reader.fill(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);

        match reader.fill(&mut buf).unwrap_err() {
            Error::TruncatedStream {
                offset,
                expected,
                actual,
            } => {
                assert_eq!((offset, expected, actual), (2, 2, 1));
            }
            e => panic!("unexpected {:?}", e),
        }
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn read_vec_does_not_trust_length() {
        let mut reader = Counting::new(Cursor::new(b"abc".to_vec()));
        let err = reader.read_vec(u32::MAX as u64).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TruncatedStream);

        let mut reader = Counting::new(Cursor::new(b"abcdef".to_vec()));
        assert_eq!(reader.read_vec(4).unwrap(), b"abcd");
        assert_eq!(reader.position(), 4);
    }
}
