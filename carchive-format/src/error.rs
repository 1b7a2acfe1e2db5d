use crate::{archive::Mode, LogicalType};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing an archive stream.
///
/// A failed operation leaves the stream wherever the last completed step left it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("CArchive is not in {expected} mode (opened for {actual})")]
    Mode { expected: Mode, actual: Mode },

    #[error("Unsupported type: {0}")]
    UnsupportedType(LogicalType),

    #[error("Value {value} does not fit in {ty}")]
    Range { ty: LogicalType, value: String },

    #[error("Stream truncated at offset {offset}: needed {expected} bytes, got {actual}")]
    TruncatedStream {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    #[error("Cannot write {value} value as {ty}")]
    TypeMismatch { ty: LogicalType, value: LogicalType },

    #[error("Unsupported text encoding: '{0}'")]
    UnsupportedEncoding(String),

    #[error("Malformed {encoding} string at offset {offset}")]
    Decode {
        encoding: &'static str,
        offset: u64,
    },

    #[error("String cannot be represented in {0}")]
    Unmappable(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fieldless discriminant of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Mode,
    UnsupportedType,
    Range,
    TruncatedStream,
    TypeMismatch,
    UnsupportedEncoding,
    Decode,
    Unmappable,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Mode { .. } => ErrorKind::Mode,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::Range { .. } => ErrorKind::Range,
            Error::TruncatedStream { .. } => ErrorKind::TruncatedStream,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Unmappable(_) => ErrorKind::Unmappable,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn range(ty: LogicalType, value: impl std::fmt::Display) -> Error {
        Error::Range {
            ty,
            value: value.to_string(),
        }
    }
}
