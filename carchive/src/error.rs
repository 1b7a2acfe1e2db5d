use std::path::PathBuf;

use carchive_format::LogicalType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: carchive_format::Error,
    },

    #[error("Cannot create archive `{}`", .path.display())]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: carchive_format::Error,
    },

    #[error("Cannot read value #{index} as {ty} at offset {offset:#x}")]
    ReadValue {
        index: usize,
        ty: LogicalType,
        offset: u64,
        #[source]
        source: carchive_format::Error,
    },

    #[error("Cannot write value #{index} as {ty}")]
    WriteValue {
        index: usize,
        ty: LogicalType,
        #[source]
        source: carchive_format::Error,
    },

    #[error("Cannot finish archive `{}`", .path.display())]
    FinishArchive {
        path: PathBuf,
        #[source]
        source: carchive_format::Error,
    },

    #[error("Invalid {ty} literal `{value}`")]
    InvalidLiteral { ty: LogicalType, value: String },

    #[error("Cannot use encoding `{label}`")]
    Encoding {
        label: String,
        #[source]
        source: carchive_format::Error,
    },

    #[error("`{0}` is UTF-16; unmarked strings are always read with a code page")]
    NotACodePage(String),

    #[error("Cannot write output")]
    Output(#[source] std::io::Error),
}
