//! Reads and writes the primitive values of MFC's `CArchive` serialization format.
//!
//! Integers and floats are stored little-endian at their natural width. Strings carry a
//! variable-width length prefix and are stored either in a legacy code page or, when
//! flagged with the unicode marker, as UTF-16LE. See [`header`] for the prefix layout.
//!
//! Use [`CArchive`] to read or write a stream:
//!
//! ```
//! use carchive_format::{CArchive, LogicalType, Value};
//!
//! let mut ar = CArchive::writer(Vec::<u8>::new());
//! ar.write(LogicalType::Uint16, 1u16).unwrap();
//! ar.write(LogicalType::String, "hello").unwrap();
//! let bytes = ar.finish().unwrap();
//!
//! let mut ar = CArchive::reader(&bytes[..]);
//! assert_eq!(ar.read(LogicalType::Uint16).unwrap(), Value::U16(1));
//! assert_eq!(ar.read_string().unwrap(), "hello");
//! ```

pub mod archive;
mod counting;
mod de;
pub mod encoding;
mod error;
pub mod header;
mod ser;
mod ty;
mod value;

pub use archive::{CArchive, Mode};
pub use counting::Counting;
pub use de::{decode_value, Decode};
pub use encoding::{default_code_page, EncodingProvider, TextEncoding};
pub use error::{Error, ErrorKind, Result};
pub use header::StringHeader;
pub use ser::{encode_value, write_string, Encode};
pub use ty::LogicalType;
pub use value::Value;

#[doc(hidden)]
pub use encoding_rs;
