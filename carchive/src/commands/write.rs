use std::fmt;
use std::path::PathBuf;

use carchive_format::{CArchive, LogicalType, TextEncoding, Value};

use crate::error::{Error, Result};

/// A `type=value` pair from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub ty: LogicalType,
    pub literal: String,
}

#[derive(Debug)]
pub struct ParseAssignmentError(String);

impl std::error::Error for ParseAssignmentError {}

impl fmt::Display for ParseAssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected TYPE=VALUE, got: {}", self.0)
    }
}

pub fn parse_assignment(src: &str) -> std::result::Result<Assignment, ParseAssignmentError> {
    let idx = match src.find('=') {
        Some(idx) if idx > 0 => idx,
        _ => return Err(ParseAssignmentError(src.to_string())),
    };

    // Infallible; unrecognised names become `unknown` and are refused when written.
    let ty = src[..idx].parse().unwrap_or(LogicalType::Unknown);

    Ok(Assignment {
        ty,
        literal: src[idx + 1..].to_string(),
    })
}

/// Turns a literal into a value; range checks happen when it is written.
pub fn parse_value(ty: LogicalType, literal: &str) -> Result<Value> {
    let invalid = || Error::InvalidLiteral {
        ty,
        value: literal.to_string(),
    };

    if ty.is_integer() {
        if let Ok(v) = literal.parse::<u64>() {
            return Ok(Value::U64(v));
        }
        return literal.parse::<i64>().map(Value::I64).map_err(|_| invalid());
    }

    if ty.is_float() {
        return literal.parse::<f64>().map(Value::F64).map_err(|_| invalid());
    }

    Ok(Value::String(literal.to_string()))
}

pub fn run(path: PathBuf, values: Vec<Assignment>, encoding: TextEncoding) -> Result<()> {
    let mut ar = CArchive::create(&path).map_err(|source| Error::CreateArchive {
        path: path.clone(),
        source,
    })?;

    let mut total = 0;
    for (index, assignment) in values.into_iter().enumerate() {
        let ty = assignment.ty;
        let value = parse_value(ty, &assignment.literal)?;
        total += ar
            .write_with_encoding(ty, value, encoding)
            .map_err(|source| Error::WriteValue { index, ty, source })?;
    }

    ar.finish().map_err(|source| Error::FinishArchive {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = total, "wrote archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carchive_format::encoding_rs::SHIFT_JIS;
    use carchive_format::ErrorKind;

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("u16=7").unwrap(),
            Assignment {
                ty: LogicalType::Uint16,
                literal: "7".into()
            }
        );
        assert_eq!(parse_assignment("string=a=b").unwrap().literal, "a=b");
        assert_eq!(parse_assignment("string=").unwrap().literal, "");
        assert_eq!(
            parse_assignment("cstring=x").unwrap().ty,
            LogicalType::Unknown
        );
        assert!(parse_assignment("7").is_err());
        assert!(parse_assignment("=7").is_err());
    }

    #[test]
    fn literals() {
        assert_eq!(
            parse_value(LogicalType::Uint64, "18446744073709551615").unwrap(),
            Value::U64(u64::MAX)
        );
        assert_eq!(
            parse_value(LogicalType::Int16, "-3").unwrap(),
            Value::I64(-3)
        );
        assert_eq!(
            parse_value(LogicalType::Float32, "1.5").unwrap(),
            Value::F64(1.5)
        );
        assert!(matches!(
            parse_value(LogicalType::Int32, "1.5"),
            Err(Error::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        let values = vec![
            parse_assignment("u16=1").unwrap(),
            parse_assignment("string=\u{30c6}").unwrap(),
        ];

        run(path.clone(), values, TextEncoding::CodePage(SHIFT_JIS)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x01\x00\x02\x83\x65");
    }

    #[test]
    fn out_of_range_names_the_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        let values = vec![
            parse_assignment("u16=1").unwrap(),
            parse_assignment("u16=70000").unwrap(),
        ];

        match run(path, values, TextEncoding::Utf16Le).unwrap_err() {
            Error::WriteValue { index, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(source.kind(), ErrorKind::Range);
            }
            e => panic!("unexpected {:?}", e),
        }
    }
}
