use std::fmt;
use std::str::FromStr;

/// The logical type of a value stored in an archive. Selects both the byte width
/// and the decode/encode rule for a single read or write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Unknown,
    Uint16,
    Uint32,
    Uint64,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl LogicalType {
    pub const ALL: [LogicalType; 9] = [
        LogicalType::Uint16,
        LogicalType::Uint32,
        LogicalType::Uint64,
        LogicalType::Int16,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::Float32,
        LogicalType::Float64,
        LogicalType::String,
    ];

    /// Number of bytes a value of this type occupies on the wire, or `None` when the
    /// size is not fixed.
    pub fn width(self) -> Option<usize> {
        use LogicalType::*;

        match self {
            Uint16 | Int16 => Some(2),
            Uint32 | Int32 | Float32 => Some(4),
            Uint64 | Int64 | Float64 => Some(8),
            String | Unknown => None,
        }
    }

    pub fn is_integer(self) -> bool {
        use LogicalType::*;

        matches!(self, Uint16 | Uint32 | Uint64 | Int16 | Int32 | Int64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, LogicalType::Float32 | LogicalType::Float64)
    }

    pub fn name(self) -> &'static str {
        use LogicalType::*;

        match self {
            Unknown => "unknown",
            Uint16 => "uint16",
            Uint32 => "uint32",
            Uint64 => "uint64",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            Float32 => "float32",
            Float64 => "float64",
            String => "string",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Never fails: names that are not recognised parse as [`LogicalType::Unknown`], which
/// the archive then rejects at dispatch time.
impl FromStr for LogicalType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use LogicalType::*;

        let ty = match s.to_ascii_lowercase().as_str() {
            "uint16" | "u16" => Uint16,
            "uint32" | "u32" => Uint32,
            "uint64" | "u64" => Uint64,
            "int16" | "i16" => Int16,
            "int32" | "i32" => Int32,
            "int64" | "i64" => Int64,
            "float32" | "f32" | "float" => Float32,
            "float64" | "f64" | "double" => Float64,
            "string" | "str" => String,
            _ => Unknown,
        };

        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(LogicalType::Uint16.width(), Some(2));
        assert_eq!(LogicalType::Int32.width(), Some(4));
        assert_eq!(LogicalType::Float32.width(), Some(4));
        assert_eq!(LogicalType::Float64.width(), Some(8));
        assert_eq!(LogicalType::String.width(), None);
        assert_eq!(LogicalType::Unknown.width(), None);
    }

    #[test]
    fn parse_names_and_aliases() {
        for ty in LogicalType::ALL.iter() {
            assert_eq!(ty.name().parse::<LogicalType>().unwrap(), *ty);
        }
        assert_eq!("double".parse::<LogicalType>().unwrap(), LogicalType::Float64);
        assert_eq!("U16".parse::<LogicalType>().unwrap(), LogicalType::Uint16);
        assert_eq!("cstring".parse::<LogicalType>().unwrap(), LogicalType::Unknown);
    }
}
