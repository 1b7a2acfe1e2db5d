use std::convert::TryFrom;
use std::fmt;

use crate::{Error, LogicalType, Result};

/// A decoded archive value, tagged with its logical type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U16(u16),
    U32(u32),
    U64(u64),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
}

impl Value {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::U16(_) => LogicalType::Uint16,
            Value::U32(_) => LogicalType::Uint32,
            Value::U64(_) => LogicalType::Uint64,
            Value::I16(_) => LogicalType::Int16,
            Value::I32(_) => LogicalType::Int32,
            Value::I64(_) => LogicalType::Int64,
            Value::F32(_) => LogicalType::Float32,
            Value::F64(_) => LogicalType::Float64,
            Value::String(_) => LogicalType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        let v = match *self {
            Value::U16(v) => v as i128,
            Value::U32(v) => v as i128,
            Value::U64(v) => v as i128,
            Value::I16(v) => v as i128,
            Value::I32(v) => v as i128,
            Value::I64(v) => v as i128,
            _ => return None,
        };
        Some(v)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v as f64),
            Value::F64(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }

    /// Converts this value into the representation `ty` stores on the wire.
    ///
    /// Integers must fit the target's bit width exactly. Integers may be stored in
    /// float fields. Floats are never truncated into integer fields.
    pub fn coerce(self, ty: LogicalType) -> Result<Value> {
        if ty == LogicalType::Unknown {
            return Err(Error::UnsupportedType(ty));
        }

        if self.logical_type() == ty {
            return Ok(self);
        }

        let mismatch = || Error::TypeMismatch {
            ty,
            value: self.logical_type(),
        };

        if ty.is_integer() {
            let v = self.as_i128().ok_or_else(mismatch)?;
            let range = |_| Error::range(ty, v);
            let coerced = match ty {
                LogicalType::Uint16 => Value::U16(u16::try_from(v).map_err(range)?),
                LogicalType::Uint32 => Value::U32(u32::try_from(v).map_err(range)?),
                LogicalType::Uint64 => Value::U64(u64::try_from(v).map_err(range)?),
                LogicalType::Int16 => Value::I16(i16::try_from(v).map_err(range)?),
                LogicalType::Int32 => Value::I32(i32::try_from(v).map_err(range)?),
                LogicalType::Int64 => Value::I64(i64::try_from(v).map_err(range)?),
                _ => unreachable!("checked is_integer"),
            };
            return Ok(coerced);
        }

        match ty {
            LogicalType::Float32 => {
                let v = self.as_f64().ok_or_else(mismatch)?;
                if v.is_finite() && v.abs() > f32::MAX as f64 {
                    return Err(Error::range(ty, v));
                }
                Ok(Value::F32(v as f32))
            }
            LogicalType::Float64 => Ok(Value::F64(self.as_f64().ok_or_else(mismatch)?)),
            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
        }
    }
}

macro_rules! from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Value {
                    Value::$variant(v)
                }
            }
        )*
    };
}

from_primitive! {
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}
