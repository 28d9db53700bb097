//! Scalar values and their kinds

use std::fmt;

use thiserror::Error;

/// The kind of a scalar member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Bool,
    Float,
    Double,
    Char,
    Str,
}

impl ScalarKind {
    /// Lowercase name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int16 => "int16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt16 => "uint16",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Char => "char",
            ScalarKind::Str => "str",
        }
    }

    /// Character kinds render as quoted, escaped SQL literals; everything
    /// else renders bare.
    pub fn is_textual(&self) -> bool {
        matches!(self, ScalarKind::Char | ScalarKind::Str)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when text cannot be read as a scalar of a given kind
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot read {raw:?} as {kind}")]
pub struct ValueParseError {
    pub kind: ScalarKind,
    pub raw: String,
}

/// A scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Bool(bool),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Int16(_) => ScalarKind::Int16,
            Value::Int32(_) => ScalarKind::Int32,
            Value::Int64(_) => ScalarKind::Int64,
            Value::UInt16(_) => ScalarKind::UInt16,
            Value::UInt32(_) => ScalarKind::UInt32,
            Value::UInt64(_) => ScalarKind::UInt64,
            Value::Bool(_) => ScalarKind::Bool,
            Value::Float(_) => ScalarKind::Float,
            Value::Double(_) => ScalarKind::Double,
            Value::Char(_) => ScalarKind::Char,
            Value::Str(_) => ScalarKind::Str,
        }
    }

    /// False only for NaN and infinite floats, which have no SQL literal
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(v) => v.is_finite(),
            Value::Double(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Zero value of a kind
    pub fn default_of(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int16 => Value::Int16(0),
            ScalarKind::Int32 => Value::Int32(0),
            ScalarKind::Int64 => Value::Int64(0),
            ScalarKind::UInt16 => Value::UInt16(0),
            ScalarKind::UInt32 => Value::UInt32(0),
            ScalarKind::UInt64 => Value::UInt64(0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Double => Value::Double(0.0),
            ScalarKind::Char => Value::Char('\0'),
            ScalarKind::Str => Value::Str(String::new()),
        }
    }

    /// Read `raw` as a value of `kind`
    ///
    /// Booleans accept `1`/`0` as well as `true`/`false` in any case, since
    /// result rows carry them in either form.
    pub fn parse(kind: ScalarKind, raw: &str) -> Result<Self, ValueParseError> {
        let fail = || ValueParseError {
            kind,
            raw: raw.to_string(),
        };

        let value = match kind {
            ScalarKind::Int16 => Value::Int16(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::Int32 => Value::Int32(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::Int64 => Value::Int64(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::UInt16 => Value::UInt16(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::UInt32 => Value::UInt32(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::UInt64 => Value::UInt64(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::Float => Value::Float(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::Double => Value::Double(raw.trim().parse().map_err(|_| fail())?),
            ScalarKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Value::Bool(true),
                "0" | "false" => Value::Bool(false),
                _ => return Err(fail()),
            },
            ScalarKind::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => return Err(fail()),
                }
            }
            ScalarKind::Str => Value::Str(raw.to_string()),
        };
        Ok(value)
    }
}

/// Canonical serialization; booleans are written as `1`/`0`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Bool(v) => f.write_str(if *v { "1" } else { "0" }),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    bool => Bool,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Str,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers_and_bools() {
        assert_eq!(Value::Int64(-42).to_string(), "-42");
        assert_eq!(Value::UInt16(7).to_string(), "7");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "0");
    }

    #[test]
    fn test_textual_kinds() {
        assert!(ScalarKind::Str.is_textual());
        assert!(ScalarKind::Char.is_textual());
        assert!(!ScalarKind::Int32.is_textual());
        assert!(!ScalarKind::Bool.is_textual());
        assert!(!ScalarKind::Double.is_textual());
    }

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(Value::parse(ScalarKind::Int32, "12"), Ok(Value::Int32(12)));
        assert_eq!(Value::parse(ScalarKind::Bool, "TRUE"), Ok(Value::Bool(true)));
        assert_eq!(Value::parse(ScalarKind::Bool, "0"), Ok(Value::Bool(false)));
        assert_eq!(Value::parse(ScalarKind::Char, "x"), Ok(Value::Char('x')));
        assert_eq!(
            Value::parse(ScalarKind::Str, " keep spaces "),
            Ok(Value::Str(" keep spaces ".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let err = Value::parse(ScalarKind::UInt16, "70000").unwrap_err();
        assert_eq!(err.kind, ScalarKind::UInt16);
        assert!(Value::parse(ScalarKind::Char, "xy").is_err());
        assert!(Value::parse(ScalarKind::Bool, "maybe").is_err());
    }
}
