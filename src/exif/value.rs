//! Decoded TIFF field values

use std::fmt;

/// A decoded IFD entry value
///
/// Entries with a count of 1 decode to a scalar variant, larger counts to
/// [`Value::List`]. ASCII and UNDEFINED entries always keep their bytes
/// together.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// BYTE
    Byte(u8),
    /// SBYTE
    SignedByte(i8),
    /// SHORT
    Short(u16),
    /// SSHORT
    SignedShort(i16),
    /// LONG
    Long(u32),
    /// SLONG
    SignedLong(i32),
    /// RATIONAL, already divided
    Rational(f64),
    /// SRATIONAL, already divided
    SignedRational(f64),
    /// FLOAT
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// ASCII, without the trailing NUL
    Ascii(String),
    /// UNDEFINED, raw bytes
    Undefined(Vec<u8>),
    /// Several components of one numeric type
    List(Vec<Value>),
}

impl Value {
    /// The value as an unsigned integer, for integral scalars
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::Byte(v) => Some(v.into()),
            Value::Short(v) => Some(v.into()),
            Value::Long(v) => Some(v),
            Value::SignedByte(v) => u32::try_from(v).ok(),
            Value::SignedShort(v) => u32::try_from(v).ok(),
            Value::SignedLong(v) => u32::try_from(v).ok(),
            _ => None,
        }
    }

    /// The value as a float, for any numeric scalar
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Rational(v) | Value::SignedRational(v) | Value::Double(v) => Some(v),
            Value::Float(v) => Some(v.into()),
            Value::SignedByte(v) => Some(v.into()),
            Value::SignedShort(v) => Some(v.into()),
            Value::SignedLong(v) => Some(v.into()),
            _ => self.as_u32().map(f64::from),
        }
    }

    /// The value as a string slice, for ASCII entries
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// The components of a list, or the scalar itself as a one-element slice
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Value::List(values) => values,
            other => std::slice::from_ref(other),
        }
    }

    /// Every component converted to `f64`, `None` if any is not numeric
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        self.as_slice().iter().map(Value::as_f64).collect()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}"),
            Value::SignedByte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::SignedShort(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::SignedLong(v) => write!(f, "{v}"),
            Value::Rational(v) | Value::SignedRational(v) | Value::Double(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Ascii(s) => write!(f, "{s}"),
            Value::Undefined(bytes) => write!(f, "[{} bytes]", bytes.len()),
            Value::List(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}
