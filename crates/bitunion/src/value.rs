//! Values read from and written to union fields, and array element order.

use std::fmt;

/// Which end of the packed range array index 0 maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Index 0 is the lowest-offset element.
    #[default]
    Little,
    /// Index 0 is the highest-offset element.
    Big,
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Bitfield or scalar contents.
    Int(u128),
    /// Array elements in index order.
    Array(Vec<u128>),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<u128> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[u128]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Array(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Str(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\t' => f.write_str("\\t")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c if c.is_control() && u32::from(c) <= 0xff => {
                            write!(f, "\\x{:02x}", u32::from(c))?
                        }
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
        }
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<Vec<u128>> for Value {
    fn from(value: Vec<u128>) -> Self {
        Value::Array(value)
    }
}

impl<const N: usize> From<[u128; N]> for Value {
    fn from(value: [u128; N]) -> Self {
        Value::Array(value.to_vec())
    }
}

impl From<&[u128]> for Value {
    fn from(value: &[u128]) -> Self {
        Value::Array(value.to_vec())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(1088).to_string(), "1088");
        assert_eq!(Value::Array(vec![120, 86, 52, 18]).to_string(), "[120, 86, 52, 18]");
        assert_eq!(Value::Array(vec![]).to_string(), "[]");
        assert_eq!(Value::Str("bar".to_string()).to_string(), "'bar'");
        assert_eq!(Value::Str("it's".to_string()).to_string(), "'it\\'s'");
        assert_eq!(Value::Str("\0\x04\n".to_string()).to_string(), "'\\x00\\x04\\n'");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(5u32), Value::Int(5));
        assert_eq!(Value::from([1, 2]), Value::Array(vec![1, 2]));
        assert_eq!(Value::from("foo").as_str(), Some("foo"));
        assert_eq!(Value::Int(3).as_array(), None);
    }
}
