//! The compound value container: one backing integer viewed through a [Schema]'s fields.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    bits,
    errors::{Error, ReadError, WriteError},
    schema::Schema,
    value::Value,
};

/// An instance of a union type. Every field reads from and writes into the same backing value.
///
/// ```
/// use std::sync::Arc;
/// use bitunion::{field::Field, schema::Schema, union::Union};
///
/// let schema = Arc::new(
///     Schema::compile(
///         "Word",
///         &[Field::bitfield_mask("high", 0xff00), Field::bitfield("low", 8, 0)],
///     )
///     .unwrap(),
/// );
///
/// let mut word = Union::new(schema, 0x1234);
/// assert_eq!(word.get_int("high").unwrap(), 0x12);
/// word.set("low", 0xffu32).unwrap();
/// assert_eq!(word.value(), 0x12ff);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
    schema: Arc<Schema>,
    value: u128,
}

impl Union {
    pub fn new(schema: Arc<Schema>, value: u128) -> Self {
        Self { schema, value }
    }

    /// Starts from `value`, then writes each `(name, value)` pair in order.
    ///
    /// Every name is checked against the schema before anything is written, so an
    /// [WriteError::UnknownField] means no field was touched.
    pub fn with_values<I, K, V>(schema: Arc<Schema>, value: u128, values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let values: Vec<(K, Value)> = values.into_iter().map(|(k, v)| (k, v.into())).collect();

        if let Some((unknown, _)) = values
            .iter()
            .find(|(name, _)| schema.field(name.as_ref()).is_none())
        {
            return Err(WriteError::UnknownField(unknown.as_ref().to_string()).into());
        }

        let mut union = Self::new(schema, value);
        for (name, value) in &values {
            union.set(name.as_ref(), value.clone())?;
        }

        Ok(union)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The raw backing value.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Replaces the raw backing value, updating every field at once.
    pub fn set_value(&mut self, value: u128) {
        self.value = value;
    }

    /// Declared field names in name order.
    pub fn members(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.field_names()
    }

    pub fn get(&self, name: &str) -> Result<Value, ReadError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| ReadError::UnknownField(name.to_string()))?;

        field.read(self.value)
    }

    /// Writes `value` through the named field. On error the backing value is unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), WriteError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| WriteError::UnknownField(name.to_string()))?;

        let written = field.write(self.value, &value.into())?;

        let total_bits = self.schema.total_bits();
        if total_bits > 0 && !bits::fits(written, total_bits) {
            log::warn!(
                "{} of {} now uses {} bits, beyond the {total_bits} bits its fields cover",
                name,
                self.schema.name(),
                bits::bit_length(written)
            );
        }

        self.value = written;
        Ok(())
    }

    /// Reads a bitfield or scalar field.
    pub fn get_int(&self, name: &str) -> Result<u128, ReadError> {
        match self.get(name)? {
            Value::Int(v) => Ok(v),
            _ => Err(type_mismatch(name, "an integer")),
        }
    }

    pub fn get_array(&self, name: &str) -> Result<Vec<u128>, ReadError> {
        match self.get(name)? {
            Value::Array(values) => Ok(values),
            _ => Err(type_mismatch(name, "an array of integers")),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<String, ReadError> {
        match self.get(name)? {
            Value::Str(s) => Ok(s),
            _ => Err(type_mismatch(name, "a string")),
        }
    }

    /// Every field's current value, keyed and ordered by name.
    pub fn to_map(&self) -> Result<BTreeMap<String, Value>, ReadError> {
        self.schema.parse(self.value)
    }
}

fn type_mismatch(name: &str, expected: &'static str) -> ReadError {
    ReadError::TypeMismatch {
        field: name.to_string(),
        expected,
    }
}

impl fmt::Display for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, field) in self.schema.fields().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match field.read(self.value) {
                Ok(value) => write!(f, "{}={value}", field.name)?,
                Err(_) => write!(f, "{}=<invalid>", field.name)?,
            }
        }
        f.write_str(")")
    }
}
