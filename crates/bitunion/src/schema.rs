//! Schema: the compiled, name-ordered set of fields shared by every instance of a union type.

use std::collections::BTreeMap;

use crate::{
    compiled::CompiledField,
    errors::{DeclareError, ReadError},
    field::Field,
    value::Value,
};

/// A compiled union type: its name, [CompiledField]s sorted by name, and the highest bit any
/// field touches. Use [Schema::compile] to build from [Field]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    total_bits: usize,
    fields: Vec<CompiledField>,
}

impl Schema {
    /// Compiles a slice of [Field]s into a schema. Fails if any field is invalid or a name repeats.
    pub fn compile(name: impl Into<String>, fields: &[Field]) -> Result<Self, DeclareError> {
        let name = name.into();
        let mut compiled_fields: Vec<CompiledField> = Vec::with_capacity(fields.len());
        let mut total_bits = 0;

        for field in fields {
            let compiled_field: CompiledField = field.try_into()?;

            if compiled_fields.iter().any(|f| f.name == compiled_field.name) {
                return Err(DeclareError::DuplicateField(compiled_field.name));
            }

            if let Some(end) = compiled_field.end_bit() {
                total_bits = total_bits.max(end);
            }

            compiled_fields.push(compiled_field);
        }

        compiled_fields.sort_by(|a, b| a.name.cmp(&b.name));

        log::debug!(
            "compiled union {name}: {} fields over {total_bits} bits",
            compiled_fields.len()
        );

        Ok(Self {
            name,
            total_bits,
            fields: compiled_fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One past the highest bit touched by a bitfield, array or string field.
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Compiled fields in name order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields
            .binary_search_by(|f| f.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.fields[i])
    }

    /// Declared field names in name order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Decodes every field of `backing`. Fails if a string field does not hold valid text.
    pub fn parse(&self, backing: u128) -> Result<BTreeMap<String, Value>, ReadError> {
        let mut map: BTreeMap<String, Value> = BTreeMap::new();

        for field in &self.fields {
            map.insert(field.name.clone(), field.read(backing)?);
        }

        Ok(map)
    }
}
