//! JSON‑deserializable union declarations.
//!
//! These types describe the *shape* of a union type. They are intended to be
//! read from a declaration file shipped with your application and then
//! compiled into a [`Schema`]:
//!
//! ```json
//! {
//!   "name": "Some",
//!   "fields": [
//!     { "name": "x", "kind": { "type": "Bitfield", "mask": 65280 } },
//!     { "name": "y", "kind": { "type": "Bitfield", "size": 8, "offset": 0 } },
//!     { "name": "foo", "kind": { "type": "Scalar" } },
//!     { "name": "bar", "kind": { "type": "Array", "size": 8, "count": 4 } },
//!     { "name": "string", "kind": { "type": "String", "size": 4, "offset": 0, "encoding": "utf-8" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    encoding::Encoding,
    errors::DeclareError,
    field::{ArraySpec, BitfieldSpec, Field, FieldKind, StringSpec},
    schema::Schema,
    value::Endian,
};

/// Top‑level declaration of one union type.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UnionDef {
    /// Type name used when displaying instances.
    pub name: String,
    /// All fields declared on the type, in any order.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Field name; becomes the key in the structured representation.
    pub name: String,
    /// Kind of view and its parameters.
    pub kind: FieldKindDef,
}

/// Kind of field in the declaration.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Contiguous bit range, given either as `mask` or as `size` and `offset`.
    ///
    /// Tagged enums are buffered before deserializing, which cannot carry `u128`, so
    /// fields above bit 63 are declared with `size` and `offset`.
    Bitfield {
        #[serde(default)]
        mask: Option<u64>,
        #[serde(default)]
        size: Option<usize>,
        #[serde(default)]
        offset: Option<usize>,
    },
    /// The whole backing value.
    Scalar,
    /// Fixed‑size array packed from bit 0.
    Array {
        /// Element width in bits.
        size: usize,
        /// Number of elements.
        count: usize,
        /// Element order; defaults to little endian.
        #[serde(default)]
        endian: Option<EndianDef>,
    },
    /// Zero‑padded text in a byte range.
    String {
        /// Size in bytes.
        size: usize,
        /// Offset in bytes.
        offset: usize,
        /// Codec label such as `"utf-8"` or `"ascii"`; defaults to UTF‑8.
        #[serde(default)]
        encoding: Option<String>,
    },
}

/// Element order of an array field.
#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy)]
pub enum EndianDef {
    #[default]
    Little,
    Big,
}

impl From<EndianDef> for Endian {
    fn from(value: EndianDef) -> Self {
        match value {
            EndianDef::Little => Endian::Little,
            EndianDef::Big => Endian::Big,
        }
    }
}

impl TryFrom<FieldDef> for Field {
    type Error = DeclareError;

    fn try_from(value: FieldDef) -> Result<Self, Self::Error> {
        let kind = match value.kind {
            FieldKindDef::Bitfield { mask, size, offset } => FieldKind::Bitfield(BitfieldSpec {
                mask: mask.map(u128::from),
                size,
                offset,
            }),
            FieldKindDef::Scalar => FieldKind::Scalar,
            FieldKindDef::Array {
                size,
                count,
                endian,
            } => FieldKind::Array(ArraySpec {
                size_bits: size,
                count,
                endian: endian.unwrap_or_default().into(),
            }),
            FieldKindDef::String {
                size,
                offset,
                encoding,
            } => {
                let encoding = match encoding {
                    Some(label) => Encoding::from_label(&label).ok_or_else(|| {
                        DeclareError::InvalidParameter(format!("unknown encoding `{label}`"))
                    })?,
                    None => Encoding::default(),
                };

                FieldKind::String(StringSpec {
                    size_bytes: size,
                    offset_bytes: offset,
                    encoding,
                })
            }
        };

        Ok(Field {
            name: value.name,
            kind,
        })
    }
}

impl TryFrom<UnionDef> for Schema {
    type Error = DeclareError;

    fn try_from(value: UnionDef) -> Result<Self, Self::Error> {
        let fields = value
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Schema::compile(value.name, &fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_def_from_json() {
        let json = r#"{
            "name": "Some",
            "fields": [
                { "name": "x", "kind": { "type": "Bitfield", "mask": 65280 } },
                { "name": "y", "kind": { "type": "Bitfield", "size": 8, "offset": 0 } },
                { "name": "foo", "kind": { "type": "Scalar" } },
                { "name": "baz", "kind": { "type": "Array", "size": 4, "count": 8, "endian": "Big" } },
                { "name": "string", "kind": { "type": "String", "size": 4, "offset": 0, "encoding": "ascii" } }
            ]
        }"#;

        let def: UnionDef = serde_json::from_str(json).unwrap();
        let schema = Schema::try_from(def).unwrap();

        assert_eq!(schema.name(), "Some");
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["baz", "foo", "string", "x", "y"]
        );
        let by_size = Schema::compile("Some", &[Field::bitfield("x", 8, 8)]).unwrap();
        assert_eq!(schema.field("x"), by_size.field("x"));
    }

    #[test]
    fn test_union_def_rejects_contradictory_bitfield() {
        let json = r#"{
            "name": "Bad",
            "fields": [
                { "name": "f", "kind": { "type": "Bitfield", "mask": 240, "size": 4, "offset": 4 } }
            ]
        }"#;

        let def: UnionDef = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Schema::try_from(def),
            Err(DeclareError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_union_def_unknown_encoding() {
        let json = r#"{
            "name": "Bad",
            "fields": [
                { "name": "s", "kind": { "type": "String", "size": 4, "offset": 0, "encoding": "ebcdic" } }
            ]
        }"#;

        let def: UnionDef = serde_json::from_str(json).unwrap();
        assert_eq!(
            Schema::try_from(def).unwrap_err(),
            DeclareError::InvalidParameter("unknown encoding `ebcdic`".to_string())
        );
    }
}
