//! Definition of named fields used to build a [crate::schema::Schema].

use crate::{encoding::Encoding, value::Endian};

/// A single named view onto the backing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used for access and in the structured representation.
    pub name: String,
    /// Which part of the backing value this field covers and how it is decoded.
    pub kind: FieldKind,
}

impl Field {
    /// Bitfield of `size` bits starting at bit `offset`.
    pub fn bitfield(name: impl Into<String>, size: usize, offset: usize) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Bitfield(BitfieldSpec {
                mask: None,
                size: Some(size),
                offset: Some(offset),
            }),
        }
    }

    /// Bitfield covering the set bits of a contiguous `mask`.
    pub fn bitfield_mask(name: impl Into<String>, mask: u128) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Bitfield(BitfieldSpec {
                mask: Some(mask),
                size: None,
                offset: None,
            }),
        }
    }

    /// The whole backing value.
    pub fn scalar(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Scalar,
        }
    }

    /// `count` elements of `size_bits` each, packed from bit 0.
    pub fn array(name: impl Into<String>, size_bits: usize, count: usize, endian: Endian) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Array(ArraySpec {
                size_bits,
                count,
                endian,
            }),
        }
    }

    /// Text stored in `size_bytes` bytes starting at byte `offset_bytes`.
    pub fn string(
        name: impl Into<String>,
        size_bytes: usize,
        offset_bytes: usize,
        encoding: Encoding,
    ) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::String(StringSpec {
                size_bytes,
                offset_bytes,
                encoding,
            }),
        }
    }
}

/// Distinguishes the four field kinds and carries their parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bitfield(BitfieldSpec),
    /// Aliases the whole backing value.
    Scalar,
    Array(ArraySpec),
    String(StringSpec),
}

/// Parameters for a bitfield: exactly one of `mask` or the `size`/`offset` pair.
///
/// The fields are optional so that contradictory declarations (both forms, or
/// half a pair) can be represented and rejected when compiling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitfieldSpec {
    pub mask: Option<u128>,
    pub size: Option<usize>,
    pub offset: Option<usize>,
}

/// Parameters for an array field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpec {
    /// Width of one element in bits.
    pub size_bits: usize,
    /// Number of elements.
    pub count: usize,
    /// Whether index 0 is the lowest or highest element.
    pub endian: Endian,
}

/// Parameters for a string field, in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSpec {
    pub size_bytes: usize,
    pub offset_bytes: usize,
    pub encoding: Encoding,
}
