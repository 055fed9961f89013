use crate::{
    bits::{self, BACKING_BITS},
    encoding::Encoding,
    errors::{DeclareError, ReadError, WriteError},
    field::{ArraySpec, BitfieldSpec, Field, FieldKind, StringSpec},
    value::{Endian, Value},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledFieldKind {
    Bitfield(CompiledBitfield),
    Scalar,
    Array(CompiledArray),
    String(CompiledString),
}

/// A validated field, ready to read from and write into a backing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub kind: CompiledFieldKind,
}

impl TryFrom<&Field> for CompiledField {
    type Error = DeclareError;

    fn try_from(value: &Field) -> Result<Self, Self::Error> {
        if value.name.trim().is_empty() {
            return Err(DeclareError::InvalidFieldName);
        }

        let kind = match &value.kind {
            FieldKind::Bitfield(spec) => CompiledFieldKind::Bitfield(spec.try_into()?),
            FieldKind::Scalar => CompiledFieldKind::Scalar,
            FieldKind::Array(spec) => CompiledFieldKind::Array(spec.try_into()?),
            FieldKind::String(spec) => CompiledFieldKind::String(spec.try_into()?),
        };

        Ok(CompiledField {
            name: value.name.clone(),
            kind,
        })
    }
}

impl CompiledField {
    /// One past the highest bit this field touches. `None` for a scalar, which spans the whole value.
    pub fn end_bit(&self) -> Option<usize> {
        match &self.kind {
            CompiledFieldKind::Bitfield(bitfield) => Some(bitfield.offset + bitfield.size),
            CompiledFieldKind::Scalar => None,
            CompiledFieldKind::Array(array) => Some(array.size_bits * array.count),
            CompiledFieldKind::String(string) => {
                Some((string.offset_bytes + string.size_bytes) * 8)
            }
        }
    }

    /// Decodes this field from `backing`.
    pub fn read(&self, backing: u128) -> Result<Value, ReadError> {
        match &self.kind {
            CompiledFieldKind::Bitfield(bitfield) => Ok(Value::Int(bitfield.read(backing))),
            CompiledFieldKind::Scalar => Ok(Value::Int(backing)),
            CompiledFieldKind::Array(array) => Ok(Value::Array(array.read(backing))),
            CompiledFieldKind::String(string) => string
                .read(backing)
                .map(Value::Str)
                .ok_or_else(|| ReadError::DecodeError {
                    field: self.name.clone(),
                    encoding: string.encoding.to_string(),
                }),
        }
    }

    /// Returns `backing` with `value` written into this field. `backing` itself is never modified,
    /// so a rejected write leaves the caller's value as it was.
    pub fn write(&self, backing: u128, value: &Value) -> Result<u128, WriteError> {
        let written = match (&self.kind, value) {
            (CompiledFieldKind::Bitfield(bitfield), Value::Int(v)) => bitfield.write(backing, *v)?,
            (CompiledFieldKind::Scalar, Value::Int(v)) => *v,
            (CompiledFieldKind::Array(array), Value::Array(values)) => {
                array.write(backing, values)?
            }
            (CompiledFieldKind::String(string), Value::Str(s)) => string.write(backing, s)?,
            (kind, _) => {
                return Err(WriteError::TypeMismatch {
                    field: self.name.clone(),
                    expected: match kind {
                        CompiledFieldKind::Bitfield(_) | CompiledFieldKind::Scalar => "an integer",
                        CompiledFieldKind::Array(_) => "an array of integers",
                        CompiledFieldKind::String(_) => "a string",
                    },
                });
            }
        };

        log::trace!("{} = {value}: {backing:#x} -> {written:#x}", self.name);
        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBitfield {
    pub mask: u128,
    pub size: usize,
    pub offset: usize,
}

impl TryFrom<&BitfieldSpec> for CompiledBitfield {
    type Error = DeclareError;

    fn try_from(spec: &BitfieldSpec) -> Result<Self, Self::Error> {
        let (mask, size, offset) = match (spec.mask, spec.size, spec.offset) {
            (None, Some(size), Some(offset)) => (bits::mask_from(size, offset)?, size, offset),
            (Some(mask), None, None) => {
                let (size, offset) = bits::size_offset_from(mask)?;
                (mask, size, offset)
            }
            _ => {
                return Err(DeclareError::InvalidParameter(
                    "either mask or size and offset are required".to_string(),
                ));
            }
        };

        if size == 0 {
            return Err(DeclareError::InvalidParameter(
                "bitfield size must be at least 1".to_string(),
            ));
        }

        Ok(CompiledBitfield { mask, size, offset })
    }
}

impl CompiledBitfield {
    pub fn read(&self, backing: u128) -> u128 {
        bits::read_masked(backing, self.mask, self.offset)
    }

    pub fn write(&self, backing: u128, value: u128) -> Result<u128, WriteError> {
        if !bits::fits(value, self.size) {
            return Err(WriteError::ValueTooLarge {
                value,
                bits: self.size,
            });
        }

        Ok(bits::write_masked(backing, self.mask, self.offset, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArray {
    pub size_bits: usize,
    pub count: usize,
    pub endian: Endian,
}

impl TryFrom<&ArraySpec> for CompiledArray {
    type Error = DeclareError;

    fn try_from(spec: &ArraySpec) -> Result<Self, Self::Error> {
        if spec.size_bits == 0 {
            return Err(DeclareError::InvalidParameter(
                "array element size must be at least 1 bit".to_string(),
            ));
        } else if spec.count == 0 {
            return Err(DeclareError::InvalidParameter(
                "array count must be at least 1".to_string(),
            ));
        }

        let total = spec.size_bits.checked_mul(spec.count).ok_or_else(|| {
            DeclareError::InvalidParameter("array size overflows".to_string())
        })?;
        bits::mask_from(total, 0)?;

        Ok(CompiledArray {
            size_bits: spec.size_bits,
            count: spec.count,
            endian: spec.endian,
        })
    }
}

impl CompiledArray {
    fn element_mask(&self, i: usize) -> u128 {
        // in range: count * size_bits was checked against the backing width
        (u128::MAX >> (BACKING_BITS - self.size_bits)) << (i * self.size_bits)
    }

    pub fn read(&self, backing: u128) -> Vec<u128> {
        let mut values = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let offset = i * self.size_bits;
            values.push(bits::read_masked(backing, self.element_mask(i), offset));
        }

        if self.endian == Endian::Big {
            values.reverse();
        }

        values
    }

    /// Writes every element, or none of them if any is rejected.
    pub fn write(&self, backing: u128, values: &[u128]) -> Result<u128, WriteError> {
        if values.len() != self.count {
            return Err(WriteError::LengthMismatch {
                expected: self.count,
                found: values.len(),
            });
        }

        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !bits::fits(**v, self.size_bits))
        {
            return Err(WriteError::ElementTooLarge {
                index,
                value: *value,
                bits: self.size_bits,
            });
        }

        let mut written = backing;
        for (i, value) in values.iter().enumerate() {
            let slot = match self.endian {
                Endian::Little => i,
                Endian::Big => self.count - 1 - i,
            };
            let offset = slot * self.size_bits;
            written = bits::write_masked(written, self.element_mask(slot), offset, *value);
        }

        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledString {
    pub size_bytes: usize,
    pub offset_bytes: usize,
    pub encoding: Encoding,
    pub mask: u128,
}

impl TryFrom<&StringSpec> for CompiledString {
    type Error = DeclareError;

    fn try_from(spec: &StringSpec) -> Result<Self, Self::Error> {
        if spec.size_bytes == 0 {
            return Err(DeclareError::InvalidParameter(
                "string size must be at least 1 byte".to_string(),
            ));
        }

        let size_bits = spec.size_bytes.checked_mul(8);
        let offset_bits = spec.offset_bytes.checked_mul(8);
        let (Some(size_bits), Some(offset_bits)) = (size_bits, offset_bits) else {
            return Err(DeclareError::InvalidParameter(
                "string range overflows".to_string(),
            ));
        };

        Ok(CompiledString {
            size_bytes: spec.size_bytes,
            offset_bytes: spec.offset_bytes,
            encoding: spec.encoding,
            mask: bits::mask_from(size_bits, offset_bits)?,
        })
    }
}

impl CompiledString {
    fn offset_bits(&self) -> usize {
        self.offset_bytes * 8
    }

    /// Decodes the byte range, dropping trailing NULs. `None` if the bytes are not valid text.
    pub fn read(&self, backing: u128) -> Option<String> {
        let raw = bits::read_masked(backing, self.mask, self.offset_bits());
        let bytes = raw.to_le_bytes();
        let text = self.encoding.decode(&bytes[..self.size_bytes])?;

        Some(text.trim_end_matches('\0').to_string())
    }

    pub fn write(&self, backing: u128, text: &str) -> Result<u128, WriteError> {
        let encoded = self
            .encoding
            .encode(text)
            .ok_or_else(|| WriteError::EncodeError {
                encoding: self.encoding.to_string(),
            })?;

        if encoded.len() > self.size_bytes {
            return Err(WriteError::StringTooLong {
                len: encoded.len(),
                capacity: self.size_bytes,
            });
        }

        let mut padded = [0u8; BACKING_BITS / 8];
        padded[..encoded.len()].copy_from_slice(&encoded);
        let raw = u128::from_le_bytes(padded);

        Ok(bits::write_masked(backing, self.mask, self.offset_bits(), raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(field: Field) -> CompiledField {
        CompiledField::try_from(&field).unwrap()
    }

    #[test]
    fn test_bitfield_forms() {
        let by_mask = compile(Field::bitfield_mask("x", 0xff00));
        let by_size = compile(Field::bitfield("x", 8, 8));
        assert_eq!(by_mask, by_size);
    }

    #[test]
    fn test_bitfield_invalid_declarations() {
        let both = Field {
            name: "f".to_string(),
            kind: FieldKind::Bitfield(BitfieldSpec {
                mask: Some(0xf0),
                size: Some(5),
                offset: Some(3),
            }),
        };
        let size_only = Field {
            name: "f".to_string(),
            kind: FieldKind::Bitfield(BitfieldSpec {
                size: Some(5),
                ..Default::default()
            }),
        };
        let offset_only = Field {
            name: "f".to_string(),
            kind: FieldKind::Bitfield(BitfieldSpec {
                offset: Some(3),
                ..Default::default()
            }),
        };
        let neither = Field {
            name: "f".to_string(),
            kind: FieldKind::Bitfield(BitfieldSpec::default()),
        };

        for field in [both, size_only, offset_only, neither] {
            assert!(matches!(
                CompiledField::try_from(&field),
                Err(DeclareError::InvalidParameter(_))
            ));
        }

        assert_eq!(
            CompiledField::try_from(&Field::bitfield_mask("f", 0xf0f0)).unwrap_err(),
            DeclareError::MalformedMask(0xf0f0)
        );
        assert!(matches!(
            CompiledField::try_from(&Field::bitfield("f", 0, 4)),
            Err(DeclareError::InvalidParameter(_))
        ));
        assert_eq!(
            CompiledField::try_from(&Field::bitfield(" ", 1, 0)).unwrap_err(),
            DeclareError::InvalidFieldName
        );
    }

    #[test]
    fn test_bitfield_read_write() {
        let field = compile(Field::bitfield("f", 6, 6));
        let backing = field.write(0xffff_f03f, &Value::Int(17)).unwrap();
        assert_eq!(backing, 0xffff_f03f | (17 << 6));
        assert_eq!(field.read(backing).unwrap(), Value::Int(17));

        assert_eq!(
            field.write(backing, &Value::Int(64)).unwrap_err(),
            WriteError::ValueTooLarge { value: 64, bits: 6 }
        );
    }

    #[test]
    fn test_scalar_write_is_unchecked() {
        let field = compile(Field::scalar("foo"));
        assert_eq!(field.write(0x1234, &Value::Int(u128::MAX)).unwrap(), u128::MAX);
        assert_eq!(field.read(7).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_type_mismatch() {
        let field = compile(Field::scalar("foo"));
        assert_eq!(
            field.write(0, &Value::Str("x".to_string())).unwrap_err(),
            WriteError::TypeMismatch {
                field: "foo".to_string(),
                expected: "an integer"
            }
        );
    }

    #[test]
    fn test_array_read() {
        let little = compile(Field::array("a", 4, 8, Endian::Little));
        let big = compile(Field::array("a", 4, 8, Endian::Big));

        assert_eq!(
            little.read(0xfa42d034).unwrap(),
            Value::Array(vec![4, 3, 0, 13, 2, 4, 10, 15])
        );
        assert_eq!(
            big.read(0xfa42d034).unwrap(),
            Value::Array(vec![15, 10, 4, 2, 13, 0, 3, 4])
        );
    }

    #[test]
    fn test_array_write_big_endian() {
        let big = compile(Field::array("a", 4, 8, Endian::Big));
        let backing = big
            .write(0xfa42d034, &Value::Array(vec![1, 2, 3, 4, 5, 6, 7, 8]))
            .unwrap();
        assert_eq!(backing, 0x12345678);
    }

    #[test]
    fn test_array_write_is_atomic() {
        let little = compile(Field::array("a", 4, 8, Endian::Little));
        assert_eq!(
            little
                .write(0x321, &Value::Array(vec![8, 9, 10, 11, 12, 14, 14, 16]))
                .unwrap_err(),
            WriteError::ElementTooLarge {
                index: 7,
                value: 16,
                bits: 4
            }
        );
        assert_eq!(
            little.write(0x321, &Value::Array(vec![0; 16])).unwrap_err(),
            WriteError::LengthMismatch {
                expected: 8,
                found: 16
            }
        );
    }

    #[test]
    fn test_array_invalid_declarations() {
        for field in [
            Field::array("a", 0, 4, Endian::Little),
            Field::array("a", 8, 0, Endian::Little),
            Field::array("a", 8, 17, Endian::Little),
            Field::array("a", usize::MAX, 2, Endian::Big),
        ] {
            assert!(matches!(
                CompiledField::try_from(&field),
                Err(DeclareError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_string_read_write() {
        let field = compile(Field::string("s", 4, 1, Encoding::Utf8));
        let backing = field.write(0xff, &Value::Str("foo".to_string())).unwrap();
        assert_eq!(backing, 0x6f6f66ff);
        assert_eq!(field.read(backing).unwrap(), Value::Str("foo".to_string()));

        assert_eq!(
            field.write(backing, &Value::Str("fooba".to_string())).unwrap_err(),
            WriteError::StringTooLong {
                len: 5,
                capacity: 4
            }
        );
    }

    #[test]
    fn test_string_decode_error() {
        let field = compile(Field::string("s", 2, 0, Encoding::Utf8));
        assert_eq!(
            field.read(0xffff).unwrap_err(),
            ReadError::DecodeError {
                field: "s".to_string(),
                encoding: "utf-8".to_string()
            }
        );
    }

    #[test]
    fn test_string_encode_error() {
        let field = compile(Field::string("s", 4, 0, Encoding::Ascii));
        assert_eq!(
            field.write(0, &Value::Str("bär".to_string())).unwrap_err(),
            WriteError::EncodeError {
                encoding: "ascii".to_string()
            }
        );
    }

    #[test]
    fn test_end_bit() {
        assert_eq!(compile(Field::bitfield_mask("x", 0xff00)).end_bit(), Some(16));
        assert_eq!(compile(Field::scalar("foo")).end_bit(), None);
        assert_eq!(compile(Field::array("a", 4, 8, Endian::Big)).end_bit(), Some(32));
        assert_eq!(
            compile(Field::string("s", 8, 8, Encoding::Ascii)).end_bit(),
            Some(128)
        );
    }
}
