//! Error types for field declaration, reads and writes.

use thiserror::Error;

/// Errors produced when compiling a [crate::field::Field] into a [crate::compiled::CompiledField].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclareError {
    /// Declaration arguments are missing, contradictory, or out of range.
    #[error("invalid field parameter: {0}")]
    InvalidParameter(String),
    /// Bitfield mask is zero or its set bits are not one contiguous run.
    #[error("non-contiguous mask {0:#x}")]
    MalformedMask(u128),
    /// Two fields of one schema share a name.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    /// Field name is empty or blank.
    #[error("field name must not be empty")]
    InvalidFieldName,
}

/// Errors produced when decoding a field from the backing value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Stored bytes are not valid text in the field's encoding.
    #[error("field `{field}` does not hold valid {encoding} text")]
    DecodeError { field: String, encoding: String },
    /// A typed getter was used on a field of another kind.
    #[error("field `{field}` is not {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Errors produced when writing a field. The backing value is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("{value} is too large for a {bits} bit value")]
    ValueTooLarge { value: u128, bits: usize },
    /// One array element does not fit the element width. `index` is the caller's index.
    #[error("element {index} ({value}) is too large for a {bits} bit value")]
    ElementTooLarge { index: usize, value: u128, bits: usize },
    #[error("wrong array size {found}, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("encoded string is {len} bytes long, expected at most {capacity}")]
    StringTooLong { len: usize, capacity: usize },
    /// The string holds a character the field's encoding cannot represent.
    #[error("string cannot be encoded as {encoding}")]
    EncodeError { encoding: String },
    /// The supplied [crate::value::Value] variant does not match the field kind.
    #[error("field `{field}` expects {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Any error the crate can produce, for callers that cross phases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Declare(#[from] DeclareError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
