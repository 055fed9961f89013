//! Low-level mask and bit-range utilities for the backing integer.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of the backing value.

use crate::errors::DeclareError;

/// Width of the backing integer in bits.
pub const BACKING_BITS: usize = u128::BITS as usize;

/// Builds the mask `((1 << size) - 1) << offset`. A zero `size` gives an empty mask.
pub fn mask_from(size: usize, offset: usize) -> Result<u128, DeclareError> {
    if size.checked_add(offset).is_none_or(|end| end > BACKING_BITS) {
        return Err(DeclareError::InvalidParameter(format!(
            "size {size} at offset {offset} exceeds the {BACKING_BITS} bit backing value"
        )));
    }

    if size == 0 {
        return Ok(0);
    }

    Ok((u128::MAX >> (BACKING_BITS - size)) << offset)
}

/// Derives `(size, offset)` from a contiguous mask.
pub fn size_offset_from(mask: u128) -> Result<(usize, usize), DeclareError> {
    if mask == 0 {
        return Err(DeclareError::MalformedMask(mask));
    }

    let lowest = mask & mask.wrapping_neg();
    // a single run of ones carries out of its top bit when its lowest bit is added
    if mask.wrapping_add(lowest) & mask != 0 {
        return Err(DeclareError::MalformedMask(mask));
    }

    let offset = mask.trailing_zeros() as usize;
    let size = BACKING_BITS - (mask >> offset).leading_zeros() as usize;

    Ok((size, offset))
}

/// Number of bits needed to represent `value`.
pub fn bit_length(value: u128) -> usize {
    BACKING_BITS - value.leading_zeros() as usize
}

/// Returns true if `value` can be stored in `bits` bits.
pub fn fits(value: u128, bits: usize) -> bool {
    bit_length(value) <= bits
}

/// Reads the bits under `mask`, shifted down by `offset`.
pub fn read_masked(backing: u128, mask: u128, offset: usize) -> u128 {
    (backing & mask).checked_shr(offset as u32).unwrap_or(0)
}

/// Replaces the bits under `mask` with `value << offset`. Bits outside `mask` are kept.
pub fn write_masked(backing: u128, mask: u128, offset: usize, value: u128) -> u128 {
    let shifted = value.checked_shl(offset as u32).unwrap_or(0);
    (backing & !mask) | (mask & shifted)
}
