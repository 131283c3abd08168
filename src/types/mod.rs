//! Type and constant model
//!
//! This module provides the value-level view of the language's types:
//! - [`value`]: a single compile-time element ([`value::Scalar`], int or float)
//! - [`var_type`]: [`var_type::VarType`], the resolved shape of an expression or
//!   symbol, owning the flattened element buffer of compile-time constants
//!
//! # Storage Layout
//!
//! Constant arrays are stored flattened in row-major order, one slot per scalar.
//! Every element occupies [`ELEMENT_SIZE`] bytes in the eventual target layout:
//! ```text
//! int a[2][3]   →  a[0][0] a[0][1] a[0][2] a[1][0] a[1][1] a[1][2]
//! a[i]          →  offset + i * stride          (stride = 3)
//! ```

pub mod value;
pub mod var_type;

/// Size in bytes of one `int` or `float` element
pub const ELEMENT_SIZE: usize = 4;

/// Largest object, in bytes, addressable with a signed 32-bit offset
pub const MAX_OBJECT_SIZE: usize = i32::MAX as usize;

/// Number of scalar slots described by a list of extents.
///
/// The empty list describes a scalar (one slot). A non-positive extent (the
/// decayed-parameter marker `-1`) contributes no known storage. Declared
/// shapes are validated with [`checked_element_count`] first, so the
/// saturation here is never observed for them.
pub fn element_count(dims: &[i32]) -> usize {
    dims.iter()
        .map(|&d| usize::try_from(d).unwrap_or(0))
        .fold(1, usize::saturating_mul)
}

/// Number of scalar slots, or `None` if the object would exceed
/// [`MAX_OBJECT_SIZE`] bytes.
pub fn checked_element_count(dims: &[i32]) -> Option<usize> {
    let count = dims.iter().try_fold(1usize, |acc, &d| {
        acc.checked_mul(usize::try_from(d).unwrap_or(0))
    })?;
    let bytes = count.checked_mul(ELEMENT_SIZE)?;
    (bytes <= MAX_OBJECT_SIZE).then_some(count)
}
