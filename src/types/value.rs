//! Compile-time element values
//!
//! This module defines the [`Scalar`] enum, the unit of storage for constant
//! folding and for the flattened buffers of constant arrays. Unlike a raw byte
//! buffer, every slot is tagged, so reading an `int` slot as a `float` is an
//! explicit conversion rather than a bit reinterpretation.
//!
//! # Conversions
//!
//! - [`Scalar::as_int`] truncates floats toward zero (C `(int)` cast)
//! - [`Scalar::as_float`] widens ints
//! - [`Scalar::convert`] coerces a value to the slot type of a declaration

use crate::parser::ast::BaseType;
use std::fmt;

/// A single compile-time value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i32),
    Float(f32),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Int(0)
    }
}

impl Scalar {
    /// The zero value stored in unset slots of a buffer of `base` elements
    pub fn zero(base: BaseType) -> Self {
        match base {
            BaseType::Float => Scalar::Float(0.0),
            BaseType::Int | BaseType::Void => Scalar::Int(0),
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            Scalar::Int(_) => BaseType::Int,
            Scalar::Float(_) => BaseType::Float,
        }
    }

    /// Integer view of this value, truncating floats toward zero
    pub fn as_int(&self) -> i32 {
        match *self {
            Scalar::Int(n) => n,
            Scalar::Float(x) => x as i32,
        }
    }

    /// Float view of this value
    pub fn as_float(&self) -> f32 {
        match *self {
            Scalar::Int(n) => n as f32,
            Scalar::Float(x) => x,
        }
    }

    /// Coerce to the element type of a `base` slot
    pub fn convert(self, base: BaseType) -> Self {
        match base {
            BaseType::Int => Scalar::Int(self.as_int()),
            BaseType::Float => Scalar::Float(self.as_float()),
            BaseType::Void => self,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Scalar::Int(n) => n == 0,
            Scalar::Float(x) => x == 0.0,
        }
    }

    /// C truthiness: any non-zero value is true
    pub fn is_truthy(&self) -> bool {
        !self.is_zero()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{:?}", x),
        }
    }
}
