//! Resolved types and constant storage
//!
//! [`VarType`] describes the shape of a value (base type, array extents,
//! constness, whether it denotes a storage location) and, for compile-time
//! constants, the flattened element buffer holding its value.
//!
//! # Sharing
//!
//! The buffer is allocated once per constant declaration and reference
//! counted. Indexing a constant array with [`VarType::index_const`] yields a
//! view onto the same buffer with one dimension popped and the offset moved
//! forward by `index * stride` elements; no element is ever copied.

use super::element_count;
use super::value::Scalar;
use super::ELEMENT_SIZE;
use crate::parser::ast::BaseType;
use std::fmt;
use std::rc::Rc;

/// The resolved type of an expression or symbol
#[derive(Debug, Clone, PartialEq)]
pub struct VarType {
    pub is_const: bool,
    pub is_lvalue: bool,
    pub base: BaseType,
    /// Array extents, outermost first; empty for scalars. A leading `-1`
    /// marks a decayed array parameter of unknown outer extent.
    pub dims: Vec<i32>,
    stride: usize,
    offset: usize,
    data: Option<Rc<[Scalar]>>,
}

impl VarType {
    pub fn new(is_const: bool, is_lvalue: bool, base: BaseType, dims: Vec<i32>) -> Self {
        let stride = dims.get(1..).map_or(1, element_count);
        VarType {
            is_const,
            is_lvalue,
            base,
            dims,
            stride,
            offset: 0,
            data: None,
        }
    }

    /// A non-constant scalar rvalue of type `base`
    pub fn scalar(base: BaseType) -> Self {
        VarType::new(false, false, base, Vec::new())
    }

    /// The type of a literal holding `value`
    pub fn constant(value: Scalar) -> Self {
        VarType::new(true, false, value.base_type(), Vec::new()).with_data(vec![value])
    }

    /// Attach a freshly allocated flattened buffer.
    ///
    /// `elements` must be in row-major order with one slot per scalar.
    pub fn with_data(mut self, elements: Vec<Scalar>) -> Self {
        debug_assert_eq!(elements.len(), self.element_count());
        self.data = Some(Rc::from(elements));
        self.offset = 0;
        self
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    pub fn is_int(&self) -> bool {
        self.base == BaseType::Int
    }

    pub fn is_float(&self) -> bool {
        self.base == BaseType::Float
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void
    }

    /// Elements consumed per step of the first dimension
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Index of this value's first element within the shared buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn byte_offset(&self) -> usize {
        self.offset * ELEMENT_SIZE
    }

    /// Number of scalar slots this type spans
    pub fn element_count(&self) -> usize {
        element_count(&self.dims)
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// The slice of the shared buffer covered by this value
    pub fn elements(&self) -> Option<&[Scalar]> {
        let data = self.data.as_deref()?;
        data.get(self.offset..self.offset + self.element_count())
    }

    /// The constant value of a scalar constant
    pub fn value(&self) -> Option<Scalar> {
        if self.is_array() {
            return None;
        }
        self.elements()?.first().copied()
    }

    /// Whether two types are views onto the same constant buffer
    pub fn shares_buffer_with(&self, other: &VarType) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether `index` selects an element of the outermost dimension.
    ///
    /// A decayed parameter (`-1` extent) accepts any non-negative index.
    pub fn in_bounds(&self, index: i32) -> bool {
        match self.dims.first() {
            Some(&extent) if extent < 0 => index >= 0,
            Some(&extent) => index >= 0 && index < extent,
            None => false,
        }
    }

    /// Index a constant array, producing a view onto the same buffer.
    ///
    /// Returns `None` if this type holds no buffer or `index` is out of bounds.
    pub fn index_const(&self, index: i32) -> Option<VarType> {
        if !self.in_bounds(index) {
            return None;
        }
        let data = self.data.as_ref()?;
        let step = usize::try_from(index).ok()? * self.stride;
        let mut view = VarType::new(self.is_const, self.is_lvalue, self.base, self.dims[1..].to_vec());
        view.offset = self.offset + step;
        view.data = Some(Rc::clone(data));
        Some(view)
    }

    /// The type of `self[i]` for an index not known at compile time.
    ///
    /// The result carries no value; it denotes storage only if `self` is a
    /// mutable location.
    pub fn element_type(&self) -> VarType {
        let dims = self.dims.get(1..).map(<[i32]>::to_vec).unwrap_or_default();
        VarType::new(false, self.is_lvalue && !self.is_const, self.base, dims)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.base)?;
        for dim in &self.dims {
            if *dim < 0 {
                write!(f, "[]")?;
            } else {
                write!(f, "[{}]", dim)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> VarType {
        // const int m[2][3] = {{1, 2, 3}, {4, 5, 6}};
        let elements = (1..=6).map(Scalar::Int).collect();
        VarType::new(true, true, BaseType::Int, vec![2, 3]).with_data(elements)
    }

    #[test]
    fn test_stride_is_product_of_inner_dims() {
        assert_eq!(VarType::new(false, true, BaseType::Int, vec![2, 3, 4]).stride(), 12);
        assert_eq!(VarType::new(false, true, BaseType::Int, vec![5]).stride(), 1);
        assert_eq!(VarType::new(false, true, BaseType::Int, vec![-1, 3]).stride(), 3);
    }

    #[test]
    fn test_index_const_shares_buffer() {
        let m = matrix();
        let row = m.index_const(1).unwrap();
        assert_eq!(row.dims, vec![3]);
        assert_eq!(row.offset(), 3);
        assert_eq!(row.byte_offset(), 12);
        assert!(row.shares_buffer_with(&m));
        assert_eq!(
            row.elements().unwrap(),
            &[Scalar::Int(4), Scalar::Int(5), Scalar::Int(6)]
        );

        let elem = row.index_const(2).unwrap();
        assert!(!elem.is_array());
        assert_eq!(elem.value(), Some(Scalar::Int(6)));
        assert!(elem.shares_buffer_with(&m));
    }

    #[test]
    fn test_index_const_rejects_out_of_bounds() {
        let m = matrix();
        assert!(m.index_const(2).is_none());
        assert!(m.index_const(-1).is_none());
        assert!(m.in_bounds(0));
        assert!(!m.in_bounds(2));
    }

    #[test]
    fn test_element_type_of_const_is_not_assignable() {
        let elem = matrix().element_type();
        assert!(!elem.is_const);
        assert!(!elem.is_lvalue);
        assert!(!elem.has_data());
        assert_eq!(elem.dims, vec![3]);

        let var = VarType::new(false, true, BaseType::Float, vec![4]);
        assert!(var.element_type().is_lvalue);
    }

    #[test]
    fn test_display() {
        assert_eq!(matrix().to_string(), "const int[2][3]");
        let param = VarType::new(false, true, BaseType::Float, vec![-1, 4]);
        assert_eq!(param.to_string(), "float[][4]");
    }
}
