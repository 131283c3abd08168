//! Function signature table
//!
//! Filled in by the signature pass before any body is checked, so calls
//! resolve regardless of definition order.

use crate::parser::ast::BaseType;
use crate::types::var_type::VarType;
use rustc_hash::FxHashMap;

/// A formal parameter as seen by callers
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    pub name: String,
    /// Resolved type; a decayed array has `-1` as its first extent
    pub ty: VarType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: BaseType,
    pub params: Vec<ParamSig>,
}

impl FunctionSignature {
    /// The type of a call to this function
    pub fn result_type(&self) -> VarType {
        VarType::scalar(self.return_type)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, FunctionSignature>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the runtime support functions
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.insert(
            "putint",
            FunctionSignature {
                return_type: BaseType::Void,
                params: vec![ParamSig {
                    name: "value".to_string(),
                    ty: VarType::new(false, true, BaseType::Int, Vec::new()),
                }],
            },
        );
        table
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, signature: FunctionSignature) {
        self.functions.insert(name.to_string(), signature);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionSignature)> {
        self.functions.iter().map(|(name, sig)| (name.as_str(), sig))
    }
}
