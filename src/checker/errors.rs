//! Semantic error types for the static checker
//!
//! This module defines [`SemanticError`], one variant per rule the checker
//! enforces. The display text is the bare message; the position is available
//! through [`SemanticError::location`] for callers that want to report it.
//!
//! All semantic errors are fatal: the first one aborts checking of the program.

use crate::parser::ast::{BaseType, SourceLocation};
use thiserror::Error;

/// Static semantic errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("Undefined function '{name}'")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Name declared twice in one scope
    #[error("Redefinition of '{name}'")]
    Redefinition {
        name: String,
        location: SourceLocation,
    },

    /// Function name clashes with another function or a global variable
    #[error("Duplicate global name '{name}'")]
    DuplicateGlobal {
        name: String,
        location: SourceLocation,
    },

    #[error("Duplicate parameter '{name}' in function '{function}'")]
    DuplicateParameter {
        function: String,
        name: String,
        location: SourceLocation,
    },

    #[error("Called object is not a function name")]
    NotCallable { location: SourceLocation },

    #[error("Function '{function}' expects {expected} argument{}, got {got}", plural(.expected))]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error("Argument {position} of '{function}': expected {expected}, got {got}")]
    ArgumentShapeMismatch {
        function: String,
        position: usize,
        expected: String,
        got: String,
        location: SourceLocation,
    },

    #[error("Argument {position} of '{function}': expected {expected} array, got {got} array")]
    ArgumentBaseMismatch {
        function: String,
        position: usize,
        expected: BaseType,
        got: BaseType,
        location: SourceLocation,
    },

    #[error("Void value used in {context}")]
    VoidValue {
        context: &'static str,
        location: SourceLocation,
    },

    #[error("Array used as operand of {context}")]
    ArrayOperand {
        context: &'static str,
        location: SourceLocation,
    },

    #[error("Array dimension is not a compile-time constant")]
    NonConstantDimension { location: SourceLocation },

    #[error("Array dimension must be positive, got {value}")]
    NonPositiveDimension { value: i32, location: SourceLocation },

    #[error("Array '{name}' is too large")]
    ArrayTooLarge {
        name: String,
        location: SourceLocation,
    },

    #[error("Initializer of '{name}' is not a compile-time constant")]
    NonConstantInitializer {
        name: String,
        location: SourceLocation,
    },

    #[error("Division by zero")]
    DivisionByZero { location: SourceLocation },

    #[error("Modulo by zero")]
    ModuloByZero { location: SourceLocation },

    #[error("Operands of '%' must be integers")]
    FloatModulo { location: SourceLocation },

    #[error("Subscripted value is not an array")]
    IndexNonArray { location: SourceLocation },

    #[error("Array index {index} out of bounds for extent {extent}")]
    IndexOutOfBounds {
        index: i32,
        extent: i32,
        location: SourceLocation,
    },

    #[error("Cannot assign to const-qualified value")]
    AssignToConst { location: SourceLocation },

    #[error("Cannot assign to an array")]
    AssignToArray { location: SourceLocation },

    #[error("Left side of assignment is not assignable")]
    AssignToRvalue { location: SourceLocation },

    #[error("Too many initializers for '{name}'")]
    TooManyInitializers {
        name: String,
        location: SourceLocation,
    },

    #[error("Initializer of '{name}' has braces nested deeper than its dimensions")]
    ExcessiveBraces {
        name: String,
        location: SourceLocation,
    },

    #[error("Scalar '{name}' cannot take a brace-enclosed initializer")]
    ScalarBraceInitializer {
        name: String,
        location: SourceLocation,
    },

    #[error("Array '{name}' must be initialized with a brace-enclosed list")]
    ArrayNeedsBraces {
        name: String,
        location: SourceLocation,
    },

    #[error("Cannot return an array")]
    ReturnArray { location: SourceLocation },

    #[error("Void function '{function}' cannot return a value")]
    ReturnValueFromVoid {
        function: String,
        location: SourceLocation,
    },

    #[error("Function '{function}' returns a void expression")]
    ReturnVoidValue {
        function: String,
        location: SourceLocation,
    },

    #[error("'{keyword}' outside of a loop")]
    LoopControlOutsideLoop {
        keyword: &'static str,
        location: SourceLocation,
    },

    #[error("Condition must be a scalar value")]
    ConditionNotScalar { location: SourceLocation },
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl SemanticError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            SemanticError::UndefinedVariable { location, .. } => location,
            SemanticError::UndefinedFunction { location, .. } => location,
            SemanticError::Redefinition { location, .. } => location,
            SemanticError::DuplicateGlobal { location, .. } => location,
            SemanticError::DuplicateParameter { location, .. } => location,
            SemanticError::NotCallable { location } => location,
            SemanticError::ArgumentCountMismatch { location, .. } => location,
            SemanticError::ArgumentShapeMismatch { location, .. } => location,
            SemanticError::ArgumentBaseMismatch { location, .. } => location,
            SemanticError::VoidValue { location, .. } => location,
            SemanticError::ArrayOperand { location, .. } => location,
            SemanticError::NonConstantDimension { location } => location,
            SemanticError::NonPositiveDimension { location, .. } => location,
            SemanticError::ArrayTooLarge { location, .. } => location,
            SemanticError::NonConstantInitializer { location, .. } => location,
            SemanticError::DivisionByZero { location } => location,
            SemanticError::ModuloByZero { location } => location,
            SemanticError::FloatModulo { location } => location,
            SemanticError::IndexNonArray { location } => location,
            SemanticError::IndexOutOfBounds { location, .. } => location,
            SemanticError::AssignToConst { location } => location,
            SemanticError::AssignToArray { location } => location,
            SemanticError::AssignToRvalue { location } => location,
            SemanticError::TooManyInitializers { location, .. } => location,
            SemanticError::ExcessiveBraces { location, .. } => location,
            SemanticError::ScalarBraceInitializer { location, .. } => location,
            SemanticError::ArrayNeedsBraces { location, .. } => location,
            SemanticError::ReturnArray { location } => location,
            SemanticError::ReturnValueFromVoid { location, .. } => location,
            SemanticError::ReturnVoidValue { location, .. } => location,
            SemanticError::LoopControlOutsideLoop { location, .. } => location,
            SemanticError::ConditionNotScalar { location } => location,
        }
    }
}
