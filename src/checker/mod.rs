//! Static checker and constant folder
//!
//! This module validates a parsed program and rewrites it in place:
//! - [`engine`]: The [`StaticChecker`] driver and the [`Folded`] visit result
//! - [`errors`]: Semantic error types
//! - [`scope`]: Lexically scoped symbol environment
//! - [`functions`]: Function signatures and the builtin table
//! - [`ops`]: Compile-time evaluation of operators on literals
//!
//! # Checking Model
//!
//! The checker makes three passes over the program: global declarations,
//! function signatures, then function bodies. Every expression it visits is
//! annotated with its [`VarType`](crate::types::var_type::VarType), and any
//! expression whose value is known at compile time is replaced by a literal.
//! The first violation aborts the run with a [`SemanticError`].

mod declarations;
pub mod engine;
pub mod errors;
mod expressions;
pub mod functions;
pub mod ops;
pub mod scope;
mod statements;

pub use engine::{Folded, StaticChecker};
pub use errors::SemanticError;
pub use functions::{FunctionSignature, FunctionTable, ParamSig};
