//! SysY source code parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`] and its helpers (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! - Types: `int`, `float`, `void` (return type only), multi-dimensional arrays
//! - Declarations: `const` and mutable variable lists with nested initializers
//! - Statements: blocks, `if`/`else`, `while`, `break`, `continue`, `return`
//! - Expressions: arithmetic, comparison, logical, assignment, calls, indexing
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{ParseError, Parser};
