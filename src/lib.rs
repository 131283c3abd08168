//! # Introduction
//!
//! `sysyc` is the front end of a compiler for SysY, a small C-like teaching
//! language with `int`/`float` scalars, multi-dimensional arrays, `const`
//! declarations and functions. It turns source text into a type-annotated,
//! constant-folded syntax tree ready for a code generator.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → StaticChecker → checked AST + signatures
//! ```
//!
//! 1. [`parser`] tokenises the source and builds an AST.
//! 2. [`checker`] resolves names and types, enforces the semantic rules and
//!    replaces every compile-time-constant expression with a literal.
//! 3. [`types`] holds the value model shared by both: [`types::value::Scalar`]
//!    elements and [`types::var_type::VarType`] shapes with flattened constant
//!    buffers.
//!
//! Each stage fails fast with its own error type; [`CompileError`] wraps both.
//!
//! ## Example
//!
//! ```
//! let checked = sysyc::compile("const int N = 2 + 3; int main() { return N * 2; }").unwrap();
//! assert!(checked.functions.contains("main"));
//! ```

pub mod checker;
pub mod parser;
pub mod types;

use checker::{FunctionTable, SemanticError, StaticChecker};
use parser::ast::Program;
use parser::{ParseError, Parser};
use thiserror::Error;

/// Any failure of the front end
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// A program that passed checking, with every function's signature
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    pub program: Program,
    pub functions: FunctionTable,
}

/// Lex and parse `source` without checking it
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

/// Check an already parsed program in place with a fresh checker
pub fn check(program: &mut Program) -> Result<FunctionTable, SemanticError> {
    let mut checker = StaticChecker::new();
    checker.check_program(program)?;
    Ok(checker.into_functions())
}

/// Run the whole front end over `source`
pub fn compile(source: &str) -> Result<CheckedProgram, CompileError> {
    let mut program = parse(source)?;
    let functions = check(&mut program)?;
    Ok(CheckedProgram { program, functions })
}

/// Report whether `source` is a valid program, discarding the checked tree
pub fn check_source(source: &str) -> Result<(), CompileError> {
    compile(source).map(|_| ())
}
