//! Compile-time arithmetic used by constant folding
//!
//! - [`binary`]: arithmetic, comparison and logical operators on two literals
//! - [`unary`]: prefix `+`, `-` and `!` on one literal
//!
//! Both are `impl StaticChecker` blocks so the folding rules sit next to the
//! checker that applies them.

pub mod binary;
pub mod unary;
