//! Lexical scopes for the static checker
//!
//! [`Environment`] is a stack of frames, each mapping names to their resolved
//! [`VarType`]. Frame 0 is the global scope and lives for the whole run;
//! every block or function body pushes a frame on entry and pops it on exit,
//! which drops every name it declared. Lookup walks from the innermost frame
//! outward, so inner declarations shadow outer ones.

use crate::types::var_type::VarType;
use log::trace;
use rustc_hash::FxHashMap;

type Frame = FxHashMap<String, VarType>;

#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An environment holding only the (empty) global scope
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(Frame::default());
        trace!("enter scope (depth {})", self.depth());
    }

    /// Leave the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            trace!("leave scope (depth {})", self.depth());
        }
    }

    /// Number of scopes above the global one
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn is_global(&self) -> bool {
        self.frames.len() == 1
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<&VarType> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Whether `name` is declared in the innermost scope
    pub fn contains_local(&self, name: &str) -> bool {
        self.frames.last().is_some_and(|frame| frame.contains_key(name))
    }

    pub fn contains_global(&self, name: &str) -> bool {
        self.frames[0].contains_key(name)
    }

    /// Declare `name` in the innermost scope.
    ///
    /// Returns `false` (and leaves the scope unchanged) if the name is already
    /// declared there.
    pub fn declare(&mut self, name: &str, ty: VarType) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_string(), ty);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BaseType;
    use crate::types::value::Scalar;

    #[test]
    fn test_shadowing_and_restore() {
        let mut env = Environment::new();
        assert!(env.declare("x", VarType::constant(Scalar::Int(1))));
        assert!(env.is_global());

        env.push_scope();
        assert!(!env.is_global());
        assert!(!env.contains_local("x"));
        assert!(env.declare("x", VarType::scalar(BaseType::Float)));
        assert!(env.lookup("x").unwrap().is_float());

        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().value(), Some(Scalar::Int(1)));
    }

    #[test]
    fn test_duplicate_in_same_scope_is_rejected() {
        let mut env = Environment::new();
        env.push_scope();
        assert!(env.declare("y", VarType::scalar(BaseType::Int)));
        assert!(!env.declare("y", VarType::scalar(BaseType::Float)));
        assert!(env.lookup("y").unwrap().is_int());
    }

    #[test]
    fn test_popped_names_are_gone() {
        let mut env = Environment::new();
        env.push_scope();
        env.push_scope();
        env.declare("tmp", VarType::scalar(BaseType::Int));
        assert_eq!(env.depth(), 2);
        env.pop_scope();
        assert!(env.lookup("tmp").is_none());
    }

    #[test]
    fn test_global_scope_survives_extra_pops() {
        let mut env = Environment::new();
        env.declare("g", VarType::scalar(BaseType::Int));
        env.pop_scope();
        env.pop_scope();
        assert!(env.is_global());
        assert!(env.contains_global("g"));
    }
}
