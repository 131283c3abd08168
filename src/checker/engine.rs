// Static checking engine

use crate::checker::errors::SemanticError;
use crate::checker::functions::FunctionTable;
use crate::checker::scope::Environment;
use crate::parser::ast::*;
use crate::types::value::Scalar;
use crate::types::var_type::VarType;
use log::{debug, trace};

/// Outcome of visiting one expression node.
///
/// Folding never mutates the visited node itself; the caller owning the child
/// slot applies the result with [`Folded::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Folded {
    /// Keep the node and annotate it with this type
    Unchanged(VarType),
    /// Replace the node with a literal holding this value
    Replace(Scalar),
}

impl Folded {
    /// Write the result into `slot` and return the slot's resolved type
    pub fn apply(self, slot: &mut Expr) -> VarType {
        match self {
            Folded::Unchanged(ty) => {
                slot.ty = Some(ty.clone());
                ty
            }
            Folded::Replace(value) => {
                trace!("folded expression at {} to {}", slot.location, value);
                *slot = Expr::literal(value, slot.location);
                VarType::constant(value)
            }
        }
    }
}

/// The function currently being checked
#[derive(Debug, Clone)]
pub(crate) struct FunctionContext {
    pub(crate) name: String,
    pub(crate) return_type: BaseType,
}

/// Type checker and constant folder
pub struct StaticChecker {
    /// Scope stack; frame 0 holds the globals
    pub(crate) env: Environment,

    /// Signatures of every function in the program plus the builtins
    pub(crate) functions: FunctionTable,

    /// Set while a function body is being checked
    pub(crate) current_function: Option<FunctionContext>,

    /// Number of enclosing `while` loops
    pub(crate) loop_depth: usize,
}

impl Default for StaticChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticChecker {
    pub fn new() -> Self {
        StaticChecker {
            env: Environment::new(),
            functions: FunctionTable::with_builtins(),
            current_function: None,
            loop_depth: 0,
        }
    }

    /// Check `program`, annotating and folding it in place.
    ///
    /// Runs three passes: global declarations, function signatures, then
    /// function bodies. The first violated rule aborts the run.
    pub fn check_program(&mut self, program: &mut Program) -> Result<(), SemanticError> {
        debug!("checking global declarations");
        for unit in program.units.iter_mut() {
            if let CompUnit::Decl(decl) = unit {
                self.check_decl(decl)?;
            }
        }

        debug!("registering function signatures");
        for unit in program.units.iter_mut() {
            if let CompUnit::Function(func) = unit {
                self.register_function(func)?;
            }
        }

        debug!("checking function bodies");
        for unit in program.units.iter_mut() {
            if let CompUnit::Function(func) = unit {
                debug!("checking body of '{}'", func.name);
                self.check_function_body(func)?;
            }
        }

        Ok(())
    }

    /// Signatures registered so far, builtins included
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn into_functions(self) -> FunctionTable {
        self.functions
    }

    /// Check a function body in a fresh scope seeded with its parameters
    fn check_function_body(&mut self, func: &mut FunctionDef) -> Result<(), SemanticError> {
        let signature = self
            .functions
            .get(&func.name)
            .cloned()
            .ok_or_else(|| SemanticError::UndefinedFunction {
                name: func.name.clone(),
                location: func.location,
            })?;

        self.env.push_scope();
        for param in &signature.params {
            self.env.declare(&param.name, param.ty.clone());
        }
        self.current_function = Some(FunctionContext {
            name: func.name.clone(),
            return_type: signature.return_type,
        });
        self.loop_depth = 0;

        // Parameters share the body's outermost frame
        let result = self.check_block_items(&mut func.body.items);

        self.current_function = None;
        self.env.pop_scope();
        result
    }
}
