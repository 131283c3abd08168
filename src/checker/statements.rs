//! Statement checking
//!
//! Blocks open a scope; control-flow statements validate their conditions and
//! track loop nesting so `break`/`continue` can be placed; `return` is checked
//! against the enclosing function's return type.

use crate::checker::engine::StaticChecker;
use crate::checker::errors::SemanticError;
use crate::parser::ast::*;

impl StaticChecker {
    /// Check block items in the current scope
    pub(crate) fn check_block_items(&mut self, items: &mut [BlockItem]) -> Result<(), SemanticError> {
        for item in items.iter_mut() {
            match item {
                BlockItem::Decl(decl) => self.check_decl(decl)?,
                BlockItem::Stmt(stmt) => self.check_stmt(stmt)?,
            }
        }
        Ok(())
    }

    /// Check a nested block in its own scope
    fn check_block(&mut self, block: &mut Block) -> Result<(), SemanticError> {
        self.env.push_scope();
        let result = self.check_block_items(&mut block.items);
        self.env.pop_scope();
        result
    }

    pub(crate) fn check_stmt(&mut self, stmt: &mut Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Empty { .. } => Ok(()),
            Stmt::Expr { expr, .. } => {
                self.check_expr(expr)?;
                Ok(())
            }
            Stmt::Block(block) => self.check_block(block),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(condition)?;
                self.check_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch)?;
                }
                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.check_condition(condition)?;
                self.loop_depth += 1;
                let result = self.check_stmt(body);
                self.loop_depth -= 1;
                result
            }
            Stmt::Break { location } => self.check_loop_control("break", *location),
            Stmt::Continue { location } => self.check_loop_control("continue", *location),
            Stmt::Return { expr, location } => self.check_return(expr.as_mut(), *location),
        }
    }

    /// Conditions must be non-void scalars
    fn check_condition(&mut self, condition: &mut Expr) -> Result<(), SemanticError> {
        let ty = self.check_expr(condition)?;
        if ty.is_void() || ty.is_array() {
            return Err(SemanticError::ConditionNotScalar {
                location: condition.location,
            });
        }
        Ok(())
    }

    fn check_loop_control(
        &self,
        keyword: &'static str,
        location: SourceLocation,
    ) -> Result<(), SemanticError> {
        if self.loop_depth == 0 {
            return Err(SemanticError::LoopControlOutsideLoop { keyword, location });
        }
        Ok(())
    }

    fn check_return(
        &mut self,
        expr: Option<&mut Expr>,
        location: SourceLocation,
    ) -> Result<(), SemanticError> {
        // A bare `return;` is accepted everywhere
        let Some(expr) = expr else {
            return Ok(());
        };

        let ty = self.check_expr(expr)?;
        if ty.is_array() {
            return Err(SemanticError::ReturnArray {
                location: expr.location,
            });
        }

        let Some(function) = &self.current_function else {
            return Ok(());
        };
        if function.return_type == BaseType::Void {
            return Err(SemanticError::ReturnValueFromVoid {
                function: function.name.clone(),
                location,
            });
        }
        if ty.is_void() {
            return Err(SemanticError::ReturnVoidValue {
                function: function.name.clone(),
                location: expr.location,
            });
        }
        Ok(())
    }
}
