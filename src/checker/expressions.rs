//! Expression checking and constant folding
//!
//! Every visit returns a [`Folded`]: either the node's type, or a literal
//! value that replaces the node. [`StaticChecker::check_expr`] applies the
//! result to the slot that owns the node, so constants collapse bottom-up in
//! a single pass (`2 + 3 * 4` becomes the literal `14`).
//!
//! # Rules
//!
//! - Variables resolve through the scope stack; const scalars fold to their value
//! - Operands of unary and binary operators must be non-void scalars
//! - Binary results promote to float if either side is float
//! - Assignment needs a non-const scalar lvalue on the left
//! - Calls resolve by name in the function table; array arguments may differ
//!   from the parameter only in their outermost extent
//! - Indexing a const array with a literal index reads the constant buffer

use crate::checker::engine::{Folded, StaticChecker};
use crate::checker::errors::SemanticError;
use crate::parser::ast::*;
use crate::types::value::Scalar;
use crate::types::var_type::VarType;

impl StaticChecker {
    /// Check the expression in `slot`, folding it in place. Returns its type.
    pub(crate) fn check_expr(&mut self, slot: &mut Expr) -> Result<VarType, SemanticError> {
        let folded = self.visit_expr(slot)?;
        Ok(folded.apply(slot))
    }

    pub(crate) fn visit_expr(&mut self, expr: &mut Expr) -> Result<Folded, SemanticError> {
        let location = expr.location;

        match &mut expr.kind {
            ExprKind::IntLiteral(n) => Ok(Folded::Unchanged(VarType::constant(Scalar::Int(*n)))),
            ExprKind::FloatLiteral(x) => {
                Ok(Folded::Unchanged(VarType::constant(Scalar::Float(*x))))
            }
            ExprKind::Variable(name) => self.visit_variable(name, location),
            ExprKind::Unary { op, operand } => self.visit_unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.visit_binary(*op, lhs, rhs, location),
            ExprKind::Assign { lhs, rhs } => self.visit_assign(lhs, rhs),
            ExprKind::Call { callee, args } => self.visit_call(callee, args, location),
            ExprKind::Index { array, index } => self.visit_index(array, index, location),
        }
    }

    fn visit_variable(&self, name: &str, location: SourceLocation) -> Result<Folded, SemanticError> {
        let ty = self
            .env
            .lookup(name)
            .ok_or_else(|| SemanticError::UndefinedVariable {
                name: name.to_string(),
                location,
            })?;

        if ty.is_const {
            if let Some(value) = ty.value() {
                return Ok(Folded::Replace(value));
            }
        }
        Ok(Folded::Unchanged(ty.clone()))
    }

    fn visit_unary(&mut self, op: UnOp, operand: &mut Expr) -> Result<Folded, SemanticError> {
        let ty = self.check_expr(operand)?;
        Self::require_scalar(&ty, "unary operator", operand.location)?;

        if let Some(value) = operand.literal_value() {
            return Ok(Folded::Replace(Self::fold_unary(op, value)));
        }
        Ok(Folded::Unchanged(VarType::scalar(ty.base)))
    }

    fn visit_binary(
        &mut self,
        op: BinOp,
        lhs: &mut Expr,
        rhs: &mut Expr,
        location: SourceLocation,
    ) -> Result<Folded, SemanticError> {
        let lt = self.check_expr(lhs)?;
        Self::require_scalar(&lt, "binary operator", lhs.location)?;
        let rt = self.check_expr(rhs)?;
        Self::require_scalar(&rt, "binary operator", rhs.location)?;

        let base = Self::promote(lt.base, rt.base);
        if op == BinOp::Mod && base == BaseType::Float {
            return Err(SemanticError::FloatModulo { location });
        }

        // Rejected even when the dividend is only known at run time
        let zero_divisor = rhs.literal_value().is_some_and(|v| v.is_zero());
        if base == BaseType::Int && zero_divisor {
            match op {
                BinOp::Div => return Err(SemanticError::DivisionByZero { location }),
                BinOp::Mod => return Err(SemanticError::ModuloByZero { location }),
                _ => {}
            }
        }

        match (lhs.literal_value(), rhs.literal_value()) {
            (Some(a), Some(b)) => Ok(Folded::Replace(Self::fold_binary(op, a, b, location)?)),
            _ => Ok(Folded::Unchanged(VarType::scalar(base))),
        }
    }

    fn visit_assign(&mut self, lhs: &mut Expr, rhs: &mut Expr) -> Result<Folded, SemanticError> {
        let lt = self.check_expr(lhs)?;
        let location = lhs.location;

        if lt.is_array() {
            return Err(SemanticError::AssignToArray { location });
        }
        if lt.is_const {
            return Err(SemanticError::AssignToConst { location });
        }
        if !lt.is_lvalue {
            return Err(SemanticError::AssignToRvalue { location });
        }

        let rt = self.check_expr(rhs)?;
        Self::require_scalar(&rt, "assignment", rhs.location)?;

        Ok(Folded::Unchanged(VarType::scalar(lt.base)))
    }

    fn visit_call(
        &mut self,
        callee: &mut Expr,
        args: &mut [Expr],
        location: SourceLocation,
    ) -> Result<Folded, SemanticError> {
        let ExprKind::Variable(name) = &callee.kind else {
            return Err(SemanticError::NotCallable { location });
        };
        let signature = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| SemanticError::UndefinedFunction {
                name: name.clone(),
                location: callee.location,
            })?;
        let name = name.clone();
        callee.ty = Some(signature.result_type());

        if args.len() != signature.params.len() {
            return Err(SemanticError::ArgumentCountMismatch {
                function: name,
                expected: signature.params.len(),
                got: args.len(),
                location,
            });
        }

        for (position, (arg, param)) in args.iter_mut().zip(&signature.params).enumerate() {
            let at = self.check_expr(arg)?;
            if at.is_void() {
                return Err(SemanticError::VoidValue {
                    context: "function argument",
                    location: arg.location,
                });
            }

            let pt = &param.ty;
            let same_shape =
                at.dims.len() == pt.dims.len() && at.dims.get(1..) == pt.dims.get(1..);
            if !same_shape {
                return Err(SemanticError::ArgumentShapeMismatch {
                    function: name,
                    position: position + 1,
                    expected: pt.to_string(),
                    got: at.to_string(),
                    location: arg.location,
                });
            }
            if pt.is_array() && at.base != pt.base {
                return Err(SemanticError::ArgumentBaseMismatch {
                    function: name,
                    position: position + 1,
                    expected: pt.base,
                    got: at.base,
                    location: arg.location,
                });
            }
        }

        Ok(Folded::Unchanged(signature.result_type()))
    }

    fn visit_index(
        &mut self,
        array: &mut Expr,
        index: &mut Expr,
        location: SourceLocation,
    ) -> Result<Folded, SemanticError> {
        let at = self.check_expr(array)?;
        if !at.is_array() {
            return Err(SemanticError::IndexNonArray { location });
        }

        let it = self.check_expr(index)?;
        if it.is_void() {
            return Err(SemanticError::VoidValue {
                context: "array index",
                location: index.location,
            });
        }
        if it.is_array() {
            return Err(SemanticError::ArrayOperand {
                context: "array index",
                location: index.location,
            });
        }

        let Some(value) = index.literal_value() else {
            return Ok(Folded::Unchanged(at.element_type()));
        };

        let i = value.as_int();
        if let Scalar::Float(_) = value {
            *index = Expr::literal(Scalar::Int(i), index.location);
        }

        // Only constant arrays have a known extent to check against
        if !at.has_data() {
            return Ok(Folded::Unchanged(at.element_type()));
        }

        let out_of_bounds = || SemanticError::IndexOutOfBounds {
            index: i,
            extent: at.dims[0],
            location,
        };
        if !at.in_bounds(i) {
            return Err(out_of_bounds());
        }

        let view = at.index_const(i).ok_or_else(out_of_bounds)?;
        match view.value() {
            Some(element) => Ok(Folded::Replace(element)),
            None => Ok(Folded::Unchanged(view)),
        }
    }

    /// Reject void and array operands
    fn require_scalar(
        ty: &VarType,
        context: &'static str,
        location: SourceLocation,
    ) -> Result<(), SemanticError> {
        if ty.is_void() {
            return Err(SemanticError::VoidValue { context, location });
        }
        if ty.is_array() {
            return Err(SemanticError::ArrayOperand { context, location });
        }
        Ok(())
    }
}
