use crate::checker::engine::StaticChecker;
use crate::parser::ast::UnOp;
use crate::types::value::Scalar;

impl StaticChecker {
    /// Evaluate a prefix operator on a literal, keeping the operand's base type
    pub(crate) fn fold_unary(op: UnOp, operand: Scalar) -> Scalar {
        match (op, operand) {
            (UnOp::Plus, value) => value,
            (UnOp::Neg, Scalar::Int(n)) => Scalar::Int(n.wrapping_neg()),
            (UnOp::Neg, Scalar::Float(x)) => Scalar::Float(-x),
            (UnOp::Not, value) => {
                Scalar::Int(!value.is_truthy() as i32).convert(value.base_type())
            }
        }
    }
}
