use crate::checker::engine::StaticChecker;
use crate::checker::errors::SemanticError;
use crate::parser::ast::{BaseType, BinOp, SourceLocation};
use crate::types::value::Scalar;

impl StaticChecker {
    /// Result base type of a binary operator: float if either side is float
    pub(crate) fn promote(lhs: BaseType, rhs: BaseType) -> BaseType {
        if lhs == BaseType::Float || rhs == BaseType::Float {
            BaseType::Float
        } else {
            BaseType::Int
        }
    }

    /// Evaluate `lhs op rhs` on two literals.
    ///
    /// Integer arithmetic wraps; float arithmetic follows IEEE. Comparisons
    /// and logical operators yield `0`/`1` in the promoted type.
    pub(crate) fn fold_binary(
        op: BinOp,
        lhs: Scalar,
        rhs: Scalar,
        location: SourceLocation,
    ) -> Result<Scalar, SemanticError> {
        match Self::promote(lhs.base_type(), rhs.base_type()) {
            BaseType::Float => Self::fold_float(op, lhs, rhs, location),
            _ => Self::fold_int(op, lhs, rhs, location),
        }
    }

    fn fold_int(
        op: BinOp,
        lhs: Scalar,
        rhs: Scalar,
        location: SourceLocation,
    ) -> Result<Scalar, SemanticError> {
        let (a, b) = (lhs.as_int(), rhs.as_int());
        let value = match op {
            BinOp::Add => a.wrapping_add(b),
            BinOp::Sub => a.wrapping_sub(b),
            BinOp::Mul => a.wrapping_mul(b),
            BinOp::Div => {
                if b == 0 {
                    return Err(SemanticError::DivisionByZero { location });
                }
                a.wrapping_div(b)
            }
            BinOp::Mod => {
                if b == 0 {
                    return Err(SemanticError::ModuloByZero { location });
                }
                a.wrapping_rem(b)
            }
            BinOp::Eq => (a == b) as i32,
            BinOp::Ne => (a != b) as i32,
            BinOp::Lt => (a < b) as i32,
            BinOp::Le => (a <= b) as i32,
            BinOp::Gt => (a > b) as i32,
            BinOp::Ge => (a >= b) as i32,
            BinOp::And => (lhs.is_truthy() && rhs.is_truthy()) as i32,
            BinOp::Or => (lhs.is_truthy() || rhs.is_truthy()) as i32,
        };
        Ok(Scalar::Int(value))
    }

    fn fold_float(
        op: BinOp,
        lhs: Scalar,
        rhs: Scalar,
        location: SourceLocation,
    ) -> Result<Scalar, SemanticError> {
        let (a, b) = (lhs.as_float(), rhs.as_float());
        let truth = |cond: bool| if cond { 1.0 } else { 0.0 };
        let value = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
            BinOp::Mod => return Err(SemanticError::FloatModulo { location }),
            BinOp::Eq => truth(a == b),
            BinOp::Ne => truth(a != b),
            BinOp::Lt => truth(a < b),
            BinOp::Le => truth(a <= b),
            BinOp::Gt => truth(a > b),
            BinOp::Ge => truth(a >= b),
            BinOp::And => truth(lhs.is_truthy() && rhs.is_truthy()),
            BinOp::Or => truth(lhs.is_truthy() || rhs.is_truthy()),
        };
        Ok(Scalar::Float(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(op: BinOp, lhs: Scalar, rhs: Scalar) -> Result<Scalar, SemanticError> {
        StaticChecker::fold_binary(op, lhs, rhs, SourceLocation::default())
    }

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(fold(BinOp::Add, Scalar::Int(2), Scalar::Int(12)), Ok(Scalar::Int(14)));
        assert_eq!(fold(BinOp::Sub, Scalar::Int(2), Scalar::Int(5)), Ok(Scalar::Int(-3)));
        assert_eq!(fold(BinOp::Div, Scalar::Int(-7), Scalar::Int(2)), Ok(Scalar::Int(-3)));
        assert_eq!(fold(BinOp::Mod, Scalar::Int(-7), Scalar::Int(2)), Ok(Scalar::Int(-1)));
    }

    #[test]
    fn test_int_arithmetic_wraps() {
        assert_eq!(
            fold(BinOp::Add, Scalar::Int(i32::MAX), Scalar::Int(1)),
            Ok(Scalar::Int(i32::MIN))
        );
        assert_eq!(
            fold(BinOp::Div, Scalar::Int(i32::MIN), Scalar::Int(-1)),
            Ok(Scalar::Int(i32::MIN))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            fold(BinOp::Div, Scalar::Int(1), Scalar::Int(0)),
            Err(SemanticError::DivisionByZero { .. })
        ));
        assert!(matches!(
            fold(BinOp::Mod, Scalar::Int(5), Scalar::Int(0)),
            Err(SemanticError::ModuloByZero { .. })
        ));
        // IEEE semantics for floats
        assert_eq!(
            fold(BinOp::Div, Scalar::Float(1.0), Scalar::Int(0)),
            Ok(Scalar::Float(f32::INFINITY))
        );
    }

    #[test]
    fn test_float_modulo_is_rejected() {
        assert!(matches!(
            fold(BinOp::Mod, Scalar::Float(5.0), Scalar::Int(2)),
            Err(SemanticError::FloatModulo { .. })
        ));
        assert!(matches!(
            fold(BinOp::Mod, Scalar::Int(5), Scalar::Float(2.0)),
            Err(SemanticError::FloatModulo { .. })
        ));
    }

    #[test]
    fn test_comparisons_and_logic() {
        assert_eq!(fold(BinOp::Lt, Scalar::Int(1), Scalar::Int(2)), Ok(Scalar::Int(1)));
        assert_eq!(fold(BinOp::Eq, Scalar::Int(3), Scalar::Int(4)), Ok(Scalar::Int(0)));
        assert_eq!(fold(BinOp::And, Scalar::Int(1), Scalar::Int(1)), Ok(Scalar::Int(1)));
        assert_eq!(fold(BinOp::Or, Scalar::Int(0), Scalar::Int(0)), Ok(Scalar::Int(0)));
        assert_eq!(
            fold(BinOp::Ge, Scalar::Float(2.5), Scalar::Int(2)),
            Ok(Scalar::Float(1.0))
        );
        assert_eq!(
            fold(BinOp::And, Scalar::Float(0.0), Scalar::Int(1)),
            Ok(Scalar::Float(0.0))
        );
    }

    #[test]
    fn test_logic_uses_operand_truthiness() {
        // A fractional float is true even though it truncates to zero
        assert_eq!(
            fold(BinOp::And, Scalar::Float(0.25), Scalar::Int(3)),
            Ok(Scalar::Float(1.0))
        );
        assert_eq!(
            fold(BinOp::Or, Scalar::Int(0), Scalar::Float(-0.5)),
            Ok(Scalar::Float(1.0))
        );
        assert_eq!(fold(BinOp::Or, Scalar::Int(-4), Scalar::Int(0)), Ok(Scalar::Int(1)));
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        assert_eq!(
            fold(BinOp::Mul, Scalar::Int(3), Scalar::Float(0.5)),
            Ok(Scalar::Float(1.5))
        );
        assert_eq!(StaticChecker::promote(BaseType::Int, BaseType::Int), BaseType::Int);
        assert_eq!(StaticChecker::promote(BaseType::Int, BaseType::Float), BaseType::Float);
    }
}
