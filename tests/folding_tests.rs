// Constant folding tests

use sysyc::checker::SemanticError;
use sysyc::parser::ast::*;
use sysyc::types::value::Scalar;
use sysyc::{compile, CompileError};

/// Fold `expr` as the body of `int main() { return <expr>; }`
fn folded_return(prelude: &str, expr: &str) -> Expr {
    let source = format!("{prelude}\nint main() {{ return {expr}; }}");
    let checked = compile(&source).unwrap_or_else(|e| panic!("{}: {}", source, e));
    let main = checked
        .program
        .functions()
        .find(|f| f.name == "main")
        .expect("no main")
        .clone();
    match main.body.items.into_iter().last() {
        Some(BlockItem::Stmt(Stmt::Return { expr: Some(expr), .. })) => expr,
        other => panic!("expected a return, got {:?}", other),
    }
}

fn folds_to(prelude: &str, expr: &str) -> Option<Scalar> {
    folded_return(prelude, expr).literal_value()
}

fn global_value(source: &str, name: &str) -> Scalar {
    let checked = compile(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
    let value = checked
        .program
        .globals()
        .find(|d| d.name == name)
        .and_then(|d| d.resolved.as_ref())
        .and_then(|ty| ty.value())
        .unwrap_or_else(|| panic!("{} has no constant value", name));
    value
}

fn semantic_err(source: &str) -> SemanticError {
    match compile(source) {
        Err(CompileError::Semantic(e)) => e,
        other => panic!("expected a semantic error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_arithmetic_folds_to_single_literal() {
    let expr = folded_return("", "2 + 3 * 4");
    assert_eq!(expr.kind, ExprKind::IntLiteral(14));
    assert!(expr.ty.as_ref().unwrap().is_const);

    assert_eq!(folds_to("", "(2 + 3) * 4"), Some(Scalar::Int(20)));
    assert_eq!(folds_to("", "7 / 2 - 7 % 3"), Some(Scalar::Int(2)));
    assert_eq!(folds_to("", "-7 / 2"), Some(Scalar::Int(-3)));
    assert_eq!(folds_to("", "-(-5)"), Some(Scalar::Int(5)));
}

#[test]
fn test_logic_and_comparison_fold_to_int() {
    assert_eq!(folds_to("", "(1 < 2) && (3 == 3)"), Some(Scalar::Int(1)));
    assert_eq!(folds_to("", "1 > 2 || 0"), Some(Scalar::Int(0)));
    assert_eq!(folds_to("", "!5"), Some(Scalar::Int(0)));
    assert_eq!(folds_to("", "!0 + !0"), Some(Scalar::Int(2)));
}

#[test]
fn test_float_promotion() {
    assert_eq!(folds_to("", "1 + 0.5"), Some(Scalar::Float(1.5)));
    assert_eq!(folds_to("", "1.5 < 2"), Some(Scalar::Float(1.0)));
    assert_eq!(folds_to("", "!0.0"), Some(Scalar::Float(1.0)));
    assert_eq!(folds_to("", "7 / 2.0"), Some(Scalar::Float(3.5)));

    let inf = folds_to("", "1.0 / 0.0");
    assert!(matches!(inf, Some(Scalar::Float(x)) if x.is_infinite()));
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert_eq!(
        folds_to("", "2147483647 + 1"),
        Some(Scalar::Int(i32::MIN))
    );
    assert_eq!(folds_to("", "65536 * 65536"), Some(Scalar::Int(0)));
    assert_eq!(folds_to("", "-2147483648 / -1"), Some(Scalar::Int(i32::MIN)));
}

#[test]
fn test_const_scalars_propagate() {
    let prelude = "const int A = 6; const float B = A / 4;";
    assert_eq!(folds_to(prelude, "A * 2"), Some(Scalar::Int(12)));
    // 6 / 4 folds as int before the float conversion
    assert_eq!(folds_to(prelude, "B"), Some(Scalar::Float(1.0)));
    assert_eq!(global_value(prelude, "B"), Scalar::Float(1.0));
}

#[test]
fn test_const_array_reads_fold() {
    let prelude = "const int a[3] = {10, 20, 30};";
    assert_eq!(folds_to(prelude, "a[1]"), Some(Scalar::Int(20)));
    assert_eq!(folds_to(prelude, "a[0] + a[2]"), Some(Scalar::Int(40)));

    let prelude = "const int m[2][2] = {{1, 2}, {3, 4}}; const int k = 1;";
    assert_eq!(folds_to(prelude, "m[k][k - 1]"), Some(Scalar::Int(3)));
    assert_eq!(folds_to(prelude, "m[1][1] * m[0][1]"), Some(Scalar::Int(8)));
}

#[test]
fn test_partial_const_index_keeps_view() {
    // m[1] is still an array; only the final scalar read folds
    let prelude = "const int m[2][3] = {{1, 2, 3}, {4, 5, 6}};";
    assert_eq!(folds_to(prelude, "m[1][2]"), Some(Scalar::Int(6)));

    let expr = folded_return(prelude, "m[1][m[0][0]]");
    assert_eq!(expr.kind, ExprKind::IntLiteral(5));
}

#[test]
fn test_runtime_operands_are_not_folded() {
    let expr = folded_return("int g = 4;", "g + (1 + 2)");
    let ExprKind::Binary { lhs, rhs, .. } = &expr.kind else {
        panic!("expected a binary expression, got {:?}", expr.kind);
    };
    assert_eq!(lhs.kind, ExprKind::Variable("g".to_string()));
    // The constant right operand still collapses
    assert_eq!(rhs.kind, ExprKind::IntLiteral(3));
    assert!(!expr.ty.as_ref().unwrap().is_const);
}

#[test]
fn test_non_constant_index_into_const_array() {
    let expr = folded_return("const int a[3] = {1, 2, 3}; int i = 0;", "a[i]");
    assert!(matches!(expr.kind, ExprKind::Index { .. }));
    let ty = expr.ty.unwrap();
    assert!(!ty.is_const);
    assert!(!ty.is_lvalue);
}

#[test]
fn test_folding_errors() {
    assert!(matches!(
        semantic_err("const int x = 5 % 0;"),
        SemanticError::ModuloByZero { .. }
    ));
    assert!(matches!(
        semantic_err("const int x = 5 / (2 - 2);"),
        SemanticError::DivisionByZero { .. }
    ));
    assert!(matches!(
        semantic_err("const float f = 5.0 % 2;"),
        SemanticError::FloatModulo { .. }
    ));
    assert!(matches!(
        semantic_err("const int a[3] = {10, 20, 30}; int main() { return a[3]; }"),
        SemanticError::IndexOutOfBounds { index: 3, extent: 3, .. }
    ));
}

#[test]
fn test_dimension_expressions_fold() {
    let checked = compile("const int N = 2; int a[N * 2][N + 1.5];").unwrap();
    let decl = checked.program.globals().find(|d| d.name == "a").unwrap();
    assert_eq!(decl.resolved.as_ref().unwrap().dims, vec![4, 3]);
    assert!(decl.ty.dims.iter().all(|d| matches!(d.kind, ExprKind::IntLiteral(_))));
}

#[test]
fn test_replacement_keeps_source_location() {
    let expr = folded_return("", "1 + 2");
    // The literal sits where the `+` operator was
    assert_eq!(expr.location.line, 2);
    assert!(expr.location.column > 1);
}
