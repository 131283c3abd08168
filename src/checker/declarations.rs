//! Declaration checking
//!
//! This module handles everything that introduces a name:
//! - Variable declarations: dimension resolution, initializer validation and,
//!   for constants, materialisation of the flattened value buffer
//! - Function signatures: registered in the signature pass so bodies can
//!   call functions defined later in the file
//!
//! # Initializer flattening
//!
//! Brace lists are laid out row-major. A bare expression fills the next slot;
//! a nested list first advances to the next boundary of the current
//! sub-array, then fills exactly one sub-array of the next dimension. Slots
//! without an initializer are zero.

use crate::checker::engine::StaticChecker;
use crate::checker::errors::SemanticError;
use crate::checker::functions::{FunctionSignature, ParamSig};
use crate::parser::ast::*;
use crate::types::{checked_element_count, element_count};
use crate::types::value::Scalar;
use crate::types::var_type::VarType;
use log::trace;
use rustc_hash::FxHashSet;

/// State threaded through one initializer walk
struct InitWalk<'a> {
    name: &'a str,
    base: BaseType,
    /// Leaves must fold to literals (constants and globals)
    require_constant: bool,
    /// Flattened values, present only when the declaration is const
    buffer: Option<Vec<Scalar>>,
}

impl StaticChecker {
    /// Check a variable declaration and add it to the innermost scope
    pub(crate) fn check_decl(&mut self, decl: &mut Decl) -> Result<(), SemanticError> {
        if self.env.contains_local(&decl.name) {
            return Err(SemanticError::Redefinition {
                name: decl.name.clone(),
                location: decl.location,
            });
        }

        let dims = self.resolve_dims(&mut decl.ty.dims)?;
        let count = checked_element_count(&dims).ok_or_else(|| SemanticError::ArrayTooLarge {
            name: decl.name.clone(),
            location: decl.location,
        })?;
        let mut ty = VarType::new(decl.is_const, true, decl.ty.base, dims);

        let mut walk = InitWalk {
            name: &decl.name,
            base: decl.ty.base,
            require_constant: decl.is_const || self.env.is_global(),
            buffer: decl
                .is_const
                .then(|| vec![Scalar::zero(decl.ty.base); count]),
        };

        if let Some(init) = decl.init.as_mut() {
            match init {
                Initializer::Expr(expr) if !ty.is_array() => {
                    self.check_init_leaf(&mut walk, expr, 0)?;
                }
                Initializer::Expr(expr) => {
                    return Err(SemanticError::ArrayNeedsBraces {
                        name: decl.name.clone(),
                        location: expr.location,
                    });
                }
                Initializer::List(_, location) if !ty.is_array() => {
                    return Err(SemanticError::ScalarBraceInitializer {
                        name: decl.name.clone(),
                        location: *location,
                    });
                }
                Initializer::List(items, _) => {
                    self.check_init_list(&mut walk, &ty.dims, items, 0)?;
                }
            }
        }

        if let Some(buffer) = walk.buffer {
            ty = ty.with_data(buffer);
        }

        trace!("declared '{}' as {}", decl.name, ty);
        decl.resolved = Some(ty.clone());
        self.env.declare(&decl.name, ty);
        Ok(())
    }

    /// Fold each dimension expression to a positive integer.
    ///
    /// Float dimensions are truncated and rewritten as int literals.
    pub(crate) fn resolve_dims(&mut self, dims: &mut [Expr]) -> Result<Vec<i32>, SemanticError> {
        let mut extents = Vec::with_capacity(dims.len());

        for dim in dims.iter_mut() {
            self.check_expr(dim)?;
            let value = dim
                .literal_value()
                .ok_or(SemanticError::NonConstantDimension {
                    location: dim.location,
                })?;

            let extent = value.as_int();
            if let Scalar::Float(_) = value {
                *dim = Expr::literal(Scalar::Int(extent), dim.location);
            }
            if extent <= 0 {
                return Err(SemanticError::NonPositiveDimension {
                    value: extent,
                    location: dim.location,
                });
            }
            extents.push(extent);
        }

        Ok(extents)
    }

    /// Walk one brace list covering a sub-array of shape `dims` that starts
    /// at flattened slot `start`
    fn check_init_list(
        &mut self,
        walk: &mut InitWalk<'_>,
        dims: &[i32],
        items: &mut [Initializer],
        start: usize,
    ) -> Result<(), SemanticError> {
        let size = element_count(dims);
        let stride = element_count(&dims[1..]);
        let mut pos = 0;

        for item in items.iter_mut() {
            match item {
                Initializer::Expr(expr) => {
                    if pos >= size {
                        return Err(SemanticError::TooManyInitializers {
                            name: walk.name.to_string(),
                            location: expr.location,
                        });
                    }
                    self.check_init_leaf(walk, expr, start + pos)?;
                    pos += 1;
                }
                Initializer::List(inner, location) => {
                    if dims.len() == 1 {
                        return Err(SemanticError::ExcessiveBraces {
                            name: walk.name.to_string(),
                            location: *location,
                        });
                    }
                    pos = pos.div_ceil(stride) * stride;
                    if pos >= size {
                        return Err(SemanticError::TooManyInitializers {
                            name: walk.name.to_string(),
                            location: *location,
                        });
                    }
                    self.check_init_list(walk, &dims[1..], inner, start + pos)?;
                    pos += stride;
                }
            }
        }

        Ok(())
    }

    /// Check one scalar initializer and store it at flattened slot `slot`
    fn check_init_leaf(
        &mut self,
        walk: &mut InitWalk<'_>,
        expr: &mut Expr,
        slot: usize,
    ) -> Result<(), SemanticError> {
        let ty = self.check_expr(expr)?;
        if ty.is_void() {
            return Err(SemanticError::VoidValue {
                context: "initializer",
                location: expr.location,
            });
        }
        if ty.is_array() {
            return Err(SemanticError::ArrayOperand {
                context: "initializer",
                location: expr.location,
            });
        }

        let value = expr.literal_value();
        if walk.require_constant && value.is_none() {
            return Err(SemanticError::NonConstantInitializer {
                name: walk.name.to_string(),
                location: expr.location,
            });
        }

        if let (Some(buffer), Some(value)) = (walk.buffer.as_mut(), value) {
            if let Some(cell) = buffer.get_mut(slot) {
                *cell = value.convert(walk.base);
            }
        }
        Ok(())
    }

    /// Validate a function's signature and record it in the function table
    pub(crate) fn register_function(&mut self, func: &mut FunctionDef) -> Result<(), SemanticError> {
        if self.functions.contains(&func.name) || self.env.contains_global(&func.name) {
            return Err(SemanticError::DuplicateGlobal {
                name: func.name.clone(),
                location: func.location,
            });
        }

        let mut seen = FxHashSet::default();
        let mut params = Vec::with_capacity(func.params.len());

        for param in func.params.iter_mut() {
            if !seen.insert(param.name.clone()) {
                return Err(SemanticError::DuplicateParameter {
                    function: func.name.clone(),
                    name: param.name.clone(),
                    location: param.location,
                });
            }

            let mut dims = Vec::with_capacity(param.ty.dims.len() + 1);
            if param.decays {
                dims.push(-1);
            }
            dims.extend(self.resolve_dims(&mut param.ty.dims)?);
            if checked_element_count(&dims[usize::from(param.decays)..]).is_none() {
                return Err(SemanticError::ArrayTooLarge {
                    name: param.name.clone(),
                    location: param.location,
                });
            }

            params.push(ParamSig {
                name: param.name.clone(),
                ty: VarType::new(false, true, param.ty.base, dims),
            });
        }

        trace!("registered function '{}' with {} params", func.name, params.len());
        self.functions.insert(
            &func.name,
            FunctionSignature {
                return_type: func.return_type,
                params,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn check(source: &str) -> Result<Program, SemanticError> {
        let mut program = Parser::new(source).unwrap().parse_program().unwrap();
        StaticChecker::new().check_program(&mut program)?;
        Ok(program)
    }

    fn global(program: &Program, name: &str) -> VarType {
        program
            .globals()
            .find(|d| d.name == name)
            .and_then(|d| d.resolved.clone())
            .unwrap()
    }

    fn ints(values: &[i32]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar::Int).collect()
    }

    #[test]
    fn test_const_buffer_flat_initializer() {
        let program = check("const int a[2][3] = {1, 2, 3, 4};").unwrap();
        let a = global(&program, "a");
        assert_eq!(a.dims, vec![2, 3]);
        assert_eq!(a.elements().unwrap(), ints(&[1, 2, 3, 4, 0, 0]).as_slice());
    }

    #[test]
    fn test_const_buffer_nested_initializer() {
        let program = check("const int a[3][2] = {{1}, 2, 3, {4, 5}};").unwrap();
        let a = global(&program, "a");
        assert_eq!(a.elements().unwrap(), ints(&[1, 0, 2, 3, 4, 5]).as_slice());
    }

    #[test]
    fn test_nested_list_aligns_to_next_row() {
        let program = check("const int a[3][2] = {1, {2, 3}, {4}};").unwrap();
        let a = global(&program, "a");
        assert_eq!(a.elements().unwrap(), ints(&[1, 0, 2, 3, 4, 0]).as_slice());
    }

    #[test]
    fn test_values_convert_to_base_type() {
        let program = check("const float f[2] = {1, 2.5}; const int i = 3.9;").unwrap();
        assert_eq!(
            global(&program, "f").elements().unwrap(),
            &[Scalar::Float(1.0), Scalar::Float(2.5)]
        );
        assert_eq!(global(&program, "i").value(), Some(Scalar::Int(3)));
    }

    #[test]
    fn test_float_dimension_is_truncated() {
        let program = check("int a[2.7];").unwrap();
        assert_eq!(global(&program, "a").dims, vec![2]);
        let decl = program.globals().next().unwrap();
        assert_eq!(decl.ty.dims[0].kind, ExprKind::IntLiteral(2));
    }

    #[test]
    fn test_dimension_from_constant() {
        let program = check("const int N = 4; int a[N * 2][N];").unwrap();
        assert_eq!(global(&program, "a").dims, vec![8, 4]);
    }

    #[test]
    fn test_dimension_errors() {
        assert!(matches!(
            check("int n = 3; int a[n];"),
            Err(SemanticError::NonConstantDimension { .. })
        ));
        assert!(matches!(
            check("int a[0];"),
            Err(SemanticError::NonPositiveDimension { value: 0, .. })
        ));
        assert!(matches!(
            check("int a[-2];"),
            Err(SemanticError::NonPositiveDimension { value: -2, .. })
        ));
    }

    #[test]
    fn test_oversized_arrays_are_rejected() {
        assert!(matches!(
            check("const int a[65536][65536][65536][65536] = {1};"),
            Err(SemanticError::ArrayTooLarge { .. })
        ));
        // Two rows of initializers must not trip the element-count arithmetic
        assert!(matches!(
            check("int a[2][2147483647][2147483647][2147483647] = {{1}, {2}};"),
            Err(SemanticError::ArrayTooLarge { .. })
        ));
        assert!(matches!(
            check("void f() { int big[1073741824]; }"),
            Err(SemanticError::ArrayTooLarge { .. })
        ));
        assert!(matches!(
            check("void f(int a[][2147483647][2147483647]) {}"),
            Err(SemanticError::ArrayTooLarge { .. })
        ));
        assert!(check("int a[1000][1000]; void f(int b[][65536]) {}").is_ok());
    }

    #[test]
    fn test_initializer_shape_errors() {
        assert!(matches!(
            check("int a[2] = {1, 2, 3};"),
            Err(SemanticError::TooManyInitializers { .. })
        ));
        assert!(matches!(
            check("int a[2][2] = {{1}, {2}, {3}};"),
            Err(SemanticError::TooManyInitializers { .. })
        ));
        assert!(matches!(
            check("int a[2] = {{1}, 2};"),
            Err(SemanticError::ExcessiveBraces { .. })
        ));
        assert!(matches!(
            check("int x = {1};"),
            Err(SemanticError::ScalarBraceInitializer { .. })
        ));
        assert!(matches!(
            check("int a[2] = 1;"),
            Err(SemanticError::ArrayNeedsBraces { .. })
        ));
    }

    #[test]
    fn test_global_initializers_must_be_constant() {
        assert!(matches!(
            check("int x = 1; int y = x;"),
            Err(SemanticError::NonConstantInitializer { .. })
        ));
        assert!(check("const int x = 1; int y = x + 1;").is_ok());
    }

    #[test]
    fn test_local_initializers_may_be_dynamic() {
        assert!(check("int f(int n) { int a[2] = {n, n + 1}; int b = a[0]; return b; }").is_ok());
        assert!(matches!(
            check("int f(int n) { const int c = n; return c; }"),
            Err(SemanticError::NonConstantInitializer { .. })
        ));
    }

    #[test]
    fn test_void_initializer_is_rejected() {
        assert!(matches!(
            check("void g() {} int f() { int x = g(); return x; }"),
            Err(SemanticError::VoidValue { .. })
        ));
    }

    #[test]
    fn test_redefinition() {
        assert!(matches!(
            check("int x; float x;"),
            Err(SemanticError::Redefinition { .. })
        ));
    }

    #[test]
    fn test_function_name_clashes() {
        assert!(matches!(
            check("int f; void f() {}"),
            Err(SemanticError::DuplicateGlobal { .. })
        ));
        assert!(matches!(
            check("void f() {} int f() { return 0; }"),
            Err(SemanticError::DuplicateGlobal { .. })
        ));
        assert!(matches!(
            check("void putint(int x) {}"),
            Err(SemanticError::DuplicateGlobal { .. })
        ));
        assert!(matches!(
            check("void f(int a, float a) {}"),
            Err(SemanticError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_string_initializer() {
        let program = check("const int s[4] = \"ab\";").unwrap();
        assert_eq!(global(&program, "s").elements().unwrap(), ints(&[97, 98, 0, 0]).as_slice());
    }
}
