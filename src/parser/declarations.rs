//! Declaration parsing implementation
//!
//! This module handles parsing of compilation units and everything that
//! introduces a name:
//!
//! - Variable declaration lists: `const int a = 1, b[2][3] = {{1}, {2}};`
//! - Initializers: scalar expressions, nested brace lists, string literals
//! - Function definitions: `int f(int a, float b[][4]) { ... }`
//!
//! # Grammar
//!
//! ```text
//! comp_unit   ::= decl_list | func_def
//! decl_list   ::= "const"? ("int" | "float") declarator ("," declarator)* ";"
//! declarator  ::= identifier ("[" expr "]")* ("=" init)?
//! init        ::= expr | string | "{" (init ("," init)* ","?)? "}"
//! func_def    ::= ("int" | "float" | "void") identifier "(" params ")" block
//! params      ::= "void" | (param ("," param)*)?
//! param       ::= ("int" | "float") identifier ("[" expr? "]" ("[" expr "]")*)?
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use log::trace;

impl Parser {
    /// Parse one top-level construct and append it to `units`.
    ///
    /// A declaration list contributes one unit per declarator.
    pub(crate) fn parse_comp_unit(&mut self, units: &mut Vec<CompUnit>) -> Result<(), ParseError> {
        let is_function = match self.peek() {
            Token::Void(_) => true,
            Token::Int(_) | Token::Float(_) => {
                matches!(self.peek_ahead(2), Some(Token::LParen(_)))
            }
            Token::Const(_) => false,
            _ => {
                return Err(self.error_here("Expected declaration or function definition"));
            }
        };

        if is_function {
            let func = self.parse_function_definition()?;
            trace!("parsed function '{}'", func.name);
            units.push(CompUnit::Function(func));
        } else {
            let decls = self.parse_declaration()?;
            units.extend(decls.into_iter().map(CompUnit::Decl));
        }
        Ok(())
    }

    /// Parse a full declaration list, including an optional leading `const`
    pub(crate) fn parse_declaration(&mut self) -> Result<Vec<Decl>, ParseError> {
        let is_const = self.match_token(&Token::Const(self.current_location()));
        let base = self.parse_var_base_type(is_const)?;
        let mut decls = Vec::new();

        loop {
            let location = self.current_location();
            let name = self.expect_identifier()?;
            let mut ty = Type::new(base);
            ty.dims = self.parse_dimensions()?;

            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_initializer()?)
            } else {
                None
            };

            decls.push(Decl {
                name,
                is_const,
                ty,
                init,
                location,
                resolved: None,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_semicolon("after variable declaration")?;
        Ok(decls)
    }

    /// `int` or `float`; variables can never be `void`
    fn parse_var_base_type(&mut self, after_const: bool) -> Result<BaseType, ParseError> {
        match self.peek() {
            Token::Int(_) => {
                self.advance();
                Ok(BaseType::Int)
            }
            Token::Float(_) => {
                self.advance();
                Ok(BaseType::Float)
            }
            _ if after_const => Err(self.error_here("Expected 'int' or 'float' after 'const'")),
            _ => Err(self.error_here("Expected 'int' or 'float'")),
        }
    }

    /// Zero or more `[expr]` suffixes
    fn parse_dimensions(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut dims = Vec::new();
        while self.match_token(&Token::LBracket(self.current_location())) {
            dims.push(self.parse_expression()?);
            self.expect_rbracket("after array dimension")?;
        }
        Ok(dims)
    }

    pub(crate) fn parse_initializer(&mut self) -> Result<Initializer, ParseError> {
        let loc = self.current_location();

        if let Token::StringLiteral(text, _) = self.peek_token() {
            self.advance();
            let chars = text
                .chars()
                .map(|c| Initializer::Expr(Expr::new(ExprKind::IntLiteral(c as i32), loc)))
                .collect();
            return Ok(Initializer::List(chars, loc));
        }

        if !self.match_token(&Token::LBrace(loc)) {
            return Ok(Initializer::Expr(self.parse_expression()?));
        }

        let mut items = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            items.push(self.parse_initializer()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rbrace("after initializer list")?;

        Ok(Initializer::List(items, loc))
    }

    /// Parse function definition: type name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> Result<FunctionDef, ParseError> {
        let location = self.current_location();
        let return_type = match self.peek() {
            Token::Int(_) => BaseType::Int,
            Token::Float(_) => BaseType::Float,
            Token::Void(_) => BaseType::Void,
            _ => return Err(self.error_here("Expected function return type")),
        };
        self.advance();

        let name = self.expect_identifier()?;
        self.expect_lparen("after function name")?;
        let params = self.parse_parameters()?;
        self.expect_rparen("after parameter list")?;

        let body = self.parse_block()?;

        Ok(FunctionDef {
            name,
            return_type,
            params,
            body,
            location,
        })
    }

    fn parse_parameters(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        // `(void)`
        if self.check(&Token::Void(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::RParen(_)))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            params.push(self.parse_parameter()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    fn parse_parameter(&mut self) -> Result<Param, ParseError> {
        let location = self.current_location();
        let base = match self.peek() {
            Token::Int(_) => BaseType::Int,
            Token::Float(_) => BaseType::Float,
            _ => return Err(self.error_here("Expected parameter type 'int' or 'float'")),
        };
        self.advance();

        let name = self.expect_identifier()?;
        let mut ty = Type::new(base);
        let mut decays = false;

        if self.match_token(&Token::LBracket(self.current_location())) {
            if self.match_token(&Token::RBracket(self.current_location())) {
                decays = true;
            } else {
                ty.dims.push(self.parse_expression()?);
                self.expect_rbracket("after array dimension")?;
            }
            // Only the first pair may be empty
            ty.dims.extend(self.parse_dimensions()?);
        }

        Ok(Param {
            name,
            ty,
            decays,
            location,
        })
    }
}
