//! Expression parsing implementation
//!
//! This module parses expressions with precedence climbing driven by
//! explicit binding powers. Higher numbers bind tighter:
//!
//! | Operators            | Kind    | Left | Right |
//! |----------------------|---------|------|-------|
//! | `=`                  | infix   | 2    | 1     |
//! | `\|\|`               | infix   | 3    | 4     |
//! | `&&`                 | infix   | 5    | 6     |
//! | `==` `!=`            | infix   | 7    | 8     |
//! | `<` `>` `<=` `>=`    | infix   | 9    | 10    |
//! | `+` `-`              | infix   | 11   | 12    |
//! | `*` `/` `%`          | infix   | 13   | 14    |
//! | `+` `-` `!`          | prefix  |      | 15    |
//! | `[...]` `(...)`      | postfix | 17   |       |
//!
//! Assignment has its left power above its right, making it right-associative;
//! every other infix operator is left-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// Infix operator recognised at the current token
#[derive(Debug, Clone, Copy)]
enum Infix {
    Assign,
    Binary(BinOp),
}

const PREFIX_BP: u8 = 15;
const POSTFIX_BP: u8 = 17;

fn infix_binding_power(token: &Token) -> Option<(Infix, u8, u8)> {
    let (op, l_bp, r_bp) = match token {
        Token::Eq(_) => return Some((Infix::Assign, 2, 1)),
        Token::OrOr(_) => (BinOp::Or, 3, 4),
        Token::AndAnd(_) => (BinOp::And, 5, 6),
        Token::EqEq(_) => (BinOp::Eq, 7, 8),
        Token::NotEq(_) => (BinOp::Ne, 7, 8),
        Token::Lt(_) => (BinOp::Lt, 9, 10),
        Token::Gt(_) => (BinOp::Gt, 9, 10),
        Token::Le(_) => (BinOp::Le, 9, 10),
        Token::Ge(_) => (BinOp::Ge, 9, 10),
        Token::Plus(_) => (BinOp::Add, 11, 12),
        Token::Minus(_) => (BinOp::Sub, 11, 12),
        Token::Star(_) => (BinOp::Mul, 13, 14),
        Token::Slash(_) => (BinOp::Div, 13, 14),
        Token::Percent(_) => (BinOp::Mod, 13, 14),
        _ => return None,
    };
    Some((Infix::Binary(op), l_bp, r_bp))
}

fn prefix_operator(token: &Token) -> Option<UnOp> {
    match token {
        Token::Plus(_) => Some(UnOp::Plus),
        Token::Minus(_) => Some(UnOp::Neg),
        Token::Bang(_) => Some(UnOp::Not),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// Parse an expression whose operators all bind at least as tightly as `min_bp`
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let loc = self.current_location();

            if matches!(self.peek(), Token::LBracket(_) | Token::LParen(_)) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            let Some((infix, l_bp, r_bp)) = infix_binding_power(self.peek()) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();

            let rhs = Box::new(self.parse_expr_bp(r_bp)?);
            let kind = match infix {
                Infix::Assign => ExprKind::Assign {
                    lhs: Box::new(lhs),
                    rhs,
                },
                Infix::Binary(op) => ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs,
                },
            };
            lhs = Expr::new(kind, loc);
        }

        Ok(lhs)
    }

    /// Parse a prefix operator application or a primary expression
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        if let Some(op) = prefix_operator(self.peek()) {
            self.advance();
            let operand = Box::new(self.parse_expr_bp(PREFIX_BP)?);
            return Ok(Expr::new(ExprKind::Unary { op, operand }, loc));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, _) => {
                self.advance();
                Ok(Expr::new(ExprKind::IntLiteral(n), loc))
            }
            Token::FloatLiteral(x, _) => {
                self.advance();
                Ok(Expr::new(ExprKind::FloatLiteral(x), loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::new(ExprKind::Variable(name), loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.error_here("Expected expression")),
        }
    }

    /// Parse one `[index]` or `(args)` suffix applied to `base`
    fn parse_postfix(&mut self, base: Expr) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::LBracket(loc)) {
            let index = Box::new(self.parse_expression()?);
            self.expect_rbracket("after array index")?;
            return Ok(Expr::new(
                ExprKind::Index {
                    array: Box::new(base),
                    index,
                },
                loc,
            ));
        }

        self.expect_lparen("to start argument list")?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after arguments")?;

        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(base),
                args,
            },
            loc,
        ))
    }
}
