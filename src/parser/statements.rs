//! Statement parsing implementation
//!
//! This module handles blocks and every statement form:
//!
//! - Compound statements: `{ ... }` mixing declarations and statements
//! - Control flow: `if`/`else`, `while`
//! - Jump statements: `return`, `break`, `continue`
//! - Expression and empty statements
//!
//! # Grammar
//!
//! ```text
//! block     ::= "{" (decl_list | statement)* "}"
//! statement ::= block | if_stmt | while_stmt | return_stmt
//!             | "break" ";" | "continue" ";" | ";" | expr ";"
//! if_stmt   ::= "if" "(" expr ")" statement ("else" statement)?
//! ```
//!
//! A dangling `else` binds to the nearest unmatched `if`, which falls out of
//! parsing the `else` greedily right after the then-branch.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a brace-delimited block
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let location = self.current_location();
        self.expect_lbrace("to start block")?;

        let mut items = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            if self.is_decl_start() {
                items.extend(self.parse_declaration()?.into_iter().map(BlockItem::Decl));
            } else {
                items.push(BlockItem::Stmt(self.parse_statement()?));
            }
        }

        self.expect_rbrace("after block")?;
        Ok(Block { items, location })
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        match self.peek() {
            Token::LBrace(_) => return Ok(Stmt::Block(self.parse_block()?)),
            Token::If(_) => return self.parse_if_statement(),
            Token::While(_) => return self.parse_while_statement(),
            Token::Return(_) => return self.parse_return_statement(),
            _ => {}
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(Stmt::Empty { location: loc });
        }

        if self.match_token(&Token::Break(loc)) {
            self.expect_semicolon("after 'break'")?;
            return Ok(Stmt::Break { location: loc });
        }

        if self.match_token(&Token::Continue(loc)) {
            self.expect_semicolon("after 'continue'")?;
            return Ok(Stmt::Continue { location: loc });
        }

        if self.is_decl_start() {
            return Err(self.error_here("Declaration is not allowed as a statement body"));
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Stmt::Expr {
            expr,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        self.advance(); // 'if'
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        self.advance(); // 'while'
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        self.advance(); // 'return'

        if self.match_token(&Token::Semicolon(self.current_location())) {
            return Ok(Stmt::Return {
                expr: None,
                location,
            });
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon("after return value")?;

        Ok(Stmt::Return {
            expr: Some(expr),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::{ParseError, Parser};

    fn body(source: &str) -> Result<Block, ParseError> {
        let wrapped = format!("void f() {}", source);
        let program = Parser::new(&wrapped)?.parse_program()?;
        let body = program.functions().next().unwrap().body.clone();
        Ok(body)
    }

    #[test]
    fn test_block_mixes_declarations_and_statements() {
        let block = body("{ int a = 1, b; const float c = 2.0; a = b; ; { } }").unwrap();
        assert_eq!(block.items.len(), 6);
        assert!(matches!(&block.items[0], BlockItem::Decl(d) if d.name == "a"));
        assert!(matches!(&block.items[1], BlockItem::Decl(d) if d.name == "b"));
        assert!(matches!(&block.items[2], BlockItem::Decl(d) if d.is_const));
        assert!(matches!(&block.items[3], BlockItem::Stmt(Stmt::Expr { .. })));
        assert!(matches!(&block.items[4], BlockItem::Stmt(Stmt::Empty { .. })));
        assert!(matches!(&block.items[5], BlockItem::Stmt(Stmt::Block(_))));
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let block = body("{ if (a) if (b) x = 1; else x = 2; }").unwrap();
        let BlockItem::Stmt(Stmt::If {
            then_branch,
            else_branch,
            ..
        }) = &block.items[0]
        else {
            panic!("Expected if statement");
        };
        assert!(else_branch.is_none());
        assert!(matches!(
            then_branch.as_ref(),
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_while_with_jumps() {
        let block = body("{ while (1) { break; continue; } }").unwrap();
        let BlockItem::Stmt(Stmt::While { body, .. }) = &block.items[0] else {
            panic!("Expected while statement");
        };
        let Stmt::Block(inner) = body.as_ref() else {
            panic!("Expected block body");
        };
        assert!(matches!(inner.items[0], BlockItem::Stmt(Stmt::Break { .. })));
        assert!(matches!(inner.items[1], BlockItem::Stmt(Stmt::Continue { .. })));
    }

    #[test]
    fn test_return_forms() {
        let block = body("{ return; return 1 + 2; }").unwrap();
        assert!(matches!(
            block.items[0],
            BlockItem::Stmt(Stmt::Return { expr: None, .. })
        ));
        assert!(matches!(
            block.items[1],
            BlockItem::Stmt(Stmt::Return { expr: Some(_), .. })
        ));
    }

    #[test]
    fn test_statement_errors() {
        for source in [
            "{ if a) x = 1; }",
            "{ while (1 x = 1; }",
            "{ break }",
            "{ if (1) int x; }",
            "{ x = 1 }",
            "{ else x = 1; }",
            "{",
        ] {
            assert!(body(source).is_err(), "{source} should not parse");
        }
    }
}
