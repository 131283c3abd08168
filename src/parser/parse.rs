//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: compilation units, variable declarations, function definitions
//! - `statements`: blocks and statements (`if`, `while`, `return`, ...)
//! - `expressions`: expressions via precedence climbing over binding powers
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Parsing is fail-fast: the first mismatch aborts with a [`ParseError`] and
//! no partial program is returned.

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token};
use log::debug;
use thiserror::Error;

/// Syntax error with the position of the offending token
#[derive(Debug, Clone, PartialEq, Error)]
#[error("At line {}, column {}: {}", .location.line, .location.column, .message)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }
}

/// Recursive descent parser for SysY
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    /// Lex `source` and prepare to parse it.
    ///
    /// Fails at the first malformed token.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize();
        Self::from_tokens(tokens)
    }

    /// Parse an externally produced token stream.
    ///
    /// A missing trailing [`Token::Eof`] is supplied; any [`Token::LexError`]
    /// is reported as a syntax error at its position.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Result<Self, ParseError> {
        if let Some(Token::LexError(message, location)) =
            tokens.iter().find(|t| matches!(t, Token::LexError(..)))
        {
            return Err(ParseError::new(message.clone(), *location));
        }

        if !matches!(tokens.last(), Some(Token::Eof(_))) {
            let end = tokens.last().map(Token::location).unwrap_or_default();
            tokens.push(Token::Eof(end));
        }

        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program (sequence of compilation units)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            // Stray ';' between units
            if self.match_token(&Token::Semicolon(self.current_location())) {
                continue;
            }
            self.parse_comp_unit(&mut program.units)?;
        }

        debug!("parsed {} compilation units", program.units.len());
        Ok(program)
    }

    // ===== Helper methods =====

    /// `const`, `int` or `float`: the start of a variable declaration
    pub(crate) fn is_decl_start(&self) -> bool {
        matches!(
            self.peek(),
            Token::Const(_) | Token::Int(_) | Token::Float(_)
        )
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// Error pointing at the current token
    pub(crate) fn error_here(&self, message: &str) -> ParseError {
        ParseError::new(
            format!("{}, found {}", message, self.peek()),
            self.current_location(),
        )
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBracket(self.current_location()),
            &format!("Expected ']' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here("Expected identifier"))
        }
    }
}
