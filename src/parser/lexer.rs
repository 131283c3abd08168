//! Lexer (tokenizer) for SysY source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Malformed input never aborts tokenization: it is reported in-band as a
//! [`Token::LexError`] and lexing resumes after the offending text, so the
//! stream always ends with [`Token::Eof`].

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i32, SourceLocation),
    FloatLiteral(f32, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Const(SourceLocation),
    Int(SourceLocation),
    Float(SourceLocation),
    Void(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    Return(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Logical
    AndAnd(SourceLocation), // &&
    OrOr(SourceLocation),   // ||
    Bang(SourceLocation),   // !

    // Assignment
    Eq(SourceLocation), // =

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    /// Unrecognized character or malformed literal
    LexError(String, SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Const(loc)
            | Token::Int(loc)
            | Token::Float(loc)
            | Token::Void(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::Return(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::Bang(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::LexError(_, loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(x, _) => write!(f, "float literal {:?}", x),
            Token::StringLiteral(s, _) => write!(f, "string literal {:?}", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Const(_) => write!(f, "'const'"),
            Token::Int(_) => write!(f, "'int'"),
            Token::Float(_) => write!(f, "'float'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::Break(_) => write!(f, "'break'"),
            Token::Continue(_) => write!(f, "'continue'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::OrOr(_) => write!(f, "'||'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::LexError(message, _) => write!(f, "invalid token ({})", message),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error, surfaced to the parser as a [`Token::LexError`]
#[derive(Debug, Error)]
#[error("{message}")]
struct LexError {
    message: String,
    location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        LexError {
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for Token {
    fn from(err: LexError) -> Self {
        Token::LexError(err.message, err.location)
    }
}

/// Lexer for SysY source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The result always ends with [`Token::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            if let Err(err) = self.skip_whitespace_and_comments() {
                tokens.push(err.into());
                continue;
            }

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            let token = self.next_token().unwrap_or_else(Token::from);
            tokens.push(token);
        }

        tokens
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self
            .advance()
            .ok_or_else(|| LexError::new("Unexpected end of file", loc))?;

        match ch {
            '"' => self.string_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '=' => Ok(self.with_eq(loc, Token::EqEq, Token::Eq)),
            '!' => Ok(self.with_eq(loc, Token::NotEq, Token::Bang)),
            '<' => Ok(self.with_eq(loc, Token::Le, Token::Lt)),
            '>' => Ok(self.with_eq(loc, Token::Ge, Token::Gt)),
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Ok(Token::AndAnd(loc))
                } else {
                    Err(LexError::new("Expected '&&', found single '&'", loc))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Ok(Token::OrOr(loc))
                } else {
                    Err(LexError::new("Expected '||', found single '|'", loc))
                }
            }
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            _ => Err(LexError::new(format!("Unexpected character: '{}'", ch), loc)),
        }
    }

    /// Pick the two-character form if the next character is `=`
    fn with_eq(
        &mut self,
        loc: SourceLocation,
        double: fn(SourceLocation) -> Token,
        single: fn(SourceLocation) -> Token,
    ) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            double(loc)
        } else {
            single(loc)
        }
    }

    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(Token::StringLiteral(string, loc)),
                '\\' => {
                    let escaped = self.advance().ok_or_else(|| {
                        LexError::new("Unterminated string literal", loc)
                    })?;
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '0' => '\0',
                        other => other,
                    });
                }
                _ => string.push(ch),
            }
        }

        Err(LexError::new("Unterminated string literal", loc))
    }

    /// Parse a numeric literal: decimal, hex (`0x`), octal (leading `0`) or float
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let token = if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.radix_literal(16, loc)?
        } else if first == '0' && matches!(self.peek(), Some('0'..='9' | '_')) {
            self.radix_literal(8, loc)?
        } else {
            self.decimal_literal(first, loc)?
        };

        // `12abc`, `0x1g`, `1.2.3`
        if let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                return Err(LexError::new(
                    format!("Invalid character '{}' in numeric literal", ch),
                    loc,
                ));
            }
        }

        Ok(token)
    }

    fn radix_literal(&mut self, radix: u32, loc: SourceLocation) -> Result<Token, LexError> {
        let mut value: u32 = 0;
        let mut digits = 0;

        while let Some(ch) = self.peek() {
            if ch == '_' {
                self.advance();
                continue;
            }
            let Some(digit) = ch.to_digit(radix) else {
                if ch.is_ascii_digit() {
                    self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    return Err(LexError::new(
                        format!("Invalid digit '{}' in octal literal", ch),
                        loc,
                    ));
                }
                break;
            };
            value = value.wrapping_mul(radix).wrapping_add(digit);
            digits += 1;
            self.advance();
        }

        if digits == 0 {
            self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Err(LexError::new("Numeric literal has no digits", loc));
        }

        Ok(Token::IntLiteral(value as i32, loc))
    }

    fn decimal_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(first);
        self.take_digits(&mut text);

        if self.peek() != Some('.') {
            let value = text.chars().fold(0u32, |acc, c| {
                acc.wrapping_mul(10)
                    .wrapping_add(c.to_digit(10).unwrap_or(0))
            });
            return Ok(Token::IntLiteral(value as i32, loc));
        }

        self.advance();
        text.push('.');
        self.take_digits(&mut text);

        let value = text.parse::<f32>().map_err(|_| {
            LexError::new(format!("Invalid float literal: {}", text), loc)
        })?;
        Ok(Token::FloatLiteral(value, loc))
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance();
        }
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "const" => Token::Const(loc),
            "int" => Token::Int(loc),
            "float" => Token::Float(loc),
            "void" => Token::Void(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "break" => Token::Break(loc),
            "continue" => Token::Continue(loc),
            "return" => Token::Return(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    self.skip_while(|c| c != '\n');
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("Unterminated block comment", start_loc))
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
