//! # C8 Lexer
//!
//! Turns C8 source code into a stream of tokens, one call at a time.
//!
//! ## Features
//!
//! - **Numeric Literals**: decimal (`5`, `120`) and binary (`0b11110000`)
//!   notation; the literal text is preserved verbatim so the parser decides
//!   the base
//! - **Two-character operators**: `==` and `!=` via one character of
//!   lookahead; a lone `=` is assignment and a lone `!` lexes as `Bang`
//! - **Keywords**: `var`, `sprite`, `draw`, `draw_num`, `draw_char`,
//!   `clear`, `if`, `else`, `while`, `pressed`, `not_pressed`,
//!   `until_pressed`
//!
//! The lexer is pull-based: [`Lexer::next_token`] produces one token on
//! demand, which is exactly the one-token lookahead the parser needs. After
//! the input is exhausted it keeps returning `Eof` tokens forever.
//!
//! The only lexical hard error is a binary literal with no digits (`0b`).
//! Any other unrecognized character becomes an `Illegal` token and is
//! reported by the parser when it fails to start an expression.

pub mod cursor;
pub mod token;

#[cfg(test)]
mod tests;

use crate::error::{CompileError, Result, Span};
use cursor::Cursor;
use token::{lookup_keyword, Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let span = self.cursor.span();
        let ch = match self.cursor.peek() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, "", span)),
        };

        let kind = match ch {
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '=' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Ok(Token::new(TokenKind::Equals, "==", span));
                }
                TokenKind::Assign
            }
            '!' => {
                if self.cursor.peek_next() == Some('=') {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Ok(Token::new(TokenKind::NotEquals, "!=", span));
                }
                TokenKind::Bang
            }
            c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.read_word(span)),
            c if c.is_ascii_digit() => return self.read_number(span),
            _ => TokenKind::Illegal,
        };

        self.cursor.advance();
        Ok(Token::new(kind, ch.to_string(), span))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.cursor.advance();
        }
    }

    /// Read an identifier or keyword. Word characters are letters and `_`;
    /// three of the keywords contain an underscore.
    fn read_word(&mut self, span: Span) -> Token {
        let mut word = String::new();
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            if let Some(ch) = self.cursor.advance() {
                word.push(ch);
            }
        }
        Token::new(lookup_keyword(&word), word, span)
    }

    /// Read an integer literal, preserving its source text.
    ///
    /// `0b` introduces a binary literal and requires at least one bit after
    /// the prefix; anything else is a plain decimal digit run.
    fn read_number(&mut self, span: Span) -> Result<Token> {
        let mut literal = String::new();

        if self.cursor.peek() == Some('0') && self.cursor.peek_next() == Some('b') {
            self.cursor.advance();
            self.cursor.advance();
            literal.push_str("0b");
            while matches!(self.cursor.peek(), Some('0' | '1')) {
                if let Some(ch) = self.cursor.advance() {
                    literal.push(ch);
                }
            }
            if literal == "0b" {
                return Err(CompileError::InvalidBinaryLiteral { literal, span });
            }
            return Ok(Token::new(TokenKind::Int, literal, span));
        }

        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
            if let Some(ch) = self.cursor.advance() {
                literal.push(ch);
            }
        }
        Ok(Token::new(TokenKind::Int, literal, span))
    }
}
