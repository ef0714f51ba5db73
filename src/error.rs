//! Diagnostics shared by every stage of the compiler.
//!
//! The pipeline fails fast: the first error aborts compilation, so a single
//! flat error enum covers all four categories (lexical, syntactic, semantic
//! and code generation). Every variant that originates at a token carries its
//! [`Span`] and renders it as `line:column`.

use thiserror::Error;

use crate::lexer::token::TokenKind;
use crate::semantics::SymbolKind;

/// Source location of a token (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    // === Lexical ===
    /// `0b` with no binary digits after it.
    #[error("invalid binary literal '{literal}' at {span}")]
    InvalidBinaryLiteral { literal: String, span: Span },

    // === Syntactic ===
    #[error("expected {expected} but found '{literal}' at {span}")]
    UnexpectedToken {
        expected: TokenKind,
        literal: String,
        span: Span,
    },

    /// The current token cannot begin an expression.
    #[error("cannot parse an expression starting with '{literal}' at {span}")]
    InvalidExpressionStart { literal: String, span: Span },

    // === Semantic ===
    #[error("identifier '{name}' has not been declared at {span}")]
    UndeclaredIdentifier { name: String, span: Span },

    #[error("integer literal '{literal}' is out of bounds 0..=255 at {span}")]
    IntegerOutOfBounds { literal: String, span: Span },

    #[error("sprite '{name}' has {rows} rows but the limit is 15 at {span}")]
    SpriteTooLarge {
        name: String,
        rows: usize,
        span: Span,
    },

    #[error("cannot redeclare '{name}' as {kind} at {span}")]
    Redeclared {
        name: String,
        kind: SymbolKind,
        span: Span,
    },

    // === Code generation ===
    #[error("operator '{literal}' is not supported at {span}")]
    UnsupportedOperator { literal: String, span: Span },

    #[error("no available registers")]
    RegisterExhausted,

    /// Consistency failure: a sprite symbol whose rows were never recorded.
    #[error("sprite '{name}' has no row data")]
    MissingSpriteData { name: String },

    #[error("program needs {size} bytes at 0x200 but CHIP-8 memory ends at 4096")]
    RomTooLarge { size: usize },
}
