//! # Abstract Syntax Tree (AST)
//!
//! Defines the data structures representing parsed C8 programs.
//!
//! ## Structure
//!
//! A program is a sequence of [`Statement`]s. Expressions and statements are
//! two disjoint sum types; every node keeps the token that introduced it so
//! diagnostics and the code generator can point back into the source.
//!
//! ## Design Philosophy
//!
//! The AST maps directly onto what the code generator lowers: there is no
//! separate IR between it and the instruction buffer. `Display` renders each
//! node back to parseable source (infix expressions fully parenthesized), so
//! printing and re-parsing a program is a fixed point.

use crate::lexer::token::Token;

/// A referenced or declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

/// One row of a sprite declaration: an integer literal in `0..=255`, one
/// byte of bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRow {
    pub token: Token,
    pub value: u8,
}

/// A braced statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal, already base-decoded and bounds-checked.
    Integer { token: Token, value: u8 },
    /// Reference to a declared name.
    Identifier(Identifier),
    /// Binary operation; trees lean left for chains of equal precedence.
    Infix {
        operator: Token,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `draw(sprite, x, y)` — draws a declared sprite, yields the collision
    /// flag.
    Draw {
        token: Token,
        sprite: Identifier,
        x: Box<Expression>,
        y: Box<Expression>,
    },
    /// `draw_num(value, x, y)` — draws the three decimal digits of `value`.
    DrawNum {
        token: Token,
        value: Box<Expression>,
        x: Box<Expression>,
        y: Box<Expression>,
    },
    /// `draw_char(value, x, y)` — draws the built-in hex font glyph for
    /// `value`.
    DrawChar {
        token: Token,
        value: Box<Expression>,
        x: Box<Expression>,
        y: Box<Expression>,
    },
    /// `pressed(key)` — 1 if the key is down, else 0.
    Pressed { token: Token, key: Box<Expression> },
    /// `not_pressed(key)` — 1 if the key is up, else 0.
    NotPressed { token: Token, key: Box<Expression> },
    /// `until_pressed(key)` — blocks until any key is pressed and yields its
    /// code.
    UntilPressed { token: Token, key: Box<Expression> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its effect; the result is discarded.
    Expression { token: Token, expression: Expression },
    /// `clear;` — clears the display.
    Clear { token: Token },
    If {
        token: Token,
        condition: Expression,
        consequence: Block,
        alternative: Option<Block>,
    },
    While {
        token: Token,
        condition: Expression,
        body: Block,
    },
    /// `var name = value;` — declares or re-assigns an integer variable.
    IntegerDeclaration {
        token: Token,
        ident: Identifier,
        value: Expression,
    },
    /// `sprite name = { rows };` — declares a sprite bitmap. Emits no
    /// instructions; the rows land in the ROM's data section.
    SpriteDeclaration {
        token: Token,
        ident: Identifier,
        rows: Vec<SpriteRow>,
    },
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Integer { value, .. } => write!(f, "{}", value),
            Expression::Identifier(ident) => f.write_str(&ident.name),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator.literal, right),
            Expression::Draw { sprite, x, y, .. } => {
                write!(f, "draw({}, {}, {})", sprite.name, x, y)
            }
            Expression::DrawNum { value, x, y, .. } => {
                write!(f, "draw_num({}, {}, {})", value, x, y)
            }
            Expression::DrawChar { value, x, y, .. } => {
                write!(f, "draw_char({}, {}, {})", value, x, y)
            }
            Expression::Pressed { key, .. } => write!(f, "pressed({})", key),
            Expression::NotPressed { key, .. } => write!(f, "not_pressed({})", key),
            Expression::UntilPressed { key, .. } => write!(f, "until_pressed({})", key),
        }
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for statement in &self.statements {
            write!(f, " {}", statement)?;
        }
        f.write_str(" }")
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Expression { expression, .. } => write!(f, "{};", expression),
            Statement::Clear { .. } => f.write_str("clear;"),
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Statement::While {
                condition, body, ..
            } => write!(f, "while ({}) {}", condition, body),
            Statement::IntegerDeclaration { ident, value, .. } => {
                write!(f, "var {} = {};", ident.name, value)
            }
            Statement::SpriteDeclaration { ident, rows, .. } => {
                write!(f, "sprite {} = {{ ", ident.name)?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", row.value)?;
                }
                f.write_str(" };")
            }
        }
    }
}
