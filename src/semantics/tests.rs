use crate::error::{CompileError, Span};
use crate::lexer::token::{Token, TokenKind};
use crate::semantics::{check_integer_literal, SymbolKind, SymbolTable};

fn ident(name: &str) -> Token {
    Token::new(TokenKind::Ident, name, Span { line: 1, column: 1 })
}

fn int(literal: &str) -> Token {
    Token::new(TokenKind::Int, literal, Span { line: 1, column: 1 })
}

#[test]
fn offsets_accumulate_in_declaration_order() {
    let mut table = SymbolTable::new();
    table.declare_integer(&ident("x")).unwrap();
    table.declare_sprite(&ident("ball"), 3).unwrap();
    table.declare_integer(&ident("y")).unwrap();

    assert_eq!(table.location_of("x"), Some(0));
    assert_eq!(table.location_of("ball"), Some(1));
    assert_eq!(table.size_of("ball"), Some(3));
    assert_eq!(table.location_of("y"), Some(4));
    assert_eq!(table.data_length(), 5);
}

#[test]
fn integer_redeclaration_is_a_no_op() {
    let mut table = SymbolTable::new();
    table.declare_integer(&ident("x")).unwrap();
    table.declare_integer(&ident("y")).unwrap();
    table.declare_integer(&ident("x")).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.location_of("x"), Some(0));
    assert_eq!(table.data_length(), 2);
}

#[test]
fn integer_cannot_shadow_a_sprite() {
    let mut table = SymbolTable::new();
    table.declare_sprite(&ident("dot"), 1).unwrap();
    let err = table.declare_integer(&ident("dot")).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Redeclared {
            kind: SymbolKind::Integer,
            ..
        }
    ));
}

#[test]
fn sprite_cannot_shadow_anything() {
    let mut table = SymbolTable::new();
    table.declare_integer(&ident("x")).unwrap();
    assert!(table.declare_sprite(&ident("x"), 2).is_err());

    table.declare_sprite(&ident("dot"), 1).unwrap();
    assert!(table.declare_sprite(&ident("dot"), 1).is_err());
}

#[test]
fn sprite_row_limit() {
    let mut table = SymbolTable::new();
    table.declare_sprite(&ident("tall"), 15).unwrap();
    let err = table.declare_sprite(&ident("taller"), 16).unwrap_err();
    assert!(matches!(err, CompileError::SpriteTooLarge { rows: 16, .. }));
}

#[test]
fn undeclared_identifier() {
    let table = SymbolTable::new();
    let err = table.check_symbol(&ident("ghost")).unwrap_err();
    assert!(matches!(
        err,
        CompileError::UndeclaredIdentifier { ref name, .. } if name == "ghost"
    ));
}

#[test]
fn integer_literal_bases_and_bounds() {
    assert_eq!(check_integer_literal(&int("0")).unwrap(), 0);
    assert_eq!(check_integer_literal(&int("255")).unwrap(), 255);
    assert_eq!(check_integer_literal(&int("0b101")).unwrap(), 5);
    assert_eq!(check_integer_literal(&int("0b11111111")).unwrap(), 255);
    // A leading zero is still decimal.
    assert_eq!(check_integer_literal(&int("0891")).unwrap_err(),
        CompileError::IntegerOutOfBounds {
            literal: "0891".into(),
            span: Span { line: 1, column: 1 },
        }
    );
    assert!(check_integer_literal(&int("256")).is_err());
    assert!(check_integer_literal(&int("300")).is_err());
    assert!(check_integer_literal(&int("0b100000000")).is_err());
    assert!(check_integer_literal(&int("99999999999999999999")).is_err());
}
