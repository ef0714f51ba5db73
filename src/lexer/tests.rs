use crate::error::CompileError;
use crate::lexer::token::TokenKind;
use crate::lexer::Lexer;

/// Lex the whole input, asserting no errors, and return `(kind, literal)`
/// pairs up to and including the first `Eof`.
fn lex_ok(input: &str) -> Vec<(TokenKind, String)> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().expect("unexpected lexer error");
        let done = token.kind == TokenKind::Eof;
        tokens.push((token.kind, token.literal));
        if done {
            break;
        }
    }
    tokens
}

fn kinds(input: &str) -> Vec<TokenKind> {
    lex_ok(input).into_iter().map(|(kind, _)| kind).collect()
}

#[test]
fn empty_input() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn eof_forever() {
    let mut lexer = Lexer::new(";");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Semicolon);
    for _ in 0..3 {
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn operators_and_declaration() {
    use TokenKind::*;
    let expected = vec![
        (Var, "var"),
        (Ident, "result"),
        (Assign, "="),
        (Bang, "!"),
        (Ident, "number"),
        (Minus, "-"),
        (LParen, "("),
        (Int, "5"),
        (Plus, "+"),
        (Int, "505"),
        (RParen, ")"),
        (Asterisk, "*"),
        (Int, "4"),
        (Slash, "/"),
        (Int, "8"),
        (Semicolon, ";"),
        (Eof, ""),
    ];
    let tokens = lex_ok("var result = !number - (5 + 505) * 4 / 8;");
    assert_eq!(
        tokens,
        expected
            .into_iter()
            .map(|(k, l)| (k, l.to_string()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn whitespace_is_skipped() {
    use TokenKind::*;
    let tokens = lex_ok("\t\tjoona        0891, \t\n\n\t 5+5");
    let expected = vec![
        (Ident, "joona"),
        (Int, "0891"),
        (Comma, ","),
        (Int, "5"),
        (Plus, "+"),
        (Int, "5"),
        (Eof, ""),
    ];
    assert_eq!(
        tokens,
        expected
            .into_iter()
            .map(|(k, l)| (k, l.to_string()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn comparison_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("6 == 5 != 0b101"),
        vec![Int, Equals, Int, NotEquals, Int, Eof]
    );
}

#[test]
fn sprite_declaration() {
    use TokenKind::*;
    assert_eq!(
        kinds("sprite box = { 0b11, 0b11 };"),
        vec![Sprite, Ident, Assign, LBrace, Int, Comma, Int, RBrace, Semicolon, Eof]
    );
}

#[test]
fn keywords() {
    use TokenKind::*;
    assert_eq!(
        kinds("var sprite draw draw_num draw_char clear if else while pressed not_pressed until_pressed"),
        vec![
            Var,
            Sprite,
            Draw,
            DrawNum,
            DrawChar,
            Clear,
            If,
            Else,
            While,
            Pressed,
            NotPressed,
            UntilPressed,
            Eof
        ]
    );
}

#[test]
fn binary_literals_keep_source_text() {
    for literal in ["0b00011", "0b101", "0b1", "0b1010101", "0b0"] {
        let tokens = lex_ok(literal);
        assert_eq!(tokens[0], (TokenKind::Int, literal.to_string()));
    }
}

#[test]
fn empty_binary_literal_is_an_error() {
    let mut lexer = Lexer::new("0b");
    let err = lexer.next_token().unwrap_err();
    assert!(matches!(
        err,
        CompileError::InvalidBinaryLiteral { ref literal, .. } if literal == "0b"
    ));
}

#[test]
fn illegal_character() {
    let mut lexer = Lexer::new("#");
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Illegal);
    assert_eq!(token.literal, "#");
}

#[test]
fn line_and_column_tracking() {
    let mut lexer = Lexer::new("var x\n  = 5;");
    let var = lexer.next_token().unwrap();
    assert_eq!((var.span.line, var.span.column), (1, 1));
    let x = lexer.next_token().unwrap();
    assert_eq!((x.span.line, x.span.column), (1, 5));
    let assign = lexer.next_token().unwrap();
    assert_eq!((assign.span.line, assign.span.column), (2, 3));
    let five = lexer.next_token().unwrap();
    assert_eq!((five.span.line, five.span.column), (2, 5));
}
