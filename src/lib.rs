//! # c8c
//!
//! A single-pass compiler from the C8 language to CHIP-8 bytecode.
//!
//! ## Pipeline
//!
//! Source text flows one way through four stages:
//!
//! 1. **Lexer** - produces tokens on demand (one-token lookahead)
//! 2. **Parser** - Pratt expression parsing plus recursive descent for
//!    statements; populates the semantic table as it goes
//! 3. **Semantic table** - flat symbol table defining the ROM's data layout
//! 4. **Code generator** - lowers the AST to an instruction buffer, resolves
//!    addresses against the CHIP-8 memory map, and serializes the ROM
//!
//! There is no separate IR; the instruction buffer is the IR until the final
//! fix-up pass.
//!
//! ## Example
//!
//! ```rust
//! let rom = c8c::compile("var x = 5;").unwrap();
//!
//! // Code section (big-endian opcodes), BCD scratch, one data byte for x.
//! assert_eq!(rom.len(), 14);
//! assert_eq!(&rom[..2], &[0x61, 0x05]); // LD V1, 5
//! ```
//!
//! Compilation fails fast: the first error aborts and no ROM is produced.

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantics;

pub use error::{CompileError, Result};

/// Compile C8 source text into a CHIP-8 ROM image.
pub fn compile(source: &str) -> Result<Vec<u8>> {
    let mut parser = parser::Parser::new(source)?;
    let program = parser.parse_program()?;
    let symbols = parser.into_symbols();
    codegen::generate(&program, &symbols)
}
