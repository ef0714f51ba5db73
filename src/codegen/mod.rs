//! # Code generation
//!
//! Walks the AST, allocates registers, and emits CHIP-8 instructions into
//! an ordered buffer. The buffer of structured records *is* the
//! intermediate representation: a final pass resolves provisional addresses
//! against the memory map and serializes everything to ROM bytes.
//!
//! ## ROM layout
//!
//! ```text
//! 0x200 ..            N big-endian opcodes, ending with a jump-to-self guard
//! then                3 zero bytes (BCD scratch for draw_num)
//! then                per symbol, in declaration order:
//!                       integer — one zero byte (stores initialize it)
//!                       sprite  — its row bitmaps
//! ```
//!
//! ## Address resolution
//!
//! During emission, `ANNN` carries a data-section offset and `1NNN` a
//! PC-relative byte offset (negative for backward jumps). With
//! `DATA_START = 0x200 + 2·N + 3`, the final pass rewrites each `ANNN` to
//! `DATA_START + nnn` and each `1NNN` to `0x200 + pc + nnn`, then encodes
//! every record big-endian.
//!
//! ## Register protocol
//!
//! Lowering an expression returns the owning [`Reg`] that holds its value;
//! the consumer frees it. No two live values share a register, and the
//! free-register count around any expression shrinks by exactly the one
//! returned handle.

pub mod instruction;
pub mod registers;


use std::collections::HashMap;

use crate::error::{CompileError, Result};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::ast::{Block, Expression, Identifier, Statement};
use crate::semantics::{Symbol, SymbolKind, SymbolTable};
use instruction::{
    Instruction, BCD_SCRATCH_SIZE, CODE_START, INSTRUCTION_SIZE, RAM_SIZE,
};
use registers::{Reg, RegisterFile, V0};

/// Lower a program to ROM bytes.
pub fn generate(program: &[Statement], symbols: &SymbolTable) -> Result<Vec<u8>> {
    let mut generator = CodeGenerator::new(symbols);
    let mut main = Vec::new();
    for statement in program {
        generator.statement(statement, &mut main)?;
    }
    generator.finish(main)
}

pub struct CodeGenerator<'a> {
    symbols: &'a SymbolTable,
    registers: RegisterFile,
    /// Raw row bytes per declared sprite, keyed by name; written to the data
    /// section in symbol declaration order.
    sprites: HashMap<String, Vec<u8>>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            registers: RegisterFile::new(),
            sprites: HashMap::new(),
        }
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    fn symbol(&self, ident: &Identifier) -> Result<&Symbol> {
        self.symbols
            .get(&ident.name)
            .ok_or_else(|| CompileError::UndeclaredIdentifier {
                name: ident.name.clone(),
                span: ident.token.span,
            })
    }

    // === Statement lowering ===

    pub fn statement(&mut self, statement: &Statement, block: &mut Vec<Instruction>) -> Result<()> {
        match statement {
            Statement::Expression { expression, .. } => {
                let register = self.expression(expression, block)?;
                self.registers.free(register);
            }
            Statement::Clear { .. } => {
                // 00E0 CLS
                block.push(Instruction::with_kk(0x0, 0, 0xE0));
            }
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.if_statement(condition, consequence, alternative.as_ref(), block)?,
            Statement::While {
                condition, body, ..
            } => self.while_statement(condition, body, block)?,
            Statement::IntegerDeclaration { ident, value, .. } => {
                self.integer_declaration(ident, value, block)?;
            }
            Statement::SpriteDeclaration { ident, rows, .. } => {
                // No instructions; the rows become data-section bytes.
                self.sprites.insert(
                    ident.name.clone(),
                    rows.iter().map(|row| row.value).collect(),
                );
            }
        }
        Ok(())
    }

    /// Evaluate the initializer, stage it in `V0`, and store it at the
    /// variable's data-section address via `FX55` with `x = 0`.
    fn integer_declaration(
        &mut self,
        ident: &Identifier,
        value: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<()> {
        let register = self.expression(value, block)?;
        let location = self.symbol(ident)?.offset;
        block.push(Instruction::with_nnn(0xA, location as i32)); // ANNN LD I, addr
        if register.index() != V0 {
            block.push(Instruction::with_xyn(0x8, V0, register.index(), 0)); // 8XY0 LD V0, Vx
        }
        block.push(Instruction::with_kk(0xF, V0, 0x55)); // FX55 LD [I], V0
        self.registers.free(register);
        Ok(())
    }

    /// Lower `if`: test the condition register against zero with `4XKK`
    /// (skip next if `Vx != 0`), then a forward jump over the consequence.
    /// With an `else`, the consequence gains a trailing jump over the
    /// alternative.
    fn if_statement(
        &mut self,
        condition: &Expression,
        consequence: &Block,
        alternative: Option<&Block>,
        block: &mut Vec<Instruction>,
    ) -> Result<()> {
        let register = self.expression(condition, block)?;
        block.push(Instruction::with_kk(0x4, register.index(), 0)); // 4XKK SNE Vx, 0

        let mut consequence_buffer = Vec::new();
        for statement in &consequence.statements {
            self.statement(statement, &mut consequence_buffer)?;
        }

        let mut alternative_buffer = Vec::new();
        if let Some(alternative) = alternative {
            for statement in &alternative.statements {
                self.statement(statement, &mut alternative_buffer)?;
            }
            consequence_buffer.push(Instruction::with_nnn(
                0x1,
                (INSTRUCTION_SIZE * (alternative_buffer.len() + 1)) as i32,
            ));
        }

        block.push(Instruction::with_nnn(
            0x1,
            (INSTRUCTION_SIZE * (consequence_buffer.len() + 1)) as i32,
        ));
        block.extend(consequence_buffer);
        block.extend(alternative_buffer);
        self.registers.free(register);
        Ok(())
    }

    /// Lower `while`: condition, `4XKK` test, forward jump over the body,
    /// the body, then a backward jump to the start of the condition.
    fn while_statement(
        &mut self,
        condition: &Expression,
        body: &Block,
        block: &mut Vec<Instruction>,
    ) -> Result<()> {
        let mut condition_buffer = Vec::new();
        let register = self.expression(condition, &mut condition_buffer)?;
        let condition_length = condition_buffer.len();
        block.extend(condition_buffer);
        block.push(Instruction::with_kk(0x4, register.index(), 0)); // 4XKK SNE Vx, 0

        let mut body_buffer = Vec::new();
        for statement in &body.statements {
            self.statement(statement, &mut body_buffer)?;
        }
        let body_length = body_buffer.len();

        block.push(Instruction::with_nnn(
            0x1,
            (INSTRUCTION_SIZE * (body_length + 2)) as i32,
        ));
        block.extend(body_buffer);
        block.push(Instruction::with_nnn(
            0x1,
            -((INSTRUCTION_SIZE * (body_length + 2 + condition_length)) as i32),
        ));
        self.registers.free(register);
        Ok(())
    }

    // === Expression lowering ===

    /// Lower an expression; the returned register owns its value.
    pub fn expression(
        &mut self,
        expression: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        match expression {
            Expression::Integer { value, .. } => self.integer(*value, block),
            Expression::Identifier(ident) => self.identifier(ident, block),
            Expression::Infix {
                operator,
                left,
                right,
            } => self.infix(operator, left, right, block),
            Expression::Draw { sprite, x, y, .. } => self.draw(sprite, x, y, block),
            Expression::DrawNum { value, x, y, .. } => self.draw_num(value, x, y, block),
            Expression::DrawChar { value, x, y, .. } => self.draw_char(value, x, y, block),
            Expression::Pressed { key, .. } => self.key_query(key, 0x9E, block),
            Expression::NotPressed { key, .. } => self.key_query(key, 0xA1, block),
            Expression::UntilPressed { .. } => self.until_pressed(block),
        }
    }

    fn integer(&mut self, value: u8, block: &mut Vec<Instruction>) -> Result<Reg> {
        let register = self.registers.allocate()?;
        block.push(Instruction::with_kk(0x6, register.index(), value)); // 6XKK LD Vx, byte
        Ok(register)
    }

    /// Load a variable: point `I` at its storage, pull the byte into `V0`
    /// with `FX65`, then move it into the allocated register.
    fn identifier(&mut self, ident: &Identifier, block: &mut Vec<Instruction>) -> Result<Reg> {
        let register = self.registers.allocate()?;
        let location = self.symbol(ident)?.offset;
        block.push(Instruction::with_nnn(0xA, location as i32)); // ANNN LD I, addr
        block.push(Instruction::with_kk(0xF, V0, 0x65)); // FX65 LD V0, [I]
        block.push(Instruction::with_xyn(0x8, register.index(), V0, 0)); // 8XY0 LD Vx, V0
        Ok(register)
    }

    fn infix(
        &mut self,
        operator: &Token,
        left: &Expression,
        right: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        let mut left_register = self.expression(left, block)?;
        let right_register = self.expression(right, block)?;

        match operator.kind {
            TokenKind::Plus => {
                // 8XY4 ADD Vx, Vy
                block.push(Instruction::with_xyn(
                    0x8,
                    left_register.index(),
                    right_register.index(),
                    4,
                ));
            }
            TokenKind::Minus => {
                // 8XY5 SUB Vx, Vy
                block.push(Instruction::with_xyn(
                    0x8,
                    left_register.index(),
                    right_register.index(),
                    5,
                ));
            }
            TokenKind::Asterisk => {
                left_register = self.multiply(left_register, &right_register, block)?;
            }
            TokenKind::Equals => {
                self.select(left_register.index(), right_register.index(), 1, 0, block);
            }
            TokenKind::NotEquals => {
                self.select(left_register.index(), right_register.index(), 0, 1, block);
            }
            _ => {
                return Err(CompileError::UnsupportedOperator {
                    literal: operator.literal.clone(),
                    span: operator.span,
                })
            }
        }

        self.registers.free(right_register);
        Ok(left_register)
    }

    /// No native multiply: run an add loop with an index and an accumulator.
    /// `acc += right` until `index == left`; the accumulator becomes the
    /// result register, the index and the old left are released.
    fn multiply(
        &mut self,
        left: Reg,
        right: &Reg,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        let index = self.registers.allocate()?;
        let result = self.registers.allocate()?;

        block.push(Instruction::with_kk(0x6, index.index(), 0));
        block.push(Instruction::with_kk(0x6, result.index(), 0));

        // 9XY0 SNE: while index != left, run the add; the exit jump clears
        // the loop once they meet.
        block.push(Instruction::with_xyn(0x9, left.index(), index.index(), 0));
        block.push(Instruction::with_nnn(0x1, (INSTRUCTION_SIZE * 4) as i32));
        block.push(Instruction::with_xyn(0x8, result.index(), right.index(), 4));
        block.push(Instruction::with_kk(0x7, index.index(), 1)); // 7XKK ADD Vx, 1
        block.push(Instruction::with_nnn(0x1, -((INSTRUCTION_SIZE * 4) as i32)));

        self.registers.free(index);
        self.registers.free(left);
        Ok(result)
    }

    /// The three-instruction conditional select behind `==`, `!=` and the
    /// key queries: a skip instruction decides which of two `6XKK` loads
    /// writes the result back into `x`.
    fn select(&mut self, x: u8, y: u8, on_skip: u8, otherwise: u8, block: &mut Vec<Instruction>) {
        block.push(Instruction::with_xyn(0x5, x, y, 0)); // 5XY0 SE Vx, Vy
        block.push(Instruction::with_nnn(0x1, (INSTRUCTION_SIZE * 3) as i32));
        block.push(Instruction::with_kk(0x6, x, on_skip));
        block.push(Instruction::with_nnn(0x1, (INSTRUCTION_SIZE * 2) as i32));
        block.push(Instruction::with_kk(0x6, x, otherwise));
    }

    /// Point `I` at the sprite's rows and draw them at (x, y). Returns the
    /// flag register: `DXYN` sets `VF` to 1 on collision.
    fn draw(
        &mut self,
        sprite: &Identifier,
        x: &Expression,
        y: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        let x_register = self.expression(x, block)?;
        let y_register = self.expression(y, block)?;
        let symbol = self.symbol(sprite)?;
        let (location, size) = (symbol.offset, symbol.size);
        block.push(Instruction::with_nnn(0xA, location as i32)); // ANNN LD I, addr
        block.push(Instruction::with_xyn(
            0xD,
            x_register.index(),
            y_register.index(),
            size as u8,
        )); // DXYN DRW
        self.registers.free(x_register);
        self.registers.free(y_register);
        Ok(Reg::flag())
    }

    /// Store the value's BCD digits in the scratch bytes with `FX33`, then
    /// draw each digit with the built-in 4×5 hex font (`FX29` points `I` at
    /// the glyph for the digit in `V0`), advancing x by 5 per digit.
    fn draw_num(
        &mut self,
        value: &Expression,
        x: &Expression,
        y: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        const GLYPH_HEIGHT: u8 = 5;
        const GLYPH_ADVANCE: u8 = 5;

        let number = self.expression(value, block)?;
        block.push(Instruction::with_nnn(0xA, 0)); // I -> scratch
        block.push(Instruction::with_kk(0xF, number.index(), 0x33)); // FX33 LD B, Vx
        self.registers.free(number);

        let x_register = self.expression(x, block)?;
        let y_register = self.expression(y, block)?;

        for digit in 0..3 {
            if digit > 0 {
                block.push(Instruction::with_nnn(0xA, digit)); // I -> scratch digit
            }
            block.push(Instruction::with_kk(0xF, V0, 0x65)); // FX65 LD V0, [I]
            block.push(Instruction::with_kk(0xF, V0, 0x29)); // FX29 LD F, V0
            block.push(Instruction::with_xyn(
                0xD,
                x_register.index(),
                y_register.index(),
                GLYPH_HEIGHT,
            ));
            if digit < 2 {
                block.push(Instruction::with_kk(0x7, x_register.index(), GLYPH_ADVANCE));
            }
        }

        self.registers.free(x_register);
        self.registers.free(y_register);
        Ok(Reg::flag())
    }

    /// Draw the hex-font glyph for the value: `FX29` then a 5-row `DXYN`.
    fn draw_char(
        &mut self,
        value: &Expression,
        x: &Expression,
        y: &Expression,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        let number = self.expression(value, block)?;
        block.push(Instruction::with_kk(0xF, number.index(), 0x29)); // FX29 LD F, Vx
        self.registers.free(number);
        let x_register = self.expression(x, block)?;
        let y_register = self.expression(y, block)?;
        block.push(Instruction::with_xyn(
            0xD,
            x_register.index(),
            y_register.index(),
            5,
        ));
        self.registers.free(x_register);
        self.registers.free(y_register);
        Ok(Reg::flag())
    }

    /// `pressed` / `not_pressed`: evaluate the key code, then `EX9E`/`EXA1`
    /// (skip next if the key is down/up) feeding the conditional select.
    /// The key register is reused for the 0/1 result.
    fn key_query(
        &mut self,
        key: &Expression,
        kk: u8,
        block: &mut Vec<Instruction>,
    ) -> Result<Reg> {
        let register = self.expression(key, block)?;
        block.push(Instruction::with_kk(0xE, register.index(), kk));
        block.push(Instruction::with_nnn(0x1, (INSTRUCTION_SIZE * 3) as i32));
        block.push(Instruction::with_kk(0x6, register.index(), 1));
        block.push(Instruction::with_nnn(0x1, (INSTRUCTION_SIZE * 2) as i32));
        block.push(Instruction::with_kk(0x6, register.index(), 0));
        Ok(register)
    }

    /// `FX0A` blocks until a key is pressed and stores its code. The parsed
    /// operand is not evaluated: the instruction reports whichever key was
    /// pressed.
    fn until_pressed(&mut self, block: &mut Vec<Instruction>) -> Result<Reg> {
        let register = self.registers.allocate()?;
        block.push(Instruction::with_kk(0xF, register.index(), 0x0A)); // FX0A LD Vx, K
        Ok(register)
    }

    // === Final pass ===

    /// Append the guard jump, resolve addresses, serialize the code, and
    /// append the data section.
    pub fn finish(self, mut main: Vec<Instruction>) -> Result<Vec<u8>> {
        // Trap execution before it runs off the code section into data.
        main.push(Instruction::with_nnn(0x1, 0));

        let main_length = main.len() * INSTRUCTION_SIZE;
        let data_start = CODE_START + main_length + BCD_SCRATCH_SIZE;
        let data_length = self.symbols.data_length() as usize;

        let total = main_length + BCD_SCRATCH_SIZE + data_length;
        if CODE_START + total > RAM_SIZE {
            return Err(CompileError::RomTooLarge { size: total });
        }

        let mut rom = Vec::with_capacity(total);
        let mut pc = 0;
        for instruction in &main {
            let mut resolved = *instruction;
            match instruction.op {
                0xA => resolved.nnn = instruction.nnn.map(|nnn| data_start as i32 + nnn),
                0x1 => resolved.nnn = instruction.nnn.map(|nnn| (CODE_START + pc) as i32 + nnn),
                _ => {}
            }
            rom.extend_from_slice(&resolved.encode());
            pc += INSTRUCTION_SIZE;
        }

        rom.extend_from_slice(&[0; BCD_SCRATCH_SIZE]);

        for (name, symbol) in self.symbols.iter() {
            match symbol.kind {
                SymbolKind::Integer => rom.push(0),
                SymbolKind::Sprite => match self.sprites.get(name) {
                    Some(rows) => rom.extend_from_slice(rows),
                    None => {
                        return Err(CompileError::MissingSpriteData {
                            name: name.to_string(),
                        })
                    }
                },
            }
        }

        Ok(rom)
    }
}
