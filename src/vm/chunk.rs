use super::{opcode::OpCode, value::Value};
use std::fmt::{Debug, Write};

/// Bytecode plus the data it references.
///
/// `lines[i]` is the source line that produced `code[i]`, so both vectors
/// always have the same length.
#[derive(Clone, Default, PartialEq)]
pub struct Chunk {
    code: Vec<u8>,
    lines: Vec<usize>,
    constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            code: vec![],
            lines: vec![],
            constants: vec![],
        }
    }

    pub fn write(&mut self, byte: u8, line: usize) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write(op.into(), line);
    }

    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn constant(&self, index: u8) -> Option<Value> {
        self.constants.get(index as usize).copied()
    }

    pub fn line(&self, offset: usize) -> Option<usize> {
        self.lines.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn disassemble(&self, name: &str) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.disassemble_into(&mut out, name);
        out
    }

    fn disassemble_into<W: Write>(&self, out: &mut W, name: &str) -> std::fmt::Result {
        writeln!(out, "== {} ==", name)?;
        let mut offset = 0;
        while offset < self.code.len() {
            offset = self.disassemble_instr(out, offset)?;
        }
        Ok(())
    }

    /// Writes the instruction at `offset` and returns the offset of the next one.
    pub fn disassemble_instr<W: Write>(
        &self,
        out: &mut W,
        offset: usize,
    ) -> core::result::Result<usize, std::fmt::Error> {
        write!(out, "{:04} ", offset)?;
        let Some(&byte) = self.code.get(offset) else {
            writeln!(out, "<past end of code>")?;
            return Ok(offset);
        };
        let line = self.line(offset);
        if offset > 0 && line == self.line(offset - 1) {
            write!(out, "   | ")?;
        } else {
            write!(out, "{:4} ", line.unwrap_or(0))?;
        }

        match OpCode::try_from(byte) {
            Ok(op @ OpCode::Constant) => self.constant_instr(out, op, offset),
            Ok(op) => self.simple_instr(out, op, offset),
            Err(_) => {
                writeln!(out, "Unknown opcode {}", byte)?;
                Ok(offset + 1)
            }
        }
    }

    fn simple_instr<W: Write>(
        &self,
        out: &mut W,
        op: OpCode,
        offset: usize,
    ) -> core::result::Result<usize, std::fmt::Error> {
        writeln!(out, "{}", op.mnemonic())?;
        Ok(offset + 1)
    }

    fn constant_instr<W: Write>(
        &self,
        out: &mut W,
        op: OpCode,
        offset: usize,
    ) -> core::result::Result<usize, std::fmt::Error> {
        let Some(&index) = self.code.get(offset + 1) else {
            writeln!(out, "{:<16} <missing operand>", op.mnemonic())?;
            return Ok(self.code.len());
        };
        match self.constant(index) {
            Some(value) => writeln!(out, "{:<16} {:4} '{}'", op.mnemonic(), index, value)?,
            None => writeln!(out, "{:<16} {:4} <out of range>", op.mnemonic(), index)?,
        }
        Ok(offset + op.size())
    }
}

impl Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.disassemble_into(f, "chunk")
    }
}
