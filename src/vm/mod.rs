pub mod chunk;
pub mod opcode;
pub mod value;

use self::{chunk::Chunk, opcode::OpCode, value::Value};

const STACK_MAX: usize = 256;

/// What went wrong while executing an instruction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    #[error("Stack underflow.")]
    StackUnderflow,
    #[error("Stack overflow.")]
    StackOverflow,
    #[error("Operand must be a number.")]
    OperandNotNumber,
    #[error("Operands must be numbers.")]
    OperandsNotNumbers,
    #[error("Unknown opcode {0}.")]
    UnknownOpcode(u8),
    #[error("Constant index {0} is out of range.")]
    ConstantOutOfRange(u8),
    #[error("Unexpected end of bytecode.")]
    UnexpectedEnd,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{fault}\n[line {line}] in script")]
pub struct RuntimeError {
    pub fault: Fault,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(fault: Fault, line: usize) -> RuntimeError {
        RuntimeError { fault, line }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// A stack machine that executes one chunk per `interpret` call.
///
/// The stack storage is kept between runs but always starts empty.
#[derive(Debug, Default)]
pub struct VM {
    stack: Vec<Value>,
    ip: usize,
}

impl VM {
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(STACK_MAX),
            ip: 0,
        }
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn interpret(&mut self, chunk: &Chunk) -> Result<Value> {
        self.stack.clear();
        self.ip = 0;
        loop {
            let offset = self.ip;
            if log::log_enabled!(log::Level::Trace) && offset < chunk.len() {
                self.trace(chunk, offset);
            }
            match self.step(chunk) {
                Ok(Some(value)) => {
                    self.stack.clear();
                    return Ok(value);
                }
                Ok(None) => {}
                Err(fault) => {
                    self.stack.clear();
                    let line = chunk
                        .line(offset)
                        .or_else(|| chunk.lines().last().copied())
                        .unwrap_or(0);
                    log::debug!("runtime fault at offset {}: {}", offset, fault);
                    return Err(RuntimeError::new(fault, line));
                }
            }
        }
    }

    /// Executes one instruction. `Some` carries the result of `Return`.
    fn step(&mut self, chunk: &Chunk) -> std::result::Result<Option<Value>, Fault> {
        let byte = self.read_byte(chunk)?;
        let op = OpCode::try_from(byte).map_err(|_| Fault::UnknownOpcode(byte))?;
        match op {
            OpCode::Constant => {
                let index = self.read_byte(chunk)?;
                let value = chunk
                    .constant(index)
                    .ok_or(Fault::ConstantOutOfRange(index))?;
                self.push(value)?;
            }
            OpCode::Nil => self.push(Value::Nil)?,
            OpCode::True => self.push(Value::Bool(true))?,
            OpCode::False => self.push(Value::Bool(false))?,
            OpCode::Pop => {
                self.pop()?;
            }
            OpCode::Equal => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(Value::Bool(a == b))?;
            }
            OpCode::Greater => self.binary_op(|a, b| (a > b).into())?,
            OpCode::Less => self.binary_op(|a, b| (a < b).into())?,
            OpCode::Add => self.binary_op(|a, b| (a + b).into())?,
            OpCode::Subtract => self.binary_op(|a, b| (a - b).into())?,
            OpCode::Multiply => self.binary_op(|a, b| (a * b).into())?,
            // IEEE semantics: x / 0 is +-inf and 0 / 0 is NaN.
            OpCode::Divide => self.binary_op(|a, b| (a / b).into())?,
            OpCode::Not => {
                let value = self.pop()?;
                self.push(Value::Bool(value.is_falsey()))?;
            }
            OpCode::Negate => match self.pop()? {
                Value::Number(n) => self.push(Value::Number(-n))?,
                _ => return Err(Fault::OperandNotNumber),
            },
            OpCode::Return => return self.pop().map(Some),
        }
        Ok(None)
    }

    fn read_byte(&mut self, chunk: &Chunk) -> std::result::Result<u8, Fault> {
        let byte = chunk
            .code()
            .get(self.ip)
            .copied()
            .ok_or(Fault::UnexpectedEnd)?;
        self.ip += 1;
        Ok(byte)
    }

    fn binary_op(&mut self, op: impl Fn(f64, f64) -> Value) -> std::result::Result<(), Fault> {
        let b = self.pop()?;
        let a = self.pop()?;
        match (a, b) {
            (Value::Number(a), Value::Number(b)) => self.push(op(a, b)),
            _ => Err(Fault::OperandsNotNumbers),
        }
    }

    fn push(&mut self, value: Value) -> std::result::Result<(), Fault> {
        if self.stack.len() >= STACK_MAX {
            return Err(Fault::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> std::result::Result<Value, Fault> {
        self.stack.pop().ok_or(Fault::StackUnderflow)
    }

    fn trace(&self, chunk: &Chunk, offset: usize) {
        let mut line = String::from("          ");
        for value in &self.stack {
            line.push_str(&format!("[ {} ]", value));
        }
        line.push('\n');
        let _ = chunk.disassemble_instr(&mut line, offset);
        log::trace!("{}", line.trim_end());
    }
}
