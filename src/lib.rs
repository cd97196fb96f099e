//! A bytecode virtual machine for a small dynamically typed expression
//! language: source is scanned into tokens, compiled in a single pass into a
//! [`Chunk`], and executed on a stack-based [`VM`].

pub mod compiler;
pub mod scanner;
pub mod vm;


pub use compiler::{compile, CompileError, SyntaxError};
pub use scanner::{Scanner, Token, TokenKind};
pub use vm::{chunk::Chunk, opcode::OpCode, value::Value, Fault, RuntimeError, VM};

/// Outcome of running a piece of source end to end.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpretResult {
    Ok(Value),
    CompileError(CompileError),
    RuntimeError(RuntimeError),
}

impl InterpretResult {
    /// Process exit status for this outcome (sysexits `EX_DATAERR` and
    /// `EX_SOFTWARE` for the two failure kinds).
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretResult::Ok(_) => 0,
            InterpretResult::CompileError(_) => 65,
            InterpretResult::RuntimeError(_) => 70,
        }
    }
}

/// Compiles `source` and, if that succeeds, runs it on `vm`.
pub fn interpret(vm: &mut VM, source: &str) -> InterpretResult {
    let chunk = match compile(source) {
        Ok(chunk) => chunk,
        Err(err) => return InterpretResult::CompileError(err),
    };
    match vm.interpret(&chunk) {
        Ok(value) => InterpretResult::Ok(value),
        Err(err) => InterpretResult::RuntimeError(err),
    }
}
