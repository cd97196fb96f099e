use std::{fmt::Display, mem};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    scanner::{Scanner, Token, TokenKind},
    vm::{chunk::Chunk, opcode::OpCode, value::Value},
};

/// One diagnostic produced while compiling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    /// ` at end`, ` at 'lexeme'`, or empty when the scanner produced the error.
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub errors: Vec<SyntaxError>,
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}

pub fn compile(source: &str) -> Result<Chunk, CompileError> {
    Compiler::new(source).compile()
}

type ParseFn<'src> = fn(&mut Compiler<'src>);

pub struct Compiler<'src> {
    scanner: Scanner<'src>,
    current: Token<'src>,
    previous: Token<'src>,
    chunk: Chunk,
    errors: Vec<SyntaxError>,
    panic_mode: bool,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Compiler {
            scanner: Scanner::new(source),
            current: Token::default(),
            previous: Token::default(),
            chunk: Chunk::new(),
            errors: Vec::new(),
            panic_mode: false,
        }
    }

    pub fn compile(mut self) -> Result<Chunk, CompileError> {
        self.advance();
        if self.check(TokenKind::Eof) {
            self.error_at_current("Expect expression.");
        }

        let mut first = true;
        while !self.check(TokenKind::Eof) {
            if !first {
                // only the last statement's value survives to Return
                self.emit_op(OpCode::Pop);
            }
            first = false;
            self.expression_statement();
            if self.panic_mode {
                self.synchronize();
            }
        }
        self.emit_op(OpCode::Return);

        if self.errors.is_empty() {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("\n{}", self.chunk.disassemble("code"));
            }
            Ok(self.chunk)
        } else {
            Err(CompileError {
                errors: self.errors,
            })
        }
    }

    fn expression_statement(&mut self) {
        self.expression();
        if !self.match_token(TokenKind::Semicolon) && !self.check(TokenKind::Eof) {
            self.error_at_current("Expect ';' after expression.");
        }
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let Some(prefix_fn) = get_rule(self.previous.kind).prefix else {
            self.error("Expect expression.");
            return;
        };
        prefix_fn(self);

        while precedence <= get_rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix_fn) = get_rule(self.previous.kind).infix {
                infix_fn(self);
            }
        }
    }

    fn number(&mut self) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(n) => self.emit_constant(Value::Number(n)),
            Err(_) => self.error("Invalid number literal."),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;
        self.parse_precedence(Precedence::Unary);
        match operator {
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            TokenKind::Bang => self.emit_op(OpCode::Not),
            _ => {}
        }
    }

    fn binary(&mut self) {
        let operator = self.previous.kind;
        let rule = get_rule(operator);
        self.parse_precedence(rule.precedence + 1);

        match operator {
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            _ => {}
        }
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::True => self.emit_op(OpCode::True),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            _ => {}
        }
    }

    // Emission

    fn emit_byte(&mut self, byte: u8) {
        // the chunk of a failed compilation is thrown away
        if !self.errors.is_empty() {
            return;
        }
        self.chunk.write(byte, self.previous.line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.chunk.add_constant(value);
        match u8::try_from(index) {
            Ok(index) => index,
            Err(_) => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    // Token plumbing

    fn advance(&mut self) {
        self.previous = mem::take(&mut self.current);

        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            self.error_at_current(self.current.lexeme);
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            false
        } else {
            self.advance();
            true
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        let location = match token.kind {
            TokenKind::Eof => String::from(" at end"),
            TokenKind::Error => String::new(),
            _ => format!(" at '{}'", token.lexeme),
        };
        let err = SyntaxError {
            line: token.line,
            location,
            message: message.to_string(),
        };
        log::debug!("{}", err);
        self.errors.push(err);
    }

    fn synchronize(&mut self) {
        // stay in panic mode while skipping so bad tokens in the discarded
        // statement are not reported
        while !self.check(TokenKind::Eof) && self.previous.kind != TokenKind::Semicolon {
            self.advance();
        }
        self.panic_mode = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // . ()
    Primary,
}

impl std::ops::Add<u8> for Precedence {
    type Output = Self;

    fn add(self, rhs: u8) -> Self::Output {
        Self::try_from(u8::from(self).saturating_add(rhs)).unwrap_or(Precedence::Primary)
    }
}

struct ParseRule<'src> {
    prefix: Option<ParseFn<'src>>,
    infix: Option<ParseFn<'src>>,
    precedence: Precedence,
}

impl<'src> ParseRule<'src> {
    fn new(
        prefix: Option<ParseFn<'src>>,
        infix: Option<ParseFn<'src>>,
        precedence: Precedence,
    ) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

fn get_rule<'src>(kind: TokenKind) -> ParseRule<'src> {
    match kind {
        TokenKind::LeftParen => ParseRule::new(Some(Compiler::grouping), None, Precedence::None),
        TokenKind::Minus => {
            ParseRule::new(Some(Compiler::unary), Some(Compiler::binary), Precedence::Term)
        }
        TokenKind::Plus => ParseRule::new(None, Some(Compiler::binary), Precedence::Term),
        TokenKind::Slash => ParseRule::new(None, Some(Compiler::binary), Precedence::Factor),
        TokenKind::Star => ParseRule::new(None, Some(Compiler::binary), Precedence::Factor),
        TokenKind::Bang => ParseRule::new(Some(Compiler::unary), None, Precedence::None),
        TokenKind::BangEqual | TokenKind::EqualEqual => {
            ParseRule::new(None, Some(Compiler::binary), Precedence::Equality)
        }
        TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => {
            ParseRule::new(None, Some(Compiler::binary), Precedence::Comparison)
        }
        TokenKind::Number => ParseRule::new(Some(Compiler::number), None, Precedence::None),
        TokenKind::True | TokenKind::False | TokenKind::Nil => {
            ParseRule::new(Some(Compiler::literal), None, Precedence::None)
        }
        _ => ParseRule::new(None, None, Precedence::None),
    }
}
