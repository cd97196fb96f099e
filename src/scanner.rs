use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*)")]
pub enum TokenKind {
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
    #[regex(r#""[^"\n]*""#)]
    String,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[token("and")]
    And,
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,
    // The only lexeme logos classifies as an error is a string still open
    // at a newline or at end of input; stray characters come back as `Err`.
    #[regex(r#""[^"\n]*"#)]
    Error,
    Eof,
}

/// A classified slice of the source.
///
/// `start` and `len` are byte offsets into the scanned source and `lexeme`
/// borrows that same range, except for error tokens where `lexeme` is the
/// diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
    pub line: usize,
    pub lexeme: &'src str,
}

impl Default for Token<'_> {
    fn default() -> Self {
        Self {
            kind: TokenKind::Eof,
            start: 0,
            len: 0,
            line: 1,
            lexeme: "",
        }
    }
}

/// Pull-based tokenizer: every `scan_token` call yields the next token.
pub struct Scanner<'src> {
    source: &'src str,
    lexer: Lexer<'src, TokenKind>,
    line: usize,
    // newlines before this offset are already reflected in `line`
    counted: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: TokenKind::lexer(source),
            line: 1,
            counted: 0,
        }
    }

    pub fn scan_token(&mut self) -> Token<'src> {
        match self.lexer.next() {
            Some(Ok(TokenKind::Error)) => self.error_token("Unterminated string."),
            Some(Ok(kind)) => self.make_token(kind),
            Some(Err(())) => self.error_token("Unexpected character."),
            None => {
                self.advance_line(self.source.len());
                Token {
                    kind: TokenKind::Eof,
                    start: self.source.len(),
                    len: 0,
                    line: self.line,
                    lexeme: "",
                }
            }
        }
    }

    fn make_token(&mut self, kind: TokenKind) -> Token<'src> {
        let span = self.lexer.span();
        self.advance_line(span.start);
        Token {
            kind,
            start: span.start,
            len: span.len(),
            line: self.line,
            lexeme: self.lexer.slice(),
        }
    }

    fn error_token(&mut self, message: &'static str) -> Token<'src> {
        let span = self.lexer.span();
        self.advance_line(span.start);
        Token {
            kind: TokenKind::Error,
            start: span.start,
            len: span.len(),
            line: self.line,
            lexeme: message,
        }
    }

    fn advance_line(&mut self, upto: usize) {
        if upto > self.counted {
            self.line += self.source.as_bytes()[self.counted..upto]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.counted = upto;
        }
    }
}
