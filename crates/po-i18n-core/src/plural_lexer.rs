use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number(i64),
    Var,
    LParen,
    RParen,
    Bang,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Amp,
    AndAnd,
    Pipe,
    OrOr,
    Question,
    Colon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralError {
    pub message: &'static str,
    pub span: Span,
}

impl fmt::Display for PluralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plural expression: {} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PluralError {}

pub struct Lexer<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            offset: 0,
        }
    }

    pub fn lex_all(mut self) -> Result<Vec<Token>, PluralError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.offset >= self.bytes.len() {
                break;
            }
            tokens.push(self.lex_token()?);
        }
        Ok(tokens)
    }

    fn lex_token(&mut self) -> Result<Token, PluralError> {
        let start = self.offset;
        let byte = self.bytes[self.offset];
        let next = self.peek_byte();
        let (kind, width) = match byte {
            b'0'..=b'9' => return self.lex_number(),
            b'n' => {
                if next.is_some_and(is_ident_continue) {
                    return Err(self.lex_unknown_ident());
                }
                (TokenKind::Var, 1)
            }
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'+' => (TokenKind::Plus, 1),
            b'-' => (TokenKind::Minus, 1),
            b'*' => (TokenKind::Star, 1),
            b'/' => (TokenKind::Slash, 1),
            b'%' => (TokenKind::Percent, 1),
            b'?' => (TokenKind::Question, 1),
            b':' => (TokenKind::Colon, 1),
            b'<' if next == Some(b'=') => (TokenKind::Le, 2),
            b'<' => (TokenKind::Lt, 1),
            b'>' if next == Some(b'=') => (TokenKind::Ge, 2),
            b'>' => (TokenKind::Gt, 1),
            b'=' if next == Some(b'=') => (TokenKind::EqEq, 2),
            b'!' if next == Some(b'=') => (TokenKind::NotEq, 2),
            b'!' => (TokenKind::Bang, 1),
            b'&' if next == Some(b'&') => (TokenKind::AndAnd, 2),
            b'&' => (TokenKind::Amp, 1),
            b'|' if next == Some(b'|') => (TokenKind::OrOr, 2),
            b'|' => (TokenKind::Pipe, 1),
            _ if is_ident_start(byte) => return Err(self.lex_unknown_ident()),
            _ => {
                return Err(PluralError {
                    message: "unexpected character",
                    span: Span {
                        start,
                        end: start + 1,
                    },
                });
            }
        };
        self.offset += width;
        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.offset,
            },
        })
    }

    fn lex_number(&mut self) -> Result<Token, PluralError> {
        let start = self.offset;
        let mut value: i64 = 0;
        let mut overflow = false;
        while self.offset < self.bytes.len() && self.bytes[self.offset].is_ascii_digit() {
            let digit = i64::from(self.bytes[self.offset] - b'0');
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(next) => value = next,
                None => overflow = true,
            }
            self.offset += 1;
        }
        let span = Span {
            start,
            end: self.offset,
        };
        if overflow {
            return Err(PluralError {
                message: "number out of range",
                span,
            });
        }
        Ok(Token {
            kind: TokenKind::Number(value),
            span,
        })
    }

    fn lex_unknown_ident(&mut self) -> PluralError {
        let start = self.offset;
        while self.offset < self.bytes.len() && is_ident_continue(self.bytes[self.offset]) {
            self.offset += 1;
        }
        PluralError {
            message: "unknown identifier",
            span: Span {
                start,
                end: self.offset,
            },
        }
    }

    fn skip_whitespace(&mut self) {
        while self.offset < self.bytes.len() && self.bytes[self.offset].is_ascii_whitespace() {
            self.offset += 1;
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.offset + 1).copied()
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    is_ident_start(byte) || byte.is_ascii_digit()
}
