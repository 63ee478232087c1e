use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::plural_lexer::{Lexer, PluralError, Span, Token, TokenKind};

// Real formulas nest a handful of levels and stay well under a hundred tokens.
// Both limits keep parsing, evaluation and drop off deep recursion.
const MAX_DEPTH: usize = 64;
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(i64),
    Var,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    And,
    BitOr,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::Or => "||",
        }
    }
}

pub fn parse_expression(input: &str) -> Result<Expr, PluralError> {
    let tokens = Lexer::new(input).lex_all()?;
    if let Some(token) = tokens.get(MAX_TOKENS) {
        return Err(PluralError {
            message: "expression too long",
            span: token.span,
        });
    }
    let mut parser = Parser::new(tokens, input.len());
    if parser.peek().is_none() {
        return Err(parser.error("empty expression", parser.eof_span()));
    }
    let expr = parser.parse_ternary()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error("unexpected trailing token", token.span));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    input_len: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, input_len: usize) -> Self {
        Self {
            tokens,
            index: 0,
            input_len,
            depth: 0,
        }
    }

    fn parse_ternary(&mut self) -> Result<Expr, PluralError> {
        self.descend()?;
        let expr = self.parse_conditional();
        self.depth -= 1;
        expr
    }

    fn parse_conditional(&mut self) -> Result<Expr, PluralError> {
        let cond = self.parse_or()?;
        if !self.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_ternary()?;
        self.expect(TokenKind::Colon, "expected ':' in conditional")?;
        let otherwise = self.parse_ternary()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_and()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::OrOr) => BinaryOp::Or,
                Some(TokenKind::Pipe) => BinaryOp::BitOr,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_and()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_and(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_equality()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::AndAnd) => BinaryOp::And,
                Some(TokenKind::Amp) => BinaryOp::BitAnd,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_equality()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_equality(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => BinaryOp::Eq,
                Some(TokenKind::NotEq) => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_relational()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, PluralError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.index += 1;
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, PluralError> {
        let op = match self.peek_kind() {
            Some(TokenKind::Bang) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Neg,
            _ => return self.parse_primary(),
        };
        self.index += 1;
        self.descend()?;
        let operand = self.parse_unary();
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, PluralError> {
        let Some(token) = self.next() else {
            return Err(self.error("unexpected end of expression", self.eof_span()));
        };
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Literal(value)),
            TokenKind::Var => Ok(Expr::Var),
            TokenKind::LParen => {
                let inner = self.parse_ternary()?;
                self.expect(TokenKind::RParen, "expected ')'")?;
                Ok(inner)
            }
            _ => Err(self.error("expected operand", token.span)),
        }
    }

    fn descend(&mut self) -> Result<(), PluralError> {
        if self.depth >= MAX_DEPTH {
            let span = self.peek().map_or(self.eof_span(), |token| token.span);
            return Err(self.error("expression nested too deeply", span));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind, message: &'static str) -> Result<Token, PluralError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.error(message, token.span)),
            None => Err(self.error(message, self.eof_span())),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).copied();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eof_span(&self) -> Span {
        Span {
            start: self.input_len,
            end: self.input_len,
        }
    }

    fn error(&self, message: &'static str, span: Span) -> PluralError {
        PluralError { message, span }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
