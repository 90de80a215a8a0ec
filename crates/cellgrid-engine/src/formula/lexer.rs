//! Tokenizer for the arithmetic formula grammar.
//!
//! A `CELLREF` token is accepted for any `[A-Za-z]+[0-9]+` shape whose row and
//! column fit in a `usize` — it is *not* range-checked against `MAX_ROWS`/
//! `MAX_COLS` here. A syntactically valid but out-of-grid reference becomes a
//! `Ref` AST node that evaluates to `#REF!`; only tokens that can't represent
//! a position at all fail to lex (see the module-level docs on `formula::parse`).

use std::sync::OnceLock;

use regex::Regex;

use crate::error::FormulaException;
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Num(f64),
    Ref(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    End,
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    /// Returns the next token along with the byte offset it started at.
    pub fn next_token(&mut self) -> Result<(Token, usize), FormulaException> {
        self.skip_ws();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok((Token::End, start));
        };
        let token = match c {
            b'+' => {
                self.pos += 1;
                Token::Plus
            }
            b'-' => {
                self.pos += 1;
                Token::Minus
            }
            b'*' => {
                self.pos += 1;
                Token::Star
            }
            b'/' => {
                self.pos += 1;
                Token::Slash
            }
            b'(' => {
                self.pos += 1;
                Token::LParen
            }
            b')' => {
                self.pos += 1;
                Token::RParen
            }
            b'0'..=b'9' | b'.' => self.lex_number(start)?,
            b'A'..=b'Z' | b'a'..=b'z' => self.lex_ref(start)?,
            other => {
                return Err(FormulaException {
                    message: format!("unexpected character '{}'", other as char),
                    pos: start,
                });
            }
        };
        Ok((token, start))
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, FormulaException> {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let checkpoint = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(b'0'..=b'9')) {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            } else {
                // Not actually an exponent (e.g. a trailing "e" with no digits); back off.
                self.pos = checkpoint;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).expect("ASCII slice is valid utf8");
        let n: f64 = text.parse().map_err(|_| FormulaException {
            message: format!("invalid number literal '{text}'"),
            pos: start,
        })?;
        Ok(Token::Num(n))
    }

    fn lex_ref(&mut self, start: usize) -> Result<Token, FormulaException> {
        while matches!(self.peek(), Some(b'A'..=b'Z') | Some(b'a'..=b'z')) {
            self.pos += 1;
        }
        let letters_end = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == letters_end {
            return Err(FormulaException {
                message: "expected a row number after the column letters".to_string(),
                pos: self.pos,
            });
        }
        let letters = std::str::from_utf8(&self.src[start..letters_end]).expect("ASCII slice is valid utf8");
        let digits = std::str::from_utf8(&self.src[letters_end..self.pos]).expect("ASCII slice is valid utf8");

        let mut col_acc: usize = 0;
        for b in letters.bytes() {
            let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26).and_then(|v| v.checked_add(digit)).ok_or_else(|| {
                FormulaException {
                    message: format!("cell reference '{letters}{digits}' is unrepresentable"),
                    pos: start,
                }
            })?;
        }
        let col = col_acc - 1;

        let row_num: usize = digits.parse().map_err(|_| FormulaException {
            message: format!("cell reference '{letters}{digits}' is unrepresentable"),
            pos: start,
        })?;
        let row = row_num.checked_sub(1).ok_or_else(|| FormulaException {
            message: "row 0 is not a valid cell reference".to_string(),
            pos: start,
        })?;

        Ok(Token::Ref(Position::new(row, col)))
    }
}

/// Parse a bare NUMBER token per the grammar, plus an optional leading sign —
/// used to coerce a Text cell's value when it is referenced arithmetically
/// (§4.2: "same grammar as NUMBER"). Rejects `inf`/`nan` spellings that a bare
/// `str::parse::<f64>()` would otherwise accept.
pub fn parse_number_literal(s: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("number regex must compile")
    });
    if !re.is_match(s) {
        return None;
    }
    let n: f64 = s.parse().ok()?;
    n.is_finite().then_some(n)
}
