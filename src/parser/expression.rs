//! Arithmetic expression evaluation for custom polygon coordinates.
//!
//! Custom polygon points are written as `[expr,expr]` pairs where each
//! expression may use numbers, `+ - * /`, unary minus, parentheses, and the
//! symbols `x` and `y` (bound to the half-width and half-height of the
//! drawing). A tiny recursive-descent parser keeps this dependency-free.

use anyhow::{bail, Result};

/// Evaluates one expression with `x` and `y` bound.
///
/// # Errors
///
/// Returns an error on malformed syntax, unknown symbols or division by a
/// value that produces a non-finite result.
pub fn eval(expr: &str, x: f64, y: f64) -> Result<f64> {
    let mut parser = Parser {
        input: expr.as_bytes(),
        pos: 0,
        x,
        y,
    };
    let value = parser.expression()?;
    parser.skip_spaces();
    if parser.pos != parser.input.len() {
        bail!("trailing input at offset {} in expression '{expr}'", parser.pos);
    }
    if !value.is_finite() {
        bail!("expression '{expr}' evaluates to a non-finite value");
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    x: f64,
    y: f64,
}

impl Parser<'_> {
    fn skip_spaces(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_spaces();
        self.input.get(self.pos).copied()
    }

    /// expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                b'+' => {
                    self.pos += 1;
                    value += self.term()?;
                }
                b'-' => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                b'*' => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                b'/' => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// factor := '-' factor | '(' expression ')' | number | symbol
    fn factor(&mut self) -> Result<f64> {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expression()?;
                match self.peek() {
                    Some(b')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => bail!("missing ')' at offset {}", self.pos),
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.symbol(),
            Some(c) => bail!("unexpected character '{}' at offset {}", c as char, self.pos),
            None => bail!("unexpected end of expression"),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        while self.pos < self.input.len()
            && (self.input[self.pos].is_ascii_digit() || self.input[self.pos] == b'.')
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos]).expect("ascii digits");
        match text.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => bail!("invalid number '{text}' at offset {start}"),
        }
    }

    fn symbol(&mut self) -> Result<f64> {
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        let name = std::str::from_utf8(&self.input[start..self.pos]).expect("ascii letters");
        match name {
            "x" => Ok(self.x),
            "y" => Ok(self.y),
            other => bail!("unknown symbol '{other}' at offset {start}"),
        }
    }
}
