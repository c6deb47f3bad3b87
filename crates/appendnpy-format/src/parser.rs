//! Parser for the header dictionary literal
//!
//! The header is a Python dict literal with exactly three keys:
//! `{'descr': '<f8', 'fortran_order': False, 'shape': (10, 3), }`.
//! Keys may appear in any order, strings may use either quote style and
//! trailing commas are allowed in both the dict and the shape tuple.

use crate::dtype::DType;
use crate::error::{FormatError, Result};
use crate::header::Header;

/// Parser for header dictionary text
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given text
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the text into a [`Header`]
    ///
    /// Trailing padding and the terminating newline are accepted.
    pub fn parse(mut self) -> Result<Header> {
        let mut descr = None;
        let mut fortran_order = None;
        let mut shape = None;

        self.skip_whitespace();
        self.consume('{')?;
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }

            let key_pos = self.pos;
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.consume(':')?;
            self.skip_whitespace();

            match key.as_str() {
                "descr" => {
                    let value_pos = self.pos;
                    if self.peek() == Some('[') {
                        return Err(FormatError::UnsupportedDescr(
                            "structured type descriptor".to_string(),
                        ));
                    }
                    let text = self.parse_string()?;
                    let dtype = DType::parse(&text).map_err(|e| match e {
                        FormatError::UnsupportedDescr(_) => e,
                        other => FormatError::invalid_header(value_pos, other.to_string()),
                    })?;
                    Self::set_once(&mut descr, dtype, "descr", key_pos)?;
                }
                "fortran_order" => {
                    let value = self.parse_bool()?;
                    Self::set_once(&mut fortran_order, value, "fortran_order", key_pos)?;
                }
                "shape" => {
                    let value = self.parse_shape()?;
                    Self::set_once(&mut shape, value, "shape", key_pos)?;
                }
                _ => return Err(FormatError::UnexpectedKey(key.clone())),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(ch) => {
                    return Err(FormatError::invalid_header(
                        self.pos,
                        format!("expected ',' or '}}', found '{ch}'"),
                    ));
                }
                None => return Err(self.unexpected_end()),
            }
        }

        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(FormatError::invalid_header(
                self.pos,
                "trailing data after header dictionary",
            ));
        }

        Ok(Header {
            dtype: descr.ok_or(FormatError::MissingKey("descr"))?,
            fortran_order: fortran_order.ok_or(FormatError::MissingKey("fortran_order"))?,
            shape: shape.ok_or(FormatError::MissingKey("shape"))?,
        })
    }

    fn set_once<T>(slot: &mut Option<T>, value: T, key: &str, position: usize) -> Result<()> {
        if slot.replace(value).is_some() {
            return Err(FormatError::invalid_header(
                position,
                format!("duplicate key '{key}'"),
            ));
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn unexpected_end(&self) -> FormatError {
        FormatError::invalid_header(self.pos, "unexpected end of header")
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn consume(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(FormatError::invalid_header(
                self.pos,
                format!("expected '{expected}', found '{ch}'"),
            )),
            None => Err(self.unexpected_end()),
        }
    }

    /// Single- or double-quoted string without escapes
    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(ch) => {
                return Err(FormatError::invalid_header(
                    self.pos,
                    format!("expected string, found '{ch}'"),
                ));
            }
            None => return Err(self.unexpected_end()),
        };
        self.pos += 1;

        let start = self.pos;
        let Some(len) = self.input[start..].find(quote) else {
            return Err(FormatError::invalid_header(start, "unterminated string"));
        };
        let text = &self.input[start..start + len];
        if text.contains('\\') {
            return Err(FormatError::invalid_header(
                start,
                "escape sequences are not supported",
            ));
        }
        self.pos = start + len + 1;
        Ok(text.to_string())
    }

    fn parse_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        &input[start..self.pos]
    }

    fn parse_bool(&mut self) -> Result<bool> {
        let start = self.pos;
        match self.parse_identifier() {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(FormatError::invalid_header(
                start,
                format!("expected True or False, found '{other}'"),
            )),
        }
    }

    fn parse_dimension(&mut self) -> Result<u64> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(FormatError::invalid_header(start, "expected dimension"));
        }
        let value = self.input[start..self.pos]
            .parse::<u64>()
            .map_err(|e| FormatError::invalid_header(start, e.to_string()))?;

        // Python 2 long suffix
        if matches!(self.peek(), Some('L' | 'l')) {
            self.pos += 1;
        }
        Ok(value)
    }

    fn parse_shape(&mut self) -> Result<Vec<u64>> {
        self.consume('(')?;
        let mut dims = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(')') {
                self.pos += 1;
                break;
            }

            dims.push(self.parse_dimension()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                // A one-element tuple needs its trailing comma
                Some(')') if dims.len() > 1 => {}
                Some(')') => {
                    return Err(FormatError::invalid_header(
                        self.pos,
                        "one-element shape must end with ','",
                    ));
                }
                Some(ch) => {
                    return Err(FormatError::invalid_header(
                        self.pos,
                        format!("expected ',' or ')', found '{ch}'"),
                    ));
                }
                None => return Err(self.unexpected_end()),
            }
        }
        Ok(dims)
    }
}

/// Parse header dictionary text into a [`Header`]
pub fn parse(input: &str) -> Result<Header> {
    Parser::new(input).parse()
}
