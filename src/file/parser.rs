//! Low-level text cursor for signature and descriptor decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor over the
//! modified-UTF-8 text that compiled class metadata stores signatures and descriptors in.
//! All grammar tokens (`L`, `;`, `<`, `>`, `.`, `:`, `^`, `*`, `+`, `-`, `[`, `T`, `(`,
//! `)`) are ASCII, so the cursor works on bytes and only slices identifiers at ASCII
//! delimiters, which keeps every returned `&str` on a character boundary.
//!
//! # Key Components
//!
//! ## Navigation Methods
//! - [`crate::file::parser::Parser::advance`] - Move past the current character
//! - [`crate::file::parser::Parser::pos`] - Get current position
//!
//! ## Data Access Methods
//! - [`crate::file::parser::Parser::peek_byte`] - Peek at current byte without advancing
//! - [`crate::file::parser::Parser::expect_byte`] - Consume one specific byte
//! - [`crate::file::parser::Parser::read_identifier`] - Read up to a delimiter
//!
//! # Usage Examples
//!
//! ```rust
//! use classscope::Parser;
//!
//! let mut parser = Parser::new("Ljava/util/List;");
//! parser.expect_byte(b'L')?;
//! let name = parser.read_identifier(b";<.")?;
//! assert_eq!(name, "java/util/List");
//! parser.expect_byte(b';')?;
//! assert!(!parser.has_more_data());
//! # Ok::<(), classscope::Error>(())
//! ```

use crate::{Error, Result};

/// A cursor over signature text.
///
/// `Parser` keeps the complete input so that every error it produces can report the
/// offending signature and the byte offset at which decoding stopped.
pub struct Parser<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` over the provided text
    ///
    /// # Arguments
    /// * `text` - The signature or descriptor to parse
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Parser { text, position: 0 }
    }

    /// Check if there is more data to parse
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.text.len()
    }

    /// Move the position past the current character
    ///
    /// # Errors
    /// Returns an error if the cursor is already at the end
    pub fn advance(&mut self) -> Result<()> {
        let Some(character) = self.text[self.position..].chars().next() else {
            return Err(self.error("unexpected end of signature"));
        };

        self.position += character.len_utf8();
        Ok(())
    }

    /// Get the current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Peek at the current byte without advancing
    ///
    /// # Errors
    /// Returns an error if the cursor is at the end
    pub fn peek_byte(&self) -> Result<u8> {
        match self.text.as_bytes().get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(self.error("unexpected end of signature")),
        }
    }

    /// Consume the ASCII byte `expected`, failing if a different byte is found
    ///
    /// # Errors
    /// Returns an error if the current byte differs, `expected` is not ASCII or the
    /// cursor is at the end
    pub fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let found = self.peek_byte()?;
        if found != expected || !expected.is_ascii() {
            return Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char, found as char
            )));
        }

        self.position += 1;
        Ok(())
    }

    /// Consume the ASCII byte `expected` if it is the current byte
    pub fn consume_if(&mut self, expected: u8) -> bool {
        if expected.is_ascii() && self.text.as_bytes().get(self.position) == Some(&expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Read a non-empty identifier that ends before any of `delimiters`
    ///
    /// The delimiter itself is not consumed.
    ///
    /// # Errors
    /// Returns an error if no delimiter follows or the identifier is empty
    pub fn read_identifier(&mut self, delimiters: &[u8]) -> Result<&'a str> {
        let bytes = self.text.as_bytes();
        let start = self.position;
        let Some(length) = bytes[start..]
            .iter()
            .position(|byte| delimiters.contains(byte))
        else {
            return Err(self.error("unterminated identifier"));
        };

        if length == 0 {
            return Err(self.error("empty identifier"));
        }

        self.position = start + length;
        Ok(&self.text[start..self.position])
    }

    /// Build a [`Error::SignatureParse`] positioned at the cursor
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::SignatureParse {
            signature: self.text.to_string(),
            position: self.position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_identifier_stops_at_delimiter() {
        let mut parser = Parser::new("java/util/Map<TK;>;");
        assert_eq!(parser.read_identifier(b";<.").unwrap(), "java/util/Map");
        assert_eq!(parser.peek_byte().unwrap(), b'<');
        assert_eq!(parser.pos(), 13);
    }

    #[test]
    fn test_read_identifier_keeps_non_ascii() {
        let mut parser = Parser::new("café/Menü;");
        assert_eq!(parser.read_identifier(b";").unwrap(), "café/Menü");
        assert!(parser.consume_if(b';'));
        assert!(!parser.has_more_data());
    }

    #[test]
    fn test_error_handling() {
        let mut parser = Parser::new("Lfoo");
        parser.expect_byte(b'L').unwrap();
        assert!(parser.read_identifier(b";").is_err());

        let mut parser = Parser::new("");
        assert!(parser.peek_byte().is_err());
        assert!(parser.advance().is_err());

        let mut parser = Parser::new(";");
        match parser.read_identifier(b";") {
            Err(Error::SignatureParse { position, .. }) => assert_eq!(position, 0),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_cursor_stays_on_char_boundaries() {
        let text = "Lcafé;";
        let mut parser = Parser::new(text);
        parser.expect_byte(b'L').unwrap();
        for _ in 0..4 {
            parser.advance().unwrap();
            assert!(text.is_char_boundary(parser.pos()));
        }
        assert_eq!(parser.pos(), 6);
        assert!(parser.consume_if(b';'));

        let mut parser = Parser::new("é;");
        assert!(!parser.consume_if(0xC3));
        assert!(parser.expect_byte(0xC3).is_err());
        assert_eq!(parser.pos(), 0);
        assert_eq!(parser.read_identifier(b";").unwrap(), "é");
    }

    #[test]
    fn test_expect_byte_reports_mismatch() {
        let mut parser = Parser::new("I");
        match parser.expect_byte(b'(') {
            Err(Error::SignatureParse {
                signature, message, ..
            }) => {
                assert_eq!(signature, "I");
                assert!(message.contains("expected '('"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
