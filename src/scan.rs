// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Book code payloads.
//!
//! A book code decodes to `book:<id>` where `<id>` is one or more ASCII
//! letters, digits, '-' or '_'.

use std::fmt;

use crate::error::ScanError;

pub const PAYLOAD_PREFIX: &str = "book:";

/// A validated book identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookId(String);

impl BookId {
    pub fn parse(id: &str) -> Result<Self, ScanError> {
        if id.is_empty() {
            return Err(ScanError::EmptyId);
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ScanError::InvalidId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a decoded payload and extract the book id.
///
/// The payload must be exactly `book:<id>`, with nothing around it.
pub fn parse_payload(payload: &str) -> Result<BookId, ScanError> {
    let id = payload
        .strip_prefix(PAYLOAD_PREFIX)
        .ok_or(ScanError::MissingPrefix)?;
    BookId::parse(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_book_payload() {
        assert_eq!(parse_payload("book:abc-123").unwrap().as_str(), "abc-123");
        assert_eq!(parse_payload("book:Vol_2").unwrap().as_str(), "Vol_2");
    }

    #[test]
    fn test_surrounding_whitespace_is_rejected() {
        assert_eq!(parse_payload(" book:abc-123"), Err(ScanError::MissingPrefix));
        assert_eq!(
            parse_payload("book:abc\n"),
            Err(ScanError::InvalidId("abc\n".to_string()))
        );
        assert!(matches!(parse_payload("book:abc "), Err(ScanError::InvalidId(_))));
    }

    #[test]
    fn test_rejects_other_payloads() {
        assert_eq!(parse_payload("movie:abc-123"), Err(ScanError::MissingPrefix));
        assert_eq!(parse_payload("book:"), Err(ScanError::EmptyId));
        assert_eq!(parse_payload("BOOK:abc"), Err(ScanError::MissingPrefix));
        assert_eq!(
            parse_payload("book:abc:def"),
            Err(ScanError::InvalidId("abc:def".to_string()))
        );
        assert!(matches!(parse_payload("book:a b"), Err(ScanError::InvalidId(_))));
        assert!(matches!(parse_payload("book:caf\u{e9}"), Err(ScanError::InvalidId(_))));
    }
}
