//! The token record handed over by a scanner.

use super::types::{TokenClass, TokenType};
use serde::{Deserialize, Serialize};
use std::ops::Range as ByteRange;

/// A single classified token.
///
/// Offsets are byte offsets into the scanned source with an exclusive end; `line` is
/// 1-based. `origin_id` identifies the file (or other origin) the token was scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub offset: usize,
    pub end_offset: usize,
    pub line: usize,
    pub origin_id: String,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        text: impl Into<String>,
        offset: usize,
        end_offset: usize,
        line: usize,
        origin_id: impl Into<String>,
    ) -> Self {
        Self {
            token_type,
            text: text.into(),
            offset,
            end_offset,
            line,
            origin_id: origin_id.into(),
        }
    }

    pub fn class(&self) -> TokenClass {
        self.token_type.class()
    }

    pub fn span(&self) -> ByteRange<usize> {
        self.offset..self.end_offset
    }

    /// Build a replacement token with new text and type at this token's location.
    ///
    /// Offset, end offset, line and origin are kept verbatim: the replacement still stands
    /// for the same stretch of source.
    pub fn with_text_and_type(&self, text: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            token_type,
            text: text.into(),
            offset: self.offset,
            end_offset: self.end_offset,
            line: self.line,
            origin_id: self.origin_id.clone(),
        }
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }
}
