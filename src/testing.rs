//! Testing utilities
//!
//!     The core never tokenizes source text. Tests, however, read far better as C snippets
//!     than as hand-built token vectors, so this module carries a small fixture scanner
//!     (`scan`) built on logos, plus factories for single tokens.
//!
//!     The fixture scanner knows just enough C to produce realistic token lists: keywords,
//!     identifiers, literals, punctuation, comments and whole-line preprocessor directives.
//!     It is not a conforming C scanner and is not used by any production code path.

pub mod factories;
pub mod scanner;

pub use factories::{mk_token, mk_tokens};
pub use scanner::{scan, scan_origin};

/// Token texts of a list, for compact assertions.
pub fn texts(tokens: &[crate::token::Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.text.as_str()).collect()
}

/// Token types of a list, for compact assertions.
pub fn types(tokens: &[crate::token::Token]) -> Vec<crate::token::TokenType> {
    tokens.iter().map(|token| token.token_type).collect()
}
