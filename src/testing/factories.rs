//! Token factories for tests.

use crate::token::{Token, TokenType};

/// Origin id used by all factory-built tokens.
pub const TEST_ORIGIN: &str = "test.c";

/// A token on line 1 starting at `offset`, spanning its text.
pub fn mk_token(token_type: TokenType, text: &str, offset: usize) -> Token {
    Token::new(
        token_type,
        text,
        offset,
        offset + text.len(),
        1,
        TEST_ORIGIN,
    )
}

/// Lay out `(type, text)` pairs on one line, separated by single spaces.
pub fn mk_tokens(items: &[(TokenType, &str)]) -> Vec<Token> {
    let mut offset = 0;
    items
        .iter()
        .map(|(token_type, text)| {
            let token = mk_token(*token_type, text, offset);
            offset = token.end_offset + 1;
            token
        })
        .collect()
}
