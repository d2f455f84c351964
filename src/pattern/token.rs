//! Token patterns
//!
//!     The two classifiers used on token lists: by exact [`TokenType`] and by coarse
//!     [`TokenClass`]. Both use the raw token text as content, so content sub-patterns
//!     behave the same under either granularity.

use super::compiler::{Classifier, EnumPattern, PatternOptions};
use super::error::PatternCompilationError;
use crate::token::{Token, TokenClass, TokenType};
use std::str::FromStr;

/// Classifies tokens by their exact type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTokenType;

/// Classifies tokens by their coarse class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTokenClass;

impl Classifier for ByTokenType {
    type Element = Token;
    type Literal = TokenType;

    fn resolve(&self, name: &str) -> Option<TokenType> {
        TokenType::from_str(name).ok()
    }

    fn classify(&self, token: &Token) -> TokenType {
        token.token_type
    }

    fn content<'e>(&self, token: &'e Token) -> &'e str {
        &token.text
    }
}

impl Classifier for ByTokenClass {
    type Element = Token;
    type Literal = TokenClass;

    fn resolve(&self, name: &str) -> Option<TokenClass> {
        TokenClass::from_str(name).ok()
    }

    fn classify(&self, token: &Token) -> TokenClass {
        token.class()
    }

    fn content<'e>(&self, token: &'e Token) -> &'e str {
        &token.text
    }
}

/// Pattern over token types, e.g. `<STATIC><INLINE>`.
pub type TokenTypePattern = EnumPattern<ByTokenType>;

/// Pattern over token classes, e.g. `<KEYWORD>+<IDENTIFIER>`.
pub type TokenClassPattern = EnumPattern<ByTokenClass>;

impl TokenTypePattern {
    pub fn new(expression: &str) -> Result<Self, PatternCompilationError> {
        EnumPattern::compile(ByTokenType, expression)
    }

    pub fn with_options(
        expression: &str,
        options: PatternOptions,
    ) -> Result<Self, PatternCompilationError> {
        EnumPattern::compile_with_options(ByTokenType, expression, options)
    }
}

impl TokenClassPattern {
    pub fn new(expression: &str) -> Result<Self, PatternCompilationError> {
        EnumPattern::compile(ByTokenClass, expression)
    }

    pub fn with_options(
        expression: &str,
        options: PatternOptions,
    ) -> Result<Self, PatternCompilationError> {
        EnumPattern::compile_with_options(ByTokenClass, expression, options)
    }
}

impl<C: Classifier<Element = Token>> EnumPattern<C> {
    /// All non-overlapping matches, as sub-slices of `tokens`.
    ///
    /// Follows the find-loop: matches are reported in order and each search resumes after
    /// the previous match.
    pub fn match_all<'t>(&self, tokens: &'t [Token]) -> Vec<&'t [Token]> {
        let mut matcher = self.matcher(tokens);
        let mut matches = Vec::new();
        while matcher.find() {
            if let Some(range) = matcher.range() {
                matches.push(&tokens[range]);
            }
        }
        matches
    }
}
