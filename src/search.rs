//! Pattern search
//!
//!     Runs a set of token patterns over one token list and reports every match as a
//!     `SearchHit`. Each pattern belongs to a named group (a rule id, a category, whatever the
//!     caller groups findings by). Token types can be ignored: they are removed before
//!     matching, so `<STATIC><INLINE>` also matches across a comment between the two keywords
//!     when comments are ignored. Hit offsets and token ranges always refer to the original,
//!     unfiltered token list.
//!
//!     Zero-length matches (e.g. of `<IDENTIFIER>*`) are not reported.

use crate::pattern::{PatternCompilationError, PatternOptions, TokenClassPattern, TokenTypePattern};
use crate::token::{Token, TokenType};
use log::debug;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Range;

#[derive(Debug)]
enum CompiledPattern {
    Type(TokenTypePattern),
    Class(TokenClassPattern),
}

impl CompiledPattern {
    fn expression(&self) -> &str {
        match self {
            CompiledPattern::Type(pattern) => pattern.expression(),
            CompiledPattern::Class(pattern) => pattern.expression(),
        }
    }

    fn ranges(&self, tokens: &[Token]) -> Vec<Range<usize>> {
        let mut matcher = match self {
            CompiledPattern::Type(pattern) => pattern.matcher(tokens),
            CompiledPattern::Class(pattern) => pattern.matcher(tokens),
        };
        let mut ranges = Vec::new();
        while matcher.find() {
            if let Some(range) = matcher.range() {
                if !range.is_empty() {
                    ranges.push(range);
                }
            }
        }
        ranges
    }
}

#[derive(Debug)]
struct GroupedPattern {
    group: String,
    pattern: CompiledPattern,
}

/// One match of one pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub group: String,
    pub expression: String,
    pub message: String,
    pub origin_id: String,
    pub line: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Matched tokens as indices into the searched list.
    pub token_range: Range<usize>,
}

#[derive(Debug, Default)]
pub struct PatternSearch {
    options: PatternOptions,
    patterns: Vec<GroupedPattern>,
    ignored: HashSet<TokenType>,
}

impl PatternSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile subsequently added patterns with `options`.
    pub fn with_options(options: PatternOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn add_type_pattern(
        &mut self,
        expression: &str,
        group: impl Into<String>,
    ) -> Result<&mut Self, PatternCompilationError> {
        let pattern = TokenTypePattern::with_options(expression, self.options)?;
        self.patterns.push(GroupedPattern {
            group: group.into(),
            pattern: CompiledPattern::Type(pattern),
        });
        Ok(self)
    }

    pub fn add_class_pattern(
        &mut self,
        expression: &str,
        group: impl Into<String>,
    ) -> Result<&mut Self, PatternCompilationError> {
        let pattern = TokenClassPattern::with_options(expression, self.options)?;
        self.patterns.push(GroupedPattern {
            group: group.into(),
            pattern: CompiledPattern::Class(pattern),
        });
        Ok(self)
    }

    /// Remove tokens of this type before matching.
    pub fn ignore(&mut self, token_type: TokenType) -> &mut Self {
        self.ignored.insert(token_type);
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All hits of all patterns, grouped by pattern in insertion order.
    pub fn search(&self, tokens: &[Token]) -> Vec<SearchHit> {
        let (searched, positions) = self.filter(tokens);

        let mut hits = Vec::new();
        for grouped in &self.patterns {
            let ranges = grouped.pattern.ranges(&searched);
            debug!(
                "pattern {:?} ({}): {} hit(s)",
                grouped.pattern.expression(),
                grouped.group,
                ranges.len()
            );
            for range in ranges {
                let first = &searched[range.start];
                let last = &searched[range.end - 1];
                let token_range = match &positions {
                    Some(positions) => positions[range.start]..positions[range.end - 1] + 1,
                    None => range.clone(),
                };
                let expression = grouped.pattern.expression();
                hits.push(SearchHit {
                    group: grouped.group.clone(),
                    expression: expression.to_string(),
                    message: format!("Pattern \"{}\" found", expression),
                    origin_id: first.origin_id.clone(),
                    line: first.line,
                    start_offset: first.offset,
                    end_offset: last.end_offset,
                    token_range,
                });
            }
        }

        hits
    }

    /// Drop ignored tokens, remembering the original index of each kept one.
    fn filter<'t>(&self, tokens: &'t [Token]) -> (Cow<'t, [Token]>, Option<Vec<usize>>) {
        if self.ignored.is_empty() {
            return (Cow::Borrowed(tokens), None);
        }

        let mut kept = Vec::with_capacity(tokens.len());
        let mut positions = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            if !self.ignored.contains(&token.token_type) {
                kept.push(token.clone());
                positions.push(index);
            }
        }
        (Cow::Owned(kept), Some(positions))
    }
}
