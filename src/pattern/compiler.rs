//! Pattern Compiler
//!
//!     Turns a pattern expression over classification names into a string regex over the
//!     synthetic alphabet. Matching then encodes the sequence as a string, matches the
//!     string, and maps the match back to element indices.
//!
//! Expression Grammar
//!
//!     `<NAME>`              one element classified as NAME
//!     `<NAME=subpattern>`   one element classified as NAME whose content matches subpattern
//!
//!     Everything outside `<...>` is regex syntax and passes through untouched, so
//!     `(<A>|<B>)+<C>?` means what it looks like.
//!
//! Compilation
//!
//!     1. Scan all `<...>` terms (non-greedy) and collect the literals that carry a content
//!        sub-pattern anywhere in the expression.
//!     2. Scan again, replacing each term with its literal's synthetic character. A
//!        content-matched literal becomes a capturing group around the character, the
//!        content delimiters and the (wildcard-restricted) sub-pattern; this applies to
//!        every occurrence of that literal, with or without its own sub-pattern.
//!     3. Compile the result. Compilation is bounded by [`PatternOptions`].

use super::alphabet::{
    restrict_wildcards, Alphabet, CONTENT_END, CONTENT_END_STANDIN, CONTENT_START,
    DEFAULT_CONTENT_PATTERN, SYMBOL_WIDTH,
};
use super::error::PatternCompilationError;
use super::matcher::EnumPatternMatcher;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

/// A `<...>` term in a pattern expression. Capture 1 is the term body.
static LITERAL_TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(.*?)>").unwrap());

const CONTENT_PATTERN_DELIMITER: char = '=';

/// How elements are classified, what their content is, and how literal names resolve.
///
/// The resolver is fixed per classifier, so name lookup is validated once while compiling
/// and never repeated while matching.
pub trait Classifier {
    type Element;
    type Literal: Copy + Eq + Hash + fmt::Debug;

    /// Resolve a literal name used in a pattern expression.
    fn resolve(&self, name: &str) -> Option<Self::Literal>;

    /// Classification of one element.
    fn classify(&self, element: &Self::Element) -> Self::Literal;

    /// Text used for content sub-pattern matching.
    fn content<'e>(&self, element: &'e Self::Element) -> &'e str;
}

/// Limits applied when building the underlying regexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    pub size_limit: usize,
    pub dfa_size_limit: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
        }
    }
}

impl PatternOptions {
    /// Every regex built for a pattern, content sub-patterns included, goes through here.
    fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit);
        builder
    }
}

/// A compiled sequence pattern. Immutable after construction.
#[derive(Debug, Clone)]
pub struct EnumPattern<C: Classifier> {
    classifier: C,
    expression: String,
    synthetic_expression: String,
    alphabet: Alphabet<C::Literal>,
    content_matched: HashSet<C::Literal>,
    regex: Regex,
    full_regex: Regex,
}

struct LiteralTerm<'a> {
    span: Range<usize>,
    body: &'a str,
}

impl<'a> LiteralTerm<'a> {
    fn split(&self) -> (&'a str, Option<&'a str>) {
        match self.body.split_once(CONTENT_PATTERN_DELIMITER) {
            Some((name, content)) => (name, Some(content)),
            None => (self.body, None),
        }
    }
}

impl<C: Classifier> EnumPattern<C> {
    pub fn compile(classifier: C, expression: &str) -> Result<Self, PatternCompilationError> {
        Self::compile_with_options(classifier, expression, PatternOptions::default())
    }

    pub fn compile_with_options(
        classifier: C,
        expression: &str,
        options: PatternOptions,
    ) -> Result<Self, PatternCompilationError> {
        let terms: Vec<LiteralTerm> = LITERAL_TERM
            .captures_iter(expression)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(1)?;
                Some(LiteralTerm {
                    span: whole.range(),
                    body: body.as_str(),
                })
            })
            .collect();

        let mut content_matched = HashSet::new();
        for term in &terms {
            if let (name, Some(_)) = term.split() {
                content_matched.insert(resolve_literal(&classifier, name)?);
            }
        }

        let mut alphabet = Alphabet::new();
        let mut synthetic = String::with_capacity(expression.len());
        let mut last = 0;
        for term in &terms {
            synthetic.push_str(&expression[last..term.span.start]);

            let (name, content_pattern) = term.split();
            let literal = resolve_literal(&classifier, name)?;
            let symbol = alphabet.claim(literal).ok_or_else(|| {
                PatternCompilationError::AlphabetExhausted {
                    expression: expression.to_string(),
                }
            })?;

            if content_matched.contains(&literal) {
                append_content_group(&mut synthetic, name, symbol, content_pattern, options)?;
            } else {
                synthetic.push(symbol);
            }
            last = term.span.end;
        }
        synthetic.push_str(&expression[last..]);

        let regex = build_regex(&synthetic, expression, options)?;
        let full_regex = build_regex(&format!(r"\A(?:{})\z", synthetic), expression, options)?;

        debug!(
            "compiled pattern {:?}: {} literal(s), {} content-matched",
            expression,
            alphabet.len(),
            content_matched.len()
        );

        Ok(Self {
            classifier,
            expression: expression.to_string(),
            synthetic_expression: synthetic,
            alphabet,
            content_matched,
            regex,
            full_regex,
        })
    }

    /// The expression this pattern was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The regex actually handed to the engine, over the synthetic alphabet.
    pub fn synthetic_expression(&self) -> &str {
        &self.synthetic_expression
    }

    pub fn literal_count(&self) -> usize {
        self.alphabet.len()
    }

    pub fn is_content_matched(&self, literal: &C::Literal) -> bool {
        self.content_matched.contains(literal)
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Bind this pattern to one input sequence.
    pub fn matcher(&self, sequence: &[C::Element]) -> EnumPatternMatcher<'_> {
        let (encoded, boundaries) = self.encode(sequence);
        EnumPatternMatcher::new(&self.regex, &self.full_regex, encoded, boundaries)
    }

    /// Encode a sequence over the synthetic alphabet.
    ///
    /// Boundaries are only recorded when content text is interleaved; they hold the encoded
    /// position in front of every element followed by the total length.
    fn encode(&self, sequence: &[C::Element]) -> (String, Option<Vec<usize>>) {
        let mut encoded = String::with_capacity(sequence.len() * SYMBOL_WIDTH);
        let mut boundaries = if self.content_matched.is_empty() {
            None
        } else {
            Some(Vec::with_capacity(sequence.len() + 1))
        };

        for element in sequence {
            let literal = self.classifier.classify(element);
            if let Some(boundaries) = boundaries.as_mut() {
                boundaries.push(encoded.len());
            }
            encoded.push(self.alphabet.symbol(&literal));
            if self.content_matched.contains(&literal) {
                encoded.push(CONTENT_START);
                push_content(&mut encoded, self.classifier.content(element));
                encoded.push(CONTENT_END);
            }
        }
        if let Some(boundaries) = boundaries.as_mut() {
            boundaries.push(encoded.len());
        }

        (encoded, boundaries)
    }
}

fn push_content(encoded: &mut String, content: &str) {
    if content.contains(CONTENT_END) {
        encoded.extend(content.chars().map(|c| {
            if c == CONTENT_END {
                CONTENT_END_STANDIN
            } else {
                c
            }
        }));
    } else {
        encoded.push_str(content);
    }
}

fn resolve_literal<C: Classifier>(
    classifier: &C,
    name: &str,
) -> Result<C::Literal, PatternCompilationError> {
    classifier
        .resolve(name)
        .ok_or_else(|| PatternCompilationError::UnknownLiteral {
            name: name.to_string(),
        })
}

fn append_content_group(
    synthetic: &mut String,
    literal_name: &str,
    symbol: char,
    content_pattern: Option<&str>,
    options: PatternOptions,
) -> Result<(), PatternCompilationError> {
    let content = match content_pattern {
        Some(pattern) => {
            let restricted = restrict_wildcards(pattern);
            options.builder(&restricted).build().map_err(|source| {
                PatternCompilationError::InvalidContentPattern {
                    literal: literal_name.to_string(),
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            restricted
        }
        None => DEFAULT_CONTENT_PATTERN.to_string(),
    };

    synthetic.push('(');
    synthetic.push(symbol);
    synthetic.push(CONTENT_START);
    // Keep alternations inside the sub-pattern from spilling over the delimiters.
    synthetic.push_str("(?:");
    synthetic.push_str(&content);
    synthetic.push(')');
    synthetic.push(CONTENT_END);
    synthetic.push(')');
    Ok(())
}

fn build_regex(
    synthetic: &str,
    expression: &str,
    options: PatternOptions,
) -> Result<Regex, PatternCompilationError> {
    options
        .builder(synthetic)
        .build()
        .map_err(|source| PatternCompilationError::InvalidExpression {
            expression: expression.to_string(),
            source,
        })
}
