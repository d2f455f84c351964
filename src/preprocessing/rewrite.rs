//! Token rewriting loop
//!
//!     The loop shared by every macro-aware preprocessor. Each input token is first checked
//!     against the identifier filter and mapping tables, then handed to a `TokenProcessor`
//!     which decides what happens to it:
//!
//!         Keep           emit the (possibly mapped) token
//!         Discard        drop it
//!         StartCollapse  remember the current position; emit nothing yet
//!         EndCollapse    merge everything since the remembered position into one token
//!
//!     Collapsing works on the input tokens rather than on the mapped ones, so a collapsed
//!     macro invocation shows its source text verbatim. An `EndCollapse` without a preceding
//!     `StartCollapse` collapses just the current token.

use super::rules::RewriteRuleSet;
use crate::token::Token;
use std::borrow::Cow;

/// What to do with one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    Keep,
    Discard,
    StartCollapse,
    EndCollapse,
}

/// Per-call token decisions.
pub trait TokenProcessor {
    fn process(&mut self, token: &Token) -> TokenAction;
}

/// Run the rewrite loop over `tokens`.
pub fn rewrite_tokens<P: TokenProcessor>(
    rules: &RewriteRuleSet,
    tokens: &[Token],
    processor: &mut P,
) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut collapse_start: Option<usize> = None;

    for (index, token) in tokens.iter().enumerate() {
        if token.is_identifier() && rules.is_filtered(&token.text) {
            continue;
        }

        let current = map_identifier(rules, token);
        match processor.process(&current) {
            TokenAction::Keep => output.push(current.into_owned()),
            TokenAction::Discard => {}
            TokenAction::StartCollapse => collapse_start = Some(index),
            TokenAction::EndCollapse => {
                let start = collapse_start.take().unwrap_or(index);
                if let Some(collapsed) = collapse_tokens(&tokens[start..=index]) {
                    output.push(collapsed);
                }
            }
        }
    }

    output
}

fn map_identifier<'t>(rules: &RewriteRuleSet, token: &'t Token) -> Cow<'t, Token> {
    if !token.is_identifier() {
        return Cow::Borrowed(token);
    }
    match rules.mapping(&token.text) {
        Some(mapping) => Cow::Owned(token.with_text_and_type(
            mapping.text.clone(),
            mapping.token_type.unwrap_or(token.token_type),
        )),
        None => Cow::Borrowed(token),
    }
}

/// Merge a run of tokens into one.
///
/// The merged text keeps each token at its column relative to the first one, padding the
/// gaps with spaces. Type, offset, line and origin come from the first token and the end
/// offset from the last. Returns `None` for an empty run.
pub fn collapse_tokens(region: &[Token]) -> Option<Token> {
    let first = region.first()?;
    let last = region.last()?;

    let mut text = String::new();
    for token in region {
        let column = token.offset.saturating_sub(first.offset);
        while text.len() < column {
            text.push(' ');
        }
        text.push_str(&token.text);
    }

    Some(Token {
        token_type: first.token_type,
        text,
        offset: first.offset,
        end_offset: last.end_offset.max(first.end_offset),
        line: first.line,
        origin_id: first.origin_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mk_tokens, texts};
    use crate::token::TokenType;

    /// Decides by token text: `[` starts a collapse, `]` ends one, `-` discards.
    struct Brackets;

    impl TokenProcessor for Brackets {
        fn process(&mut self, token: &Token) -> TokenAction {
            match token.text.as_str() {
                "[" => TokenAction::StartCollapse,
                "]" => TokenAction::EndCollapse,
                "-" => TokenAction::Discard,
                _ => TokenAction::Keep,
            }
        }
    }

    #[test]
    fn test_collapse_pads_to_columns() {
        let tokens = mk_tokens(&[
            (TokenType::Identifier, "FUNC"),
            (TokenType::Lparen, "("),
            (TokenType::Int, "int"),
            (TokenType::Comma, ","),
            (TokenType::Void, "void"),
            (TokenType::Rparen, ")"),
        ]);

        let collapsed = collapse_tokens(&tokens).unwrap();

        assert_eq!(collapsed.text, "FUNC ( int , void )");
        assert_eq!(collapsed.token_type, TokenType::Identifier);
        assert_eq!(collapsed.span(), 0..19);
    }

    #[test]
    fn test_collapse_empty_region() {
        assert_eq!(collapse_tokens(&[]), None);
    }

    #[test]
    fn test_rewrite_actions() {
        let tokens = mk_tokens(&[
            (TokenType::Identifier, "a"),
            (TokenType::Lbrack, "["),
            (TokenType::Identifier, "b"),
            (TokenType::Rbrack, "]"),
            (TokenType::Minus, "-"),
            (TokenType::Identifier, "c"),
        ]);

        let output = rewrite_tokens(&RewriteRuleSet::new(), &tokens, &mut Brackets);

        assert_eq!(texts(&output), vec!["a", "[ b ]", "c"]);
    }

    #[test]
    fn test_end_without_start_collapses_current() {
        let tokens = mk_tokens(&[(TokenType::Identifier, "a"), (TokenType::Rbrack, "]")]);

        let output = rewrite_tokens(&RewriteRuleSet::new(), &tokens, &mut Brackets);

        assert_eq!(output[1], tokens[1]);
    }

    #[test]
    fn test_filter_and_map() {
        let mut rules = RewriteRuleSet::new();
        rules
            .add_filtered_identifier("AUTOMATIC")
            .add_mapped_identifier("STATIC", "static", Some(TokenType::Static))
            .add_mapped_identifier("NULL_PTR", "NULL", None);
        let tokens = mk_tokens(&[
            (TokenType::Identifier, "STATIC"),
            (TokenType::Identifier, "AUTOMATIC"),
            (TokenType::Identifier, "NULL_PTR"),
        ]);

        let output = rewrite_tokens(&rules, &tokens, &mut Brackets);

        assert_eq!(texts(&output), vec!["static", "NULL"]);
        assert_eq!(output[0].token_type, TokenType::Static);
        assert_eq!(output[0].span(), 0..6);
        assert_eq!(output[1].token_type, TokenType::Identifier);
        assert_eq!(output[1].span(), tokens[2].span());
    }

    #[test]
    fn test_only_identifiers_are_rewritten() {
        let mut rules = RewriteRuleSet::new();
        rules.add_filtered_identifier("x");
        let tokens = mk_tokens(&[(TokenType::StringLiteral, "x")]);

        let output = rewrite_tokens(&rules, &tokens, &mut Brackets);

        assert_eq!(output, tokens);
    }
}
