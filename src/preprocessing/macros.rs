//! Macro-aware preprocessing
//!
//!     `MacroPreprocessor` runs two passes over a token list:
//!
//!         1. conditional resolution, only when any condition is configured
//!         2. the rewrite loop, driven by a fresh `MacroScan`
//!
//!     `MacroScan` recognizes invocations of configured macros and tracks parenthesis nesting
//!     until the invocation closes. A collapse macro becomes one token holding the whole
//!     invocation text; a discard macro disappears with its argument list. All scan state
//!     lives in the `MacroScan` of a single call, so one preprocessor can serve concurrent
//!     callers.

use super::conditional::resolve_conditionals;
use super::diagnostics::{report, Diagnostic};
use super::rewrite::{rewrite_tokens, TokenAction, TokenProcessor};
use super::rules::RewriteRuleSet;
use super::{Preprocessed, Preprocessor};
use crate::token::{Token, TokenType};
use log::debug;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionKind {
    Collapse,
    Discard,
}

#[derive(Debug, Clone)]
struct OpenRegion {
    kind: RegionKind,
    opener: Token,
}

/// Scan state of one rewrite call.
pub struct MacroScan<'r> {
    rules: &'r RewriteRuleSet,
    nesting: i32,
    region: Option<OpenRegion>,
}

impl<'r> MacroScan<'r> {
    pub fn new(rules: &'r RewriteRuleSet) -> Self {
        Self {
            rules,
            nesting: 0,
            region: None,
        }
    }

    fn open(&mut self, kind: RegionKind, token: &Token) {
        self.nesting = 0;
        self.region = Some(OpenRegion {
            kind,
            opener: token.clone(),
        });
    }

    /// Report a macro invocation left open at end of input.
    pub fn finish(self, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(region) = self.region {
            let action = match region.kind {
                RegionKind::Collapse => "collapse",
                RegionKind::Discard => "discard",
            };
            report(
                diagnostics,
                Diagnostic::warning_at(
                    &region.opener,
                    format!(
                        "{} macro {} is not closed; its tokens were dropped",
                        action, region.opener.text
                    ),
                )
                .with_code("unterminated-macro"),
            );
        }
    }
}

impl TokenProcessor for MacroScan<'_> {
    fn process(&mut self, token: &Token) -> TokenAction {
        if let Some(region) = &self.region {
            match token.token_type {
                TokenType::Lparen => self.nesting += 1,
                TokenType::Rparen => {
                    self.nesting -= 1;
                    if self.nesting == 0 {
                        let kind = region.kind;
                        self.region = None;
                        return match kind {
                            RegionKind::Collapse => TokenAction::EndCollapse,
                            RegionKind::Discard => TokenAction::Discard,
                        };
                    }
                }
                _ => {}
            }
            return TokenAction::Discard;
        }

        if token.is_identifier() {
            if self.rules.is_discard_macro(&token.text) {
                self.open(RegionKind::Discard, token);
                return TokenAction::Discard;
            }
            if self.rules.is_collapse_macro(&token.text) {
                self.open(RegionKind::Collapse, token);
                return TokenAction::StartCollapse;
            }
        }

        TokenAction::Keep
    }
}

/// Preprocessor driven by a `RewriteRuleSet`.
#[derive(Debug, Clone, Default)]
pub struct MacroPreprocessor {
    rules: RewriteRuleSet,
}

impl MacroPreprocessor {
    pub fn new(rules: RewriteRuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RewriteRuleSet {
        &self.rules
    }
}

impl Preprocessor for MacroPreprocessor {
    fn preprocess_with_diagnostics(&self, tokens: &[Token]) -> Preprocessed {
        let mut diagnostics = Vec::new();

        let resolved: Cow<[Token]> = if self.rules.has_conditions() {
            Cow::Owned(resolve_conditionals(&self.rules, tokens, &mut diagnostics))
        } else {
            Cow::Borrowed(tokens)
        };

        let mut scan = MacroScan::new(&self.rules);
        let output = rewrite_tokens(&self.rules, &resolved, &mut scan);
        scan.finish(&mut diagnostics);

        debug!(
            "preprocessed {} -> {} tokens ({} diagnostics)",
            tokens.len(),
            output.len(),
            diagnostics.len()
        );

        Preprocessed {
            tokens: output,
            diagnostics,
        }
    }
}
