//! Conditional compilation
//!
//!     Resolves `#if`/`#ifdef`/`#ifndef` blocks whose condition is configured as true or
//!     false, and keeps every other block (directives included) untouched. Conditions are
//!     compared after removing all whitespace, so `#if defined( A )` matches a configured
//!     `defined(A)`.
//!
//!     Each open block has a state:
//!
//!         True         the taken branch; tokens are kept until the next #elif/#else
//!         WaitForTrue  no branch taken yet; tokens are dropped
//!         Discard      a branch was taken already, or the block is nested in dropped code
//!         Preserve     the condition is unknown; the whole block is kept verbatim
//!
//!     Only `True` and `Preserve` keep tokens. Directives of resolved blocks are dropped;
//!     directives of preserved blocks are kept.

use super::diagnostics::{report, Diagnostic};
use super::rules::{normalize_condition, RewriteRuleSet};
use crate::token::{Token, TokenType};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

static IF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^#\s*if(?:def)?((?:\s|[(])+.*)$").unwrap());
static IF_NOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^#\s*ifndef((?:\s|[(])+.*)$").unwrap());
static ELIF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^#\s*elif((?:\s|[(])+.*)$").unwrap());
static ELSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^#\s*else.*").unwrap());
static ENDIF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^#\s*endif.*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    True,
    WaitForTrue,
    Discard,
    Preserve,
}

impl BranchState {
    pub fn keep_tokens(self) -> bool {
        matches!(self, BranchState::True | BranchState::Preserve)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Directive {
    If { condition: String, inverted: bool },
    Elif(String),
    Else,
    Endif,
    Other,
}

fn classify(text: &str) -> Directive {
    let condition = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| normalize_condition(m.as_str()))
    };

    if let Some(condition) = condition(&IF) {
        Directive::If {
            condition,
            inverted: false,
        }
    } else if let Some(condition) = condition(&IF_NOT) {
        Directive::If {
            condition,
            inverted: true,
        }
    } else if let Some(condition) = condition(&ELIF) {
        Directive::Elif(condition)
    } else if ELSE.is_match(text) {
        Directive::Else
    } else if ENDIF.is_match(text) {
        Directive::Endif
    } else {
        Directive::Other
    }
}

struct ConditionalScan<'r> {
    rules: &'r RewriteRuleSet,
    states: Vec<BranchState>,
    kept: Vec<Token>,
    diagnostics: &'r mut Vec<Diagnostic>,
}

impl<'r> ConditionalScan<'r> {
    /// `Some(true)` if the branch is taken, `Some(false)` if it is skipped, `None` if unknown.
    ///
    /// For `#ifndef` both lookups are inverted, so an unlisted guard is taken and only a
    /// condition listed both true and false stays unknown.
    fn evaluate(&self, condition: &str, inverted: bool) -> Option<bool> {
        if inverted ^ self.rules.is_true_condition(condition) {
            Some(true)
        } else if inverted ^ self.rules.is_false_condition(condition) {
            Some(false)
        } else {
            None
        }
    }

    fn token(&mut self, token: &Token) {
        if token.token_type == TokenType::PreprocessorDirective {
            self.directive(token);
        } else if self.states.last().map_or(true, |state| state.keep_tokens()) {
            self.kept.push(token.clone());
        }
    }

    fn directive(&mut self, token: &Token) {
        let directive = classify(&token.text);

        if let Directive::If {
            condition,
            inverted,
        } = &directive
        {
            self.open(token, condition, *inverted);
            return;
        }

        let Some(top) = self.states.last().copied() else {
            if directive != Directive::Other {
                report(
                    self.diagnostics,
                    Diagnostic::warning_at(token, format!("{} without #if", token.text.trim()))
                        .with_code("unmatched-directive"),
                );
            }
            self.kept.push(token.clone());
            return;
        };

        match directive {
            Directive::Elif(condition) if top == BranchState::WaitForTrue => {
                if self.rules.is_true_condition(&condition) {
                    self.replace_top(BranchState::True, token);
                }
            }
            Directive::Else if top == BranchState::WaitForTrue => {
                self.replace_top(BranchState::True, token);
            }
            Directive::Elif(_) | Directive::Else => match top {
                BranchState::Preserve => self.kept.push(token.clone()),
                BranchState::True => self.replace_top(BranchState::Discard, token),
                BranchState::Discard | BranchState::WaitForTrue => {}
            },
            Directive::Endif => {
                let popped = self.states.pop();
                trace!("line {}: close block {:?}", token.line, popped);
                if popped == Some(BranchState::Preserve) {
                    self.kept.push(token.clone());
                }
            }
            Directive::Other | Directive::If { .. } => {
                if top.keep_tokens() {
                    self.kept.push(token.clone());
                }
            }
        }
    }

    fn open(&mut self, token: &Token, condition: &str, inverted: bool) {
        let enclosing_drops = self
            .states
            .last()
            .map_or(false, |state| !state.keep_tokens());

        let state = if enclosing_drops {
            BranchState::Discard
        } else {
            match self.evaluate(condition, inverted) {
                Some(true) => BranchState::True,
                Some(false) => BranchState::WaitForTrue,
                None => {
                    self.kept.push(token.clone());
                    BranchState::Preserve
                }
            }
        };

        trace!("line {}: open block {:?} on {:?}", token.line, state, condition);
        self.states.push(state);
    }

    fn replace_top(&mut self, state: BranchState, token: &Token) {
        if let Some(top) = self.states.last_mut() {
            trace!("line {}: {:?} -> {:?}", token.line, top, state);
            *top = state;
        }
    }
}

/// Resolve known conditional blocks in `tokens`.
pub fn resolve_conditionals(
    rules: &RewriteRuleSet,
    tokens: &[Token],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Token> {
    let mut scan = ConditionalScan {
        rules,
        states: Vec::new(),
        kept: Vec::with_capacity(tokens.len()),
        diagnostics,
    };

    for token in tokens {
        scan.token(token);
    }

    if !scan.states.is_empty() {
        if let Some(last) = tokens.last() {
            let open = scan.states.len();
            report(
                scan.diagnostics,
                Diagnostic::warning_at(last, format!("{} conditional block(s) not closed", open))
                    .with_code("unterminated-conditional"),
            );
        }
    }

    scan.kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scan, texts};

    fn rules(true_conditions: &[&str], false_conditions: &[&str]) -> RewriteRuleSet {
        let mut rules = RewriteRuleSet::new();
        for condition in true_conditions {
            rules.add_true_condition(condition);
        }
        for condition in false_conditions {
            rules.add_false_condition(condition);
        }
        rules
    }

    fn resolve(rules: &RewriteRuleSet, source: &str) -> (Vec<String>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let kept = resolve_conditionals(rules, &scan(source), &mut diagnostics);
        let texts = texts(&kept).into_iter().map(String::from).collect();
        (texts, diagnostics)
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("#if defined( A )"),
            Directive::If {
                condition: "defined(A)".into(),
                inverted: false
            }
        );
        assert_eq!(
            classify("#ifdef A"),
            Directive::If {
                condition: "A".into(),
                inverted: false
            }
        );
        assert_eq!(
            classify("# ifndef A"),
            Directive::If {
                condition: "A".into(),
                inverted: true
            }
        );
        assert_eq!(classify("#elif(B)"), Directive::Elif("(B)".into()));
        assert_eq!(classify("#else"), Directive::Else);
        assert_eq!(classify("#endif /* A */"), Directive::Endif);
        assert_eq!(classify("#define A 1"), Directive::Other);
    }

    #[test]
    fn test_true_branch() {
        let (kept, diagnostics) = resolve(
            &rules(&["defined(A)"], &[]),
            "#if defined(A)\nint x;\n#else\nint y;\n#endif\n",
        );
        assert_eq!(kept, vec!["int", "x", ";"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_false_branch() {
        let (kept, _) = resolve(
            &rules(&[], &["defined(A)"]),
            "#if defined(A)\nint x;\n#else\nint y;\n#endif\n",
        );
        assert_eq!(kept, vec!["int", "y", ";"]);
    }

    #[test]
    fn test_elif_chain() {
        let source = "#if A\na;\n#elif B\nb;\n#elif C\nc;\n#else\nd;\n#endif\n";
        let (kept, _) = resolve(&rules(&["B", "C"], &["A"]), source);
        assert_eq!(kept, vec!["b", ";"]);
    }

    #[test]
    fn test_unknown_condition_is_preserved() {
        let source = "#if X\na;\n#else\nb;\n#endif\n";
        let (kept, _) = resolve(&rules(&["A"], &[]), source);
        assert_eq!(kept, vec!["#if X", "a", ";", "#else", "b", ";", "#endif"]);
    }

    #[test]
    fn test_ifndef() {
        let source = "#ifndef A\na;\n#else\nb;\n#endif\n";
        assert_eq!(resolve(&rules(&[], &["A"]), source).0, vec!["a", ";"]);
        assert_eq!(resolve(&rules(&["A"], &[]), source).0, vec!["b", ";"]);
        assert_eq!(resolve(&rules(&["B"], &[]), source).0, vec!["a", ";"]);
        assert_eq!(
            resolve(&rules(&["A"], &["A"]), source).0,
            vec!["#ifndef A", "a", ";", "#else", "b", ";", "#endif"]
        );
    }

    #[test]
    fn test_unlisted_header_guard_is_taken() {
        let source = "#ifndef GUARD_H\n#define GUARD_H\nint x;\n#endif\n";
        let (kept, diagnostics) = resolve(&rules(&["A"], &[]), source);
        assert_eq!(kept, vec!["#define GUARD_H", "int", "x", ";"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_in_dropped_branch() {
        let source = "#if A\n#if B\nx;\n#endif\ny;\n#endif\nz;\n";
        let (kept, _) = resolve(&rules(&["B"], &["A"]), source);
        assert_eq!(kept, vec!["z", ";"]);
    }

    #[test]
    fn test_other_directives_follow_block() {
        let source = "#define P 1\n#if A\n#define Q 2\n#endif\n#if B\n#define R 3\n#endif\n";
        let (kept, _) = resolve(&rules(&["A"], &["B"]), source);
        assert_eq!(kept, vec!["#define P 1", "#define Q 2"]);
    }

    #[test]
    fn test_stray_endif_is_kept_and_reported() {
        let (kept, diagnostics) = resolve(&rules(&["A"], &[]), "x;\n#endif\n");
        assert_eq!(kept, vec!["x", ";", "#endif"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].code.as_deref(), Some("unmatched-directive"));
    }

    #[test]
    fn test_unterminated_block_is_reported() {
        let (kept, diagnostics) = resolve(&rules(&["A"], &[]), "#if A\nx;\n");
        assert_eq!(kept, vec!["x", ";"]);
        assert_eq!(
            diagnostics[0].code.as_deref(),
            Some("unterminated-conditional")
        );
    }
}
