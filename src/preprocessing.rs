//! Preprocessing
//!
//!     Token-level rewriting applied before patterns run. A preprocessor takes a token list
//!     and returns a new one; the input is never modified. Preprocessing is tolerant: it
//!     cannot fail, and anything it had to guess about is returned as a `Diagnostic`.
//!
//!     File Layout
//!
//!         rules.rs                  RewriteRuleSet: filter, map, collapse, discard, conditions
//!         rewrite.rs                The rewrite loop and token collapsing
//!         conditional.rs            #if / #ifdef / #ifndef resolution
//!         macros.rs                 MacroPreprocessor and its per-call scan state
//!         compiler_abstraction.rs   Fixed rule set for AUTOSAR compiler abstraction macros
//!         configured.rs             Rule sets read from key/value properties
//!         diagnostics.rs            Located warnings
//!
//!     Every preprocessor here is immutable after construction and `Send + Sync`. Scan state
//!     is created per call.

pub mod compiler_abstraction;
pub mod conditional;
pub mod configured;
pub mod diagnostics;
pub mod macros;
pub mod rewrite;
pub mod rules;

pub use compiler_abstraction::CompilerAbstractionPreprocessor;
pub use configured::{ConfigurationError, ConfiguredPreprocessor};
pub use diagnostics::Diagnostic;
pub use macros::MacroPreprocessor;
pub use rewrite::{collapse_tokens, TokenAction, TokenProcessor};
pub use rules::{IdentifierMapping, RewriteRuleSet};

use crate::token::Token;

/// Output of one preprocessing call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preprocessed {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub trait Preprocessor: Send + Sync {
    fn preprocess_with_diagnostics(&self, tokens: &[Token]) -> Preprocessed;

    fn preprocess(&self, tokens: &[Token]) -> Vec<Token> {
        self.preprocess_with_diagnostics(tokens).tokens
    }
}

/// Passes tokens through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPreprocessor;

impl Preprocessor for IdentityPreprocessor {
    fn preprocess_with_diagnostics(&self, tokens: &[Token]) -> Preprocessed {
        Preprocessed {
            tokens: tokens.to_vec(),
            diagnostics: Vec::new(),
        }
    }
}
