//! AUTOSAR compiler abstraction
//!
//!     Embedded C written against the AUTOSAR compiler abstraction hides storage classes and
//!     pointer qualifiers behind macros such as `FUNC(void, CODE) f(...)` or
//!     `P2VAR(uint8, AUTOMATIC, APPL_DATA) p`. This preprocessor turns those declarations
//!     back into something a C-shaped pattern can match:
//!
//!         AUTOMATIC, TYPEDEF               removed
//!         STATIC                           static (STATIC)
//!         INLINE, LOCAL_INLINE             inline (INLINE)
//!         NULL_PTR                         NULL
//!         FUNC, VAR, P2VAR, P2CONST, ...   collapsed into one token per invocation

use super::macros::MacroPreprocessor;
use super::rules::RewriteRuleSet;
use super::{Preprocessed, Preprocessor};
use crate::token::{Token, TokenType};

const FILTERED: &[&str] = &["AUTOMATIC", "TYPEDEF"];

const MAPPED: &[(&str, &str, Option<TokenType>)] = &[
    ("STATIC", "static", Some(TokenType::Static)),
    ("INLINE", "inline", Some(TokenType::Inline)),
    ("LOCAL_INLINE", "inline", Some(TokenType::Inline)),
    ("NULL_PTR", "NULL", None),
];

const COLLAPSED: &[&str] = &[
    "FUNC",
    "FUNC_P2CONST",
    "FUNC_P2VAR",
    "VAR",
    "CONST",
    "P2VAR",
    "P2CONST",
    "CONSTP2VAR",
    "CONSTP2CONST",
    "P2FUNC",
    "CONSTP2FUNC",
];

#[derive(Debug, Clone)]
pub struct CompilerAbstractionPreprocessor {
    inner: MacroPreprocessor,
}

impl CompilerAbstractionPreprocessor {
    pub fn new() -> Self {
        let mut rules = RewriteRuleSet::new();
        for name in FILTERED {
            rules.add_filtered_identifier(*name);
        }
        for (from, to, token_type) in MAPPED {
            rules.add_mapped_identifier(*from, *to, *token_type);
        }
        for name in COLLAPSED {
            rules.add_collapse_macro(*name);
        }
        Self {
            inner: MacroPreprocessor::new(rules),
        }
    }

    pub fn rules(&self) -> &RewriteRuleSet {
        self.inner.rules()
    }
}

impl Default for CompilerAbstractionPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for CompilerAbstractionPreprocessor {
    fn preprocess_with_diagnostics(&self, tokens: &[Token]) -> Preprocessed {
        self.inner.preprocess_with_diagnostics(tokens)
    }
}
