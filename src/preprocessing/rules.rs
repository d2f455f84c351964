//! Rewrite rules
//!
//!     A `RewriteRuleSet` is the complete configuration of a macro-aware preprocessor. It is
//!     built once and owned by one preprocessor instance; nothing in it is shared between
//!     instances, including the identifier mapping table.

use crate::token::TokenType;
use std::collections::{HashMap, HashSet};

/// Replacement for a mapped identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMapping {
    pub text: String,
    /// New token type; `None` keeps the identifier's own type.
    pub token_type: Option<TokenType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteRuleSet {
    filtered_identifiers: HashSet<String>,
    mapped_identifiers: HashMap<String, IdentifierMapping>,
    collapse_macros: HashSet<String>,
    discard_macros: HashSet<String>,
    true_conditions: HashSet<String>,
    false_conditions: HashSet<String>,
}

/// Normalize a preprocessor condition by dropping all whitespace.
pub fn normalize_condition(condition: &str) -> String {
    condition.chars().filter(|c| !c.is_whitespace()).collect()
}

impl RewriteRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove identifiers with this exact text from the stream.
    pub fn add_filtered_identifier(&mut self, text: impl Into<String>) -> &mut Self {
        self.filtered_identifiers.insert(text.into());
        self
    }

    /// Replace identifiers with text `from` by `to`, optionally changing their type.
    pub fn add_mapped_identifier(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        token_type: Option<TokenType>,
    ) -> &mut Self {
        self.mapped_identifiers.insert(
            from.into(),
            IdentifierMapping {
                text: to.into(),
                token_type,
            },
        );
        self
    }

    /// Collapse `name ( ... )` into one token.
    pub fn add_collapse_macro(&mut self, name: impl Into<String>) -> &mut Self {
        self.collapse_macros.insert(name.into());
        self
    }

    /// Drop `name ( ... )` entirely.
    pub fn add_discard_macro(&mut self, name: impl Into<String>) -> &mut Self {
        self.discard_macros.insert(name.into());
        self
    }

    pub fn add_true_condition(&mut self, condition: &str) -> &mut Self {
        self.true_conditions.insert(normalize_condition(condition));
        self
    }

    pub fn add_false_condition(&mut self, condition: &str) -> &mut Self {
        self.false_conditions.insert(normalize_condition(condition));
        self
    }

    pub fn is_filtered(&self, text: &str) -> bool {
        self.filtered_identifiers.contains(text)
    }

    pub fn mapping(&self, text: &str) -> Option<&IdentifierMapping> {
        self.mapped_identifiers.get(text)
    }

    pub fn is_collapse_macro(&self, name: &str) -> bool {
        self.collapse_macros.contains(name)
    }

    pub fn is_discard_macro(&self, name: &str) -> bool {
        self.discard_macros.contains(name)
    }

    /// Whether a normalized condition is configured as true.
    pub fn is_true_condition(&self, normalized: &str) -> bool {
        self.true_conditions.contains(normalized)
    }

    /// Whether a normalized condition is configured as false.
    pub fn is_false_condition(&self, normalized: &str) -> bool {
        self.false_conditions.contains(normalized)
    }

    /// Conditional compilation is only resolved when at least one condition is known.
    pub fn has_conditions(&self) -> bool {
        !self.true_conditions.is_empty() || !self.false_conditions.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.filtered_identifiers.len()
            + self.mapped_identifiers.len()
            + self.collapse_macros.len()
            + self.discard_macros.len()
            + self.true_conditions.len()
            + self.false_conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }
}
