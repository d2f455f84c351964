//! Property-configured preprocessing
//!
//!     Builds a `MacroPreprocessor` from flat key/value properties, the shape rule sets take
//!     in configuration files. Keys have the form `<prefix>.<kind>` or
//!     `<prefix>.<kind>.<discriminator>`; the discriminator only keeps keys unique. Keys not
//!     under the prefix are ignored.
//!
//!         discard-identifier    identifier text to remove
//!         discard-macro         macro name whose invocation is removed
//!         collapse-macro        macro name whose invocation is collapsed
//!         true-condition        preprocessor condition known to hold
//!         false-condition       preprocessor condition known not to hold
//!         mapped-identifier     old:new or old:new:TOKEN_TYPE
//!
//!     A preprocessor without any rule is inactive and returns its input unchanged.

use super::macros::MacroPreprocessor;
use super::rules::RewriteRuleSet;
use super::{Preprocessed, Preprocessor};
use crate::token::{Token, TokenType};
use log::debug;
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum RuleKind {
    DiscardIdentifier,
    DiscardMacro,
    CollapseMacro,
    TrueCondition,
    FalseCondition,
    MappedIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown rule kind \"{kind}\" in property {key}")]
    UnknownRuleKind { key: String, kind: String },
    #[error("malformed value \"{value}\" for property {key}: {reason}")]
    MalformedValue {
        key: String,
        value: String,
        reason: &'static str,
    },
    #[error("unknown token type \"{name}\" in property {key}")]
    UnknownTokenType { key: String, name: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfiguredPreprocessor {
    inner: MacroPreprocessor,
}

impl ConfiguredPreprocessor {
    pub fn new(rules: RewriteRuleSet) -> Self {
        Self {
            inner: MacroPreprocessor::new(rules),
        }
    }

    /// Build from `(key, value)` properties under `prefix`.
    pub fn from_properties<I, K, V>(prefix: &str, properties: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scope = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}.", prefix)
        };

        let mut rules = RewriteRuleSet::new();
        for (key, value) in properties {
            let key = key.as_ref();
            let Some(rest) = key.strip_prefix(scope.as_str()) else {
                continue;
            };
            let kind_name = rest.split('.').next().unwrap_or(rest);
            let kind =
                RuleKind::from_str(kind_name).map_err(|_| ConfigurationError::UnknownRuleKind {
                    key: key.to_string(),
                    kind: kind_name.to_string(),
                })?;
            apply_rule(&mut rules, kind, key, value.as_ref().trim())?;
        }

        debug!(
            "configured preprocessor under {:?}: {} rule(s)",
            prefix,
            rules.rule_count()
        );
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &RewriteRuleSet {
        self.inner.rules()
    }

    pub fn rule_count(&self) -> usize {
        self.rules().rule_count()
    }

    pub fn is_active(&self) -> bool {
        self.rule_count() > 0
    }
}

fn apply_rule(
    rules: &mut RewriteRuleSet,
    kind: RuleKind,
    key: &str,
    value: &str,
) -> Result<(), ConfigurationError> {
    if value.is_empty() {
        return Err(malformed(key, value, "value is empty"));
    }

    match kind {
        RuleKind::DiscardIdentifier => rules.add_filtered_identifier(value),
        RuleKind::DiscardMacro => rules.add_discard_macro(value),
        RuleKind::CollapseMacro => rules.add_collapse_macro(value),
        RuleKind::TrueCondition => rules.add_true_condition(value),
        RuleKind::FalseCondition => rules.add_false_condition(value),
        RuleKind::MappedIdentifier => {
            let mut parts = value.splitn(3, ':').map(str::trim);
            let from = parts.next().unwrap_or_default();
            let to = parts.next().unwrap_or_default();
            if from.is_empty() || to.is_empty() {
                return Err(malformed(key, value, "expected old:new[:TOKEN_TYPE]"));
            }
            let token_type = parts
                .next()
                .map(|name| {
                    TokenType::from_str(name).map_err(|_| ConfigurationError::UnknownTokenType {
                        key: key.to_string(),
                        name: name.to_string(),
                    })
                })
                .transpose()?;
            rules.add_mapped_identifier(from, to, token_type)
        }
    };

    Ok(())
}

fn malformed(key: &str, value: &str, reason: &'static str) -> ConfigurationError {
    ConfigurationError::MalformedValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

impl Preprocessor for ConfiguredPreprocessor {
    fn preprocess_with_diagnostics(&self, tokens: &[Token]) -> Preprocessed {
        if !self.is_active() {
            return Preprocessed {
                tokens: tokens.to_vec(),
                diagnostics: Vec::new(),
            };
        }
        self.inner.preprocess_with_diagnostics(tokens)
    }
}
