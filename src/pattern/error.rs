//! Pattern compilation errors.
//!
//! All of these are raised while compiling; matching a compiled pattern cannot fail.

use super::alphabet::MAX_LITERALS;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternCompilationError {
    #[error("\"{name}\" is not a valid literal")]
    UnknownLiteral { name: String },

    #[error("the content pattern \"{pattern}\" of literal {literal} is syntactically incorrect: {source}")]
    InvalidContentPattern {
        literal: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("the pattern \"{expression}\" is syntactically incorrect: {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: regex::Error,
    },

    #[error("the pattern \"{expression}\" uses more than {MAX_LITERALS} distinct literals")]
    AlphabetExhausted { expression: String },
}
