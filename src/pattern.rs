//! Sequence patterns over classified elements
//!
//!     A pattern is a regular expression whose atoms are classification names written
//!     `<NAME>`, optionally with a sub-pattern over the element's text: `<NAME=regex>`.
//!     Matching reuses the `regex` engine by encoding each element as one private-use
//!     character (see [`alphabet`]) and mapping match offsets back to element indices.
//!
//!     The engine is generic over a [`Classifier`]; [`token`] provides the two classifiers
//!     used on token lists.
//!
//!     let pattern = TokenTypePattern::new("<STATIC><INLINE>")?;
//!     for tokens in pattern.match_all(&tokens) { ... }

pub mod alphabet;
pub mod compiler;
pub mod error;
pub mod matcher;
pub mod token;

pub use compiler::{Classifier, EnumPattern, PatternOptions};
pub use error::PatternCompilationError;
pub use matcher::EnumPatternMatcher;
pub use token::{ByTokenClass, ByTokenType, TokenClassPattern, TokenTypePattern};
