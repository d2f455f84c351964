//! # lexmatch
//!
//! Token-stream pattern matching and preprocessing for source-code analysis.
//!
//! File Layout
//!
//!     The crate sits between an external scanner (which produces typed tokens) and the
//!     consumers of those tokens (per-language parsers, finding generators). It never reads
//!     source text itself.
//!
//!     src/
//!       ├── token            Token, TokenType and TokenClass
//!       ├── pattern          Sequence patterns over classified elements
//!       ├── search           Running a set of token patterns over a token list
//!       ├── preprocessing    Identifier rewriting, macro collapsing, #if resolution
//!       ├── settings         Layered configuration
//!       └── testing          Fixture scanner and factories for tests
//!
//! Both compiled patterns and configured preprocessors are immutable once built. All
//! mutable state lives in the matcher or in the per-call scan context, so a single instance
//! can be shared across threads and files.

pub mod pattern;
pub mod preprocessing;
pub mod search;
pub mod settings;
pub mod testing;
pub mod token;

pub use pattern::{EnumPattern, EnumPatternMatcher, PatternCompilationError};
pub use preprocessing::Preprocessor;
pub use token::{Token, TokenClass, TokenType};
