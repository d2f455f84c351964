//! Core token types shared by the pattern engine, the preprocessors and tooling.
//!
//!     Tokens come from an external scanner. This crate only ever reads them and builds new
//!     ones; offsets, line numbers and origin ids are carried over verbatim whenever a token
//!     is replaced or merged.

pub mod core;
pub mod types;

pub use core::Token;
pub use types::{TokenClass, TokenType};
