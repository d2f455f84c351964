//! Preprocessing diagnostics
//!
//!     Analyzed source is not guaranteed to be well formed, so preprocessing never fails. Where
//!     it has to guess (an `#endif` without `#if`, a macro whose parentheses never close) it
//!     keeps going and records a diagnostic instead. Every diagnostic is also logged at warn
//!     level.

use crate::token::Token;
use log::warn;
use std::fmt;

/// A located note about a token stream that was handled tolerantly. Always a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub origin_id: String,
    pub line: usize,
    pub offset: usize,
    pub message: String,
    pub code: Option<String>,
}

impl Diagnostic {
    /// A warning located at `token`.
    pub fn warning_at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            origin_id: token.origin_id.clone(),
            line: token.line,
            offset: token.offset,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warning: {} at {}:{}",
            self.message, self.origin_id, self.line
        )?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

/// Record a diagnostic and mirror it to the log.
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
