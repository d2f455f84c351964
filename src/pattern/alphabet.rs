//! Synthetic alphabet
//!
//!     Classified sequences are re-encoded as strings over Unicode private-use characters so
//!     the `regex` engine can match them. Every character in the private-use block has the
//!     same UTF-8 width, which keeps the element index computable from a byte offset when no
//!     content text is interleaved.
//!
//!     Layout of the block (U+E000..=U+F8FF):
//!         U+E000            sentinel for classifications the pattern never mentions
//!         U+E001..=U+F8FD   literal characters, handed out in order of first appearance
//!         U+F8FE / U+F8FF   start / end delimiter around content text
//!
//!     A U+F8FF inside content text is encoded as U+FFFD, so `<NAME=.*>` still matches it.

use std::collections::HashMap;
use std::hash::Hash;

/// Character for any classification that does not appear in the pattern.
pub const OTHER: char = '\u{E000}';

/// Opens the content text of a content-matched element.
pub const CONTENT_START: char = '\u{F8FE}';

/// Closes the content text of a content-matched element.
///
/// Content text never contains it: occurrences are encoded as [`CONTENT_END_STANDIN`].
pub const CONTENT_END: char = '\u{F8FF}';

/// Encoded in place of a [`CONTENT_END`] that occurs inside content text.
pub const CONTENT_END_STANDIN: char = '\u{FFFD}';

const FIRST_LITERAL: u32 = 0xE001;
const LAST_LITERAL: u32 = 0xF8FD;

/// Number of distinct literals a single pattern may mention.
pub const MAX_LITERALS: usize = (LAST_LITERAL - FIRST_LITERAL + 1) as usize;

/// UTF-8 width of every synthetic character.
pub const SYMBOL_WIDTH: usize = 3;

/// Regex fragment matching any character except the content end delimiter.
pub const RESTRICTED_WILDCARD: &str = r"[^\x{F8FF}]";

/// Content sub-pattern used for `<NAME=>`-less content matching.
pub const DEFAULT_CONTENT_PATTERN: &str = r"[^\x{F8FF}]*?";

/// Literal-to-character assignment for one compiled pattern.
///
/// Assignment is lazy and stable: the first `claim` of a literal takes the next unused
/// character, later claims return the same one.
#[derive(Debug, Clone)]
pub struct Alphabet<L> {
    symbols: HashMap<L, char>,
    next: u32,
}

impl<L: Copy + Eq + Hash> Alphabet<L> {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            next: FIRST_LITERAL,
        }
    }

    /// Character for `literal`, assigning a fresh one on first use.
    ///
    /// Returns `None` once the private-use budget is spent.
    pub fn claim(&mut self, literal: L) -> Option<char> {
        if let Some(&symbol) = self.symbols.get(&literal) {
            return Some(symbol);
        }
        if self.next > LAST_LITERAL {
            return None;
        }
        let symbol = char::from_u32(self.next)?;
        self.next += 1;
        self.symbols.insert(literal, symbol);
        Some(symbol)
    }

    /// Character used when encoding an element with this literal.
    pub fn symbol(&self, literal: &L) -> char {
        self.symbols.get(literal).copied().unwrap_or(OTHER)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<L: Copy + Eq + Hash> Default for Alphabet<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite every unescaped `.` outside a character class into [`RESTRICTED_WILDCARD`].
///
/// Content text sits between delimiters in the encoded string; a bare wildcard would run
/// across the end delimiter into the following elements.
pub fn restrict_wildcards(content_pattern: &str) -> String {
    let mut result = String::with_capacity(content_pattern.len());
    let mut escaped = false;
    let mut class_depth = 0usize;
    // A `]` right after `[` or `[^` is a literal member, not the end of the class.
    let mut class_start = false;
    let mut negatable = false;

    for c in content_pattern.chars() {
        if escaped {
            escaped = false;
            result.push(c);
            continue;
        }
        let at_class_start = std::mem::take(&mut class_start);
        let may_negate = std::mem::take(&mut negatable);
        match c {
            '\\' => {
                escaped = true;
                result.push(c);
            }
            '[' => {
                class_depth += 1;
                class_start = true;
                negatable = true;
                result.push(c);
            }
            '^' if may_negate => {
                class_start = true;
                result.push(c);
            }
            ']' if class_depth > 0 && !at_class_start => {
                class_depth -= 1;
                result.push(c);
            }
            '.' if class_depth == 0 => result.push_str(RESTRICTED_WILDCARD),
            _ => result.push(c),
        }
    }

    result
}
