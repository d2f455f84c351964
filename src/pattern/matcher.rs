//! Pattern Matcher
//!
//!     A matcher binds a compiled pattern to one encoded sequence. Searching is delegated to
//!     the regex engine unchanged; what this type adds is the way back from byte offsets in
//!     the encoded string to element indices.
//!
//!     Without content matching every element is exactly one synthetic character, so the
//!     element index is the byte offset divided by the symbol width. With content matching
//!     the encoder records a boundary in front of every element (plus the total length) and
//!     an offset maps to the index of the first boundary at or after it.
//!
//!     All state (encoded string, boundaries, search position, capture locations) belongs to
//!     the matcher, never to the compiled pattern.

use super::alphabet::SYMBOL_WIDTH;
use regex::{CaptureLocations, Regex};
use std::ops::Range;

/// Cursor over the matches of one pattern in one sequence.
#[derive(Debug)]
pub struct EnumPatternMatcher<'p> {
    regex: &'p Regex,
    full_regex: &'p Regex,
    encoded: String,
    boundaries: Option<Vec<usize>>,
    /// Where the next `find` starts; `None` once the sequence is exhausted.
    search_from: Option<usize>,
    current: Option<CaptureLocations>,
}

impl<'p> EnumPatternMatcher<'p> {
    pub(crate) fn new(
        regex: &'p Regex,
        full_regex: &'p Regex,
        encoded: String,
        boundaries: Option<Vec<usize>>,
    ) -> Self {
        Self {
            regex,
            full_regex,
            encoded,
            boundaries,
            search_from: Some(0),
            current: None,
        }
    }

    /// Search for the next match after the previous one.
    ///
    /// An empty match moves the search on by one character. Once this returns `false` it
    /// keeps returning `false` until [`reset`](Self::reset).
    pub fn find(&mut self) -> bool {
        let Some(start) = self.search_from else {
            self.current = None;
            return false;
        };

        let mut locations = self.regex.capture_locations();
        match self
            .regex
            .captures_read_at(&mut locations, &self.encoded, start)
        {
            Some(found) => {
                self.search_from = if found.end() > found.start() {
                    Some(found.end())
                } else {
                    self.step_over(found.end())
                };
                self.current = Some(locations);
                true
            }
            None => {
                self.search_from = None;
                self.current = None;
                false
            }
        }
    }

    /// Whether the whole sequence matches the pattern.
    ///
    /// On success the match becomes the current one for `start`/`end`/`group`.
    pub fn matches(&mut self) -> bool {
        let mut locations = self.full_regex.capture_locations();
        let found = self
            .full_regex
            .captures_read(&mut locations, &self.encoded)
            .is_some();
        self.current = found.then_some(locations);
        found
    }

    /// Forget the current match and restart searching from the first element.
    pub fn reset(&mut self) {
        self.search_from = Some(0);
        self.current = None;
    }

    /// Element index where the current match starts.
    pub fn start(&self) -> Option<usize> {
        self.start_of(0)
    }

    /// Element index one past the end of the current match.
    pub fn end(&self) -> Option<usize> {
        self.end_of(0)
    }

    /// Element range `[start, end)` of the current match.
    pub fn range(&self) -> Option<Range<usize>> {
        Some(self.start()?..self.end()?)
    }

    /// Element index where capture `group` starts, if it participated in the match.
    pub fn start_of(&self, group: usize) -> Option<usize> {
        let (start, _) = self.current.as_ref()?.get(group)?;
        self.to_index(start)
    }

    /// Element index one past the end of capture `group`.
    pub fn end_of(&self, group: usize) -> Option<usize> {
        let (_, end) = self.current.as_ref()?.get(group)?;
        self.to_index(end)
    }

    /// Raw encoded text of capture `group` (0 is the whole match).
    ///
    /// This is synthetic-alphabet text. To get at the original elements, slice the input
    /// sequence with [`start_of`](Self::start_of) and [`end_of`](Self::end_of).
    pub fn group(&self, group: usize) -> Option<&str> {
        let (start, end) = self.current.as_ref()?.get(group)?;
        self.encoded.get(start..end)
    }

    /// Number of capture groups in the pattern, not counting the whole match.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// The encoded form of the bound sequence.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    fn to_index(&self, offset: usize) -> Option<usize> {
        match &self.boundaries {
            None => {
                debug_assert_eq!(offset % SYMBOL_WIDTH, 0);
                Some(offset / SYMBOL_WIDTH)
            }
            Some(boundaries) => {
                let index = boundaries.partition_point(|&boundary| boundary < offset);
                (index < boundaries.len()).then_some(index)
            }
        }
    }

    fn step_over(&self, position: usize) -> Option<usize> {
        self.encoded[position..]
            .chars()
            .next()
            .map(|c| position + c.len_utf8())
    }
}
