//! Text buffers and the ranges matched within them
//!
//! Ranges are half-open and measured in UTF-16 code units, which is how
//! the painting layer addresses text. The regex engine works in bytes, so
//! `TextBuffer` owns the conversion in both directions.

use std::collections::BTreeSet;

/// The text being highlighted, with an offset index for non-ASCII input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// UTF-16 offset for every byte position (len + 1 entries).
    /// Empty when the text is pure ASCII and offsets coincide.
    utf16_at_byte: Vec<usize>,
}

impl TextBuffer {
    /// Create a buffer over the given text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let utf16_at_byte = if text.is_ascii() {
            Vec::new()
        } else {
            let mut index = vec![0; text.len() + 1];
            let mut units = 0;
            for (byte, ch) in text.char_indices() {
                for slot in &mut index[byte..byte + ch.len_utf8()] {
                    *slot = units;
                }
                units += ch.len_utf16();
            }
            index[text.len()] = units;
            index
        };
        Self { text, utf16_at_byte }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in UTF-16 code units
    pub fn len_utf16(&self) -> usize {
        match self.utf16_at_byte.last() {
            Some(&units) => units,
            None => self.text.len(),
        }
    }

    /// Convert a byte offset (on a char boundary) to a UTF-16 offset
    pub fn utf16_offset(&self, byte: usize) -> usize {
        if self.utf16_at_byte.is_empty() {
            byte.min(self.text.len())
        } else {
            self.utf16_at_byte[byte.min(self.text.len())]
        }
    }

    /// Convert a UTF-16 offset back to a byte offset.
    ///
    /// Returns `None` when the offset is past the end or splits a
    /// surrogate pair.
    pub fn byte_offset(&self, utf16: usize) -> Option<usize> {
        if self.utf16_at_byte.is_empty() {
            return (utf16 <= self.text.len()).then_some(utf16);
        }
        let byte = self.utf16_at_byte.partition_point(|&units| units < utf16);
        (byte <= self.text.len()
            && self.text.is_char_boundary(byte)
            && self.utf16_at_byte[byte] == utf16)
            .then_some(byte)
    }

    /// Build a range from byte offsets reported by the regex engine
    pub fn range_from_bytes(&self, start: usize, end: usize) -> MatchRange {
        MatchRange::new(self.utf16_offset(start), self.utf16_offset(end))
    }

    /// The text covered by a range, if the range lies within this buffer
    pub fn slice(&self, range: MatchRange) -> Option<&str> {
        if range.is_inverted() {
            return None;
        }
        let start = self.byte_offset(range.start)?;
        let end = self.byte_offset(range.end)?;
        self.text.get(start..end)
    }

    /// Whether a range fits within this buffer
    pub fn contains_range(&self, range: MatchRange) -> bool {
        !range.is_inverted() && range.end <= self.len_utf16()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A half-open interval of UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchRange {
    /// Offset where this range starts (inclusive)
    pub start: usize,
    /// Offset where this range ends (exclusive)
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check if this range contains an offset
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// All ranges tagged with one category, ordered left to right
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: BTreeSet<MatchRange>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, range: MatchRange) -> bool {
        self.ranges.insert(range)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRange> {
        self.ranges.iter()
    }

    pub fn to_vec(&self) -> Vec<MatchRange> {
        self.ranges.iter().copied().collect()
    }
}

impl FromIterator<MatchRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = MatchRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a MatchRange;
    type IntoIter = std::collections::btree_set::Iter<'a, MatchRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
