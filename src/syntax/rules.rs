//! Matching rules for syntax highlighting
//!
//! Each category in a rule set is matched by exactly one rule: a regex
//! pattern, a whole-word keyword list, or a custom matcher for cases a
//! regex cannot express.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::range::{MatchRange, RangeSet, TextBuffer};
use crate::error::{HighlightError, Result};

/// Signature of a custom matcher
pub type CustomMatcher = dyn Fn(&TextBuffer) -> Vec<MatchRange> + Send + Sync;

/// A single matching strategy
#[derive(Clone)]
pub enum Rule {
    /// Every non-overlapping match of a regex
    Pattern(Regex),
    /// Whole-word occurrences of any listed keyword
    Keywords(KeywordRule),
    /// Ranges computed by caller-provided code
    Custom(Arc<CustomMatcher>),
}

impl Rule {
    /// Compile a pattern rule
    pub fn pattern(source: &str) -> std::result::Result<Self, regex::Error> {
        Regex::new(source).map(Rule::Pattern)
    }

    /// Build a keyword rule from a list of words
    pub fn keywords<I, S>(words: I) -> std::result::Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordRule::new(words).map(Rule::Keywords)
    }

    /// Wrap a custom matcher
    pub fn custom<F>(matcher: F) -> Self
    where
        F: Fn(&TextBuffer) -> Vec<MatchRange> + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(matcher))
    }

    /// Short name of the rule's shape
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Pattern(_) => "pattern",
            Rule::Keywords(_) => "keywords",
            Rule::Custom(_) => "custom",
        }
    }

    /// Find every range this rule tags in the buffer.
    ///
    /// Zero-width matches are dropped since they cover no text.
    pub fn find_all(&self, category: &str, buffer: &TextBuffer) -> Result<RangeSet> {
        match self {
            Rule::Pattern(regex) => Ok(find_regex(regex, buffer)),
            Rule::Keywords(keywords) => Ok(find_regex(&keywords.pattern, buffer)),
            Rule::Custom(matcher) => {
                let ranges = matcher(buffer);
                if let Some(bad) = ranges.iter().find(|r| !buffer.contains_range(**r)) {
                    return Err(HighlightError::invalid_rule(
                        category,
                        format!(
                            "custom matcher returned {}..{} outside a buffer of length {}",
                            bad.start,
                            bad.end,
                            buffer.len_utf16()
                        ),
                    ));
                }
                Ok(ranges.into_iter().filter(|r| !r.is_empty()).collect())
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Keywords(keywords) => f.debug_tuple("Keywords").field(&keywords.words).finish(),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn find_regex(regex: &Regex, buffer: &TextBuffer) -> RangeSet {
    regex
        .find_iter(buffer.as_str())
        .filter(|m| !m.is_empty())
        .map(|m| buffer.range_from_bytes(m.start(), m.end()))
        .collect()
}

/// A deduplicated keyword list compiled into one alternation
#[derive(Debug, Clone)]
pub struct KeywordRule {
    words: Vec<String>,
    pattern: Regex,
}

impl KeywordRule {
    /// Deduplicate the words (first occurrence wins) and compile
    /// `\b(w1|w2|...)\b`. Words are matched literally.
    pub fn new<I, S>(words: I) -> std::result::Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for word in words {
            let word = word.as_ref();
            if !word.is_empty() && !unique.iter().any(|w| w == word) {
                unique.push(word.to_string());
            }
        }
        let alternation = unique
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))?;
        Ok(Self {
            words: unique,
            pattern,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
