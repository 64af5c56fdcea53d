//! Syntax rule sets
//!
//! A `SyntaxRuleSet` maps category names to rules, in insertion order.
//! Order only matters for painting: categories matched later paint over
//! earlier ones where their ranges overlap.

use regex::Regex;
use toml::Value;
use tracing::debug;

use super::range::{RangeSet, TextBuffer};
use super::rules::{KeywordRule, Rule};
use crate::error::{HighlightError, Result};

/// Ranges found for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRanges {
    pub category: String,
    pub ranges: RangeSet,
}

/// An ordered mapping from category to rule
#[derive(Debug, Clone, Default)]
pub struct SyntaxRuleSet {
    /// `None` marks a category that is present but disabled
    entries: Vec<(String, Option<Rule>)>,
}

impl SyntaxRuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule for a category, keeping its original position if it
    /// was already present
    pub fn insert(&mut self, category: &str, rule: Option<Rule>) {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((category.to_string(), rule)),
        }
    }

    /// Add a pattern rule. An empty pattern disables the category.
    pub fn add_pattern(&mut self, category: &str, pattern: &str) -> Result<()> {
        let rule = if pattern.is_empty() {
            None
        } else {
            let regex = Regex::new(pattern)
                .map_err(|e| HighlightError::invalid_rule(category, e))?;
            Some(Rule::Pattern(regex))
        };
        self.insert(category, rule);
        Ok(())
    }

    /// Add a keyword rule. An empty list disables the category.
    pub fn add_keywords<I, S>(&mut self, category: &str, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords =
            KeywordRule::new(words).map_err(|e| HighlightError::invalid_rule(category, e))?;
        let rule = (!keywords.is_empty()).then_some(Rule::Keywords(keywords));
        self.insert(category, rule);
        Ok(())
    }

    /// Mark a category as present but disabled
    pub fn disable(&mut self, category: &str) {
        self.insert(category, None);
    }

    /// Builder form of `insert`
    pub fn with(mut self, category: &str, rule: Rule) -> Self {
        self.insert(category, Some(rule));
        self
    }

    pub fn get(&self, category: &str) -> Option<&Rule> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .and_then(|(_, rule)| rule.as_ref())
    }

    /// Every category name, enabled or not, in order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every enabled rule against the buffer.
    ///
    /// Disabled categories produce no entry. The first failing rule aborts
    /// the whole call so callers never see a partial result.
    pub fn match_all(&self, buffer: &TextBuffer) -> Result<Vec<CategoryRanges>> {
        let mut results = Vec::with_capacity(self.entries.len());
        for (category, rule) in &self.entries {
            let Some(rule) = rule else {
                debug!(category = %category, "skipping disabled category");
                continue;
            };
            let ranges = rule.find_all(category, buffer)?;
            debug!(category = %category, kind = rule.kind(), count = ranges.len(), "matched");
            results.push(CategoryRanges {
                category: category.clone(),
                ranges,
            });
        }
        Ok(results)
    }

    /// Parse a rule set from a TOML document.
    ///
    /// Top-level keys are categories in document order. Values may be:
    /// `false`, `""` or `[]` (disabled); a string or `{ pattern = "..." }`;
    /// an array of strings or `{ keywords = [...] }`.
    /// `identifier` names the document in load errors.
    pub fn from_toml(identifier: &str, source: &str) -> Result<Self> {
        let table: toml::Table = source
            .parse()
            .map_err(|e: toml::de::Error| HighlightError::load(identifier, e))?;
        let mut rule_set = Self::new();
        for (category, value) in &table {
            rule_set.add_value(category, value)?;
        }
        Ok(rule_set)
    }

    fn add_value(&mut self, category: &str, value: &Value) -> Result<()> {
        match value {
            Value::Boolean(false) => {
                self.disable(category);
                Ok(())
            }
            Value::String(pattern) => self.add_pattern(category, pattern),
            Value::Array(items) => {
                let words = keyword_list(category, items)?;
                self.add_keywords(category, words)
            }
            Value::Table(table) if table.len() == 1 => match table.iter().next() {
                Some((key, Value::String(pattern))) if key == "pattern" => {
                    self.add_pattern(category, pattern)
                }
                Some((key, Value::Array(items))) if key == "keywords" => {
                    let words = keyword_list(category, items)?;
                    self.add_keywords(category, words)
                }
                _ => Err(unrecognized(category, value)),
            },
            _ => Err(unrecognized(category, value)),
        }
    }
}

fn keyword_list<'a>(category: &str, items: &'a [Value]) -> Result<Vec<&'a str>> {
    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| {
                HighlightError::invalid_rule(
                    category,
                    format!("keyword lists hold strings, found {}", item.type_str()),
                )
            })
        })
        .collect()
}

fn unrecognized(category: &str, value: &Value) -> HighlightError {
    HighlightError::invalid_rule(
        category,
        format!(
            "expected a pattern, a keyword list or false, found {}",
            value.type_str()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::range::MatchRange;

    fn html_like() -> SyntaxRuleSet {
        let mut rules = SyntaxRuleSet::new();
        rules.disable("argument");
        rules.add_pattern("number", r"[+-]?\d+[.\w]*").unwrap();
        rules.add_pattern("operator", "=").unwrap();
        rules
    }

    #[test]
    fn test_number_example() {
        let buffer = TextBuffer::new("a = 12 + -3.5");
        let results = html_like().match_all(&buffer).unwrap();
        let numbers = results.iter().find(|c| c.category == "number").unwrap();
        assert_eq!(
            numbers.ranges.to_vec(),
            vec![MatchRange::new(4, 6), MatchRange::new(9, 13)]
        );
        assert_eq!(buffer.slice(MatchRange::new(9, 13)), Some("-3.5"));
    }

    #[test]
    fn test_disabled_category_produces_nothing() {
        let results = html_like().match_all(&TextBuffer::new("a = 1")).unwrap();
        assert!(results.iter().all(|c| c.category != "argument"));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_buffer() {
        let results = html_like().match_all(&TextBuffer::new("")).unwrap();
        assert!(results.iter().all(|c| c.ranges.is_empty()));
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut rules = html_like();
        rules.add_keywords("argument", ["x"]).unwrap();
        let order: Vec<_> = rules.categories().collect();
        assert_eq!(order, ["argument", "number", "operator"]);
        assert!(rules.get("argument").is_some());
    }

    #[test]
    fn test_empty_values_disable() {
        let mut rules = SyntaxRuleSet::new();
        rules.add_pattern("a", "").unwrap();
        rules.add_keywords("b", Vec::<String>::new()).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.get("a").is_none());
        assert!(rules.match_all(&TextBuffer::new("text")).unwrap().is_empty());
    }

    #[test]
    fn test_bad_regex_names_category() {
        let err = SyntaxRuleSet::new().add_pattern("broken", "(").unwrap_err();
        assert!(matches!(err, HighlightError::InvalidRule { ref category, .. } if category == "broken"));
    }

    #[test]
    fn test_from_toml_shapes() {
        let rules = SyntaxRuleSet::from_toml(
            "inline",
            r#"
argument = false
keyword = ["if", "else"]
number = '\d+'
comment = { pattern = '(?s)/\*.*?\*/' }
function = { keywords = ["print"] }
string = ""
"#,
        )
        .unwrap();
        let order: Vec<_> = rules.categories().collect();
        assert_eq!(order, ["argument", "keyword", "number", "comment", "function", "string"]);
        assert_eq!(rules.get("keyword").map(Rule::kind), Some("keywords"));
        assert_eq!(rules.get("comment").map(Rule::kind), Some("pattern"));
        assert_eq!(rules.get("function").map(Rule::kind), Some("keywords"));
        assert!(rules.get("argument").is_none());
        assert!(rules.get("string").is_none());
    }

    #[test]
    fn test_from_toml_invalid_shape() {
        let err = SyntaxRuleSet::from_toml("inline", "number = '\\d+'\nweird = 42\n").unwrap_err();
        match err {
            HighlightError::InvalidRule { category, .. } => assert_eq!(category, "weird"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_toml_rejects_true_and_mixed_lists() {
        assert!(SyntaxRuleSet::from_toml("inline", "a = true").is_err());
        assert!(SyntaxRuleSet::from_toml("inline", "a = ['x', 1]").is_err());
        assert!(SyntaxRuleSet::from_toml("inline", "a = { regex = 'x' }").is_err());
    }

    #[test]
    fn test_from_toml_malformed() {
        let err = SyntaxRuleSet::from_toml("inline", "a = ").unwrap_err();
        assert!(matches!(err, HighlightError::Load { .. }));
    }
}
