//! HTML rule set

use regex::Regex;

use crate::error::{HighlightError, Result};
use crate::syntax::range::{MatchRange, TextBuffer};
use crate::syntax::ruleset::SyntaxRuleSet;
use crate::syntax::rules::Rule;

/// Create the HTML rule set
pub fn html_rules() -> Result<SyntaxRuleSet> {
    let mut rules = SyntaxRuleSet::new();

    rules.disable("argument");
    rules.disable("keyword");
    rules.add_pattern("number", r"[+-]?\d+[.\w]*")?;
    rules.add_pattern("operator", "=")?;
    let opener = Regex::new(r"</?[\w-]+").map_err(|e| HighlightError::invalid_rule("tag", e))?;
    rules.insert("tag", Some(Rule::custom(move |buffer| tag_ranges(&opener, buffer))));
    rules.add_pattern("string", r#"["'`][^"'`]*["'`]"#)?;
    // Template placeholders: ${name}
    rules.add_pattern("variable", r"\$\s*\{[^}]+\}")?;
    rules.add_pattern("function", r"\w+\([^)]*\)")?;
    rules.add_pattern("comment", r"(?s)<!--.*?-->")?;

    Ok(rules)
}

/// Tag names, plus every `>` that directly follows a word character or `"`.
///
/// The bracket rule needs a look-behind, which `regex` lacks, so it is
/// checked by hand. `->` in text and the `/>` of a void tag stay unmatched.
fn tag_ranges(opener: &Regex, buffer: &TextBuffer) -> Vec<MatchRange> {
    let text = buffer.as_str();
    let names = opener
        .find_iter(text)
        .map(|m| buffer.range_from_bytes(m.start(), m.end()));
    let closers = text
        .match_indices('>')
        .filter(|(at, _)| {
            text[..*at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '"')
        })
        .map(|(at, _)| buffer.range_from_bytes(at, at + 1));
    names.chain(closers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::range::TextBuffer;

    fn matched(category: &str, text: &str) -> Vec<String> {
        let buffer = TextBuffer::new(text);
        html_rules()
            .unwrap()
            .match_all(&buffer)
            .unwrap()
            .into_iter()
            .find(|c| c.category == category)
            .map(|c| c.ranges.iter().filter_map(|r| buffer.slice(*r)).map(String::from).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_html_tags() {
        assert_eq!(matched("tag", r#"<div class="a">x</div>"#), vec!["<div", ">", "</div", ">"]);
    }

    #[test]
    fn test_html_tag_closer_needs_word_or_quote() {
        assert_eq!(
            matched("tag", "<p>a -> b</p> <br/>"),
            vec!["<p", ">", "</p", ">", "<br"]
        );
        assert_eq!(matched("tag", r#"<img src="x">"#), vec!["<img", ">"]);
        assert!(matched("tag", "x => y").is_empty());
    }

    #[test]
    fn test_html_strings_and_operators() {
        let text = r#"<a href="/x">"#;
        assert_eq!(matched("string", text), vec![r#""/x""#]);
        assert_eq!(matched("operator", text), vec!["="]);
    }

    #[test]
    fn test_html_multiline_comment() {
        assert_eq!(matched("comment", "<!-- a\nb -->ok"), vec!["<!-- a\nb -->"]);
    }

    #[test]
    fn test_html_placeholder() {
        assert_eq!(matched("variable", "<p>${ name }</p>"), vec!["${ name }"]);
    }

    #[test]
    fn test_html_disabled_categories() {
        let rules = html_rules().unwrap();
        assert!(rules.get("argument").is_none());
        assert!(rules.get("keyword").is_none());
        assert_eq!(rules.len(), 9);
    }
}
