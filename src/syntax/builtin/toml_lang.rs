//! TOML rule set

use crate::error::Result;
use crate::syntax::ruleset::SyntaxRuleSet;

/// Create the TOML rule set
pub fn toml_rules() -> Result<SyntaxRuleSet> {
    let mut rules = SyntaxRuleSet::new();

    // Keys (before = sign)
    rules.add_pattern("argument", r"(?m)^[ \t]*[\w\-.]+[ \t]*=")?;
    rules.add_keywords("keyword", ["true", "false", "inf", "nan"])?;
    rules.add_pattern(
        "number",
        r"\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?)?|\b0x[0-9a-fA-F_]+\b|\b0o[0-7_]+\b|\b0b[01_]+\b|[+-]?\b\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?\b",
    )?;
    rules.add_pattern("operator", "=")?;
    // Table headers
    rules.add_pattern("tag", r"(?m)^[ \t]*\[\[?[^\]\n]+\]\]?")?;
    rules.add_pattern(
        "string",
        r#"(?s)"""(?:.*?)"""|'''(?:.*?)'''|"(?:[^"\\\n]|\\.)*"|'[^'\n]*'"#,
    )?;
    rules.disable("variable");
    rules.disable("function");
    rules.add_pattern("comment", r"(?m)#.*$")?;

    Ok(rules)
}
