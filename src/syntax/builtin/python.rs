//! Python rule set

use crate::error::Result;
use crate::syntax::ruleset::SyntaxRuleSet;

const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Create the Python rule set
pub fn python_rules() -> Result<SyntaxRuleSet> {
    let mut rules = SyntaxRuleSet::new();

    rules.add_keywords("argument", ["self", "cls"])?;
    rules.add_keywords("keyword", KEYWORDS)?;
    rules.add_pattern(
        "number",
        r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?j?)\b",
    )?;
    rules.add_pattern("operator", r"[+\-*/%&|^!<>=~]+")?;
    // Decorators
    rules.add_pattern("tag", r"@[\w.]+")?;
    rules.add_pattern(
        "string",
        r#"(?s)[fFrRbBuU]*(?:"""(?:.*?)"""|'''(?:.*?)''')|[fFrRbBuU]*(?:"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*')"#,
    )?;
    rules.disable("variable");
    rules.add_pattern("function", r"\b[a-zA-Z_]\w*(?:\s*\()")?;
    rules.add_pattern("comment", r"(?m)#.*$")?;

    Ok(rules)
}
