//! Rust rule set

use crate::error::Result;
use crate::syntax::ruleset::SyntaxRuleSet;

const KEYWORDS: [&str; 38] = [
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

/// Create the Rust rule set
pub fn rust_rules() -> Result<SyntaxRuleSet> {
    let mut rules = SyntaxRuleSet::new();

    // Lifetimes and generic parameters
    rules.add_pattern("argument", r"'[a-zA-Z_]\w*\b")?;
    rules.add_keywords("keyword", KEYWORDS)?;
    rules.add_pattern(
        "number",
        r"\b(?:0x[0-9a-fA-F_]+|0b[01_]+|0o[0-7_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?(?:[ui](?:8|16|32|64|128|size)|f32|f64)?)\b",
    )?;
    rules.add_pattern("operator", r"[+\-*/%&|^!<>=]+")?;
    rules.add_pattern("tag", r"#!?\[[^\]]*\]")?;
    rules.add_pattern("string", r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)'"#)?;
    rules.add_pattern("variable", r"\$\w+")?;
    // Calls and macro invocations
    rules.add_pattern("function", r"\b[a-z_]\w*!?(?:\s*\()")?;
    rules.add_pattern("comment", r"(?m)//.*$|(?s)/\*.*?\*/")?;

    Ok(rules)
}
