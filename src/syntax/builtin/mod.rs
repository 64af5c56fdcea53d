//! Built-in rule sets
//!
//! These are served by short name without touching the filesystem.

mod html;
mod python;
mod rust;
mod toml_lang;

use super::ruleset::SyntaxRuleSet;
use crate::error::Result;

/// Names of all built-in rule sets
pub const BUILTIN_SYNTAXES: [&str; 4] = ["html", "python", "rust", "toml"];

/// Build a built-in rule set by short name
pub fn builtin_rules(name: &str) -> Option<Result<SyntaxRuleSet>> {
    let rules = match name {
        "html" | "htm" => html::html_rules(),
        "python" | "py" => python::python_rules(),
        "rust" | "rs" => rust::rust_rules(),
        "toml" => toml_lang::toml_rules(),
        _ => return None,
    };
    Some(rules)
}
