//! Syntax rules and range matching
//!
//! This module provides everything between a syntax name and the ranges
//! it tags:
//! - Rule sets and their three rule shapes
//! - Resolution of syntax names to rule sets
//! - The built-in rule sets
//! - Offset bookkeeping between bytes and UTF-16 code units

pub mod category;
mod range;
mod rules;
mod ruleset;
mod loader;
mod builtin;

pub use builtin::{builtin_rules, BUILTIN_SYNTAXES};
pub use loader::{
    expand_identifier, is_location, resolve, short_name, BuiltinLoader, CachedLoader, ChainLoader,
    FileLoader, RuleSetLoader, SyntaxSource, RULE_SET_EXTENSION,
};
pub use range::{MatchRange, RangeSet, TextBuffer};
pub use rules::{CustomMatcher, KeywordRule, Rule};
pub use ruleset::{CategoryRanges, SyntaxRuleSet};
