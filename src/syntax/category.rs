//! Built-in highlight categories
//!
//! Categories are plain strings chosen by whoever writes a rule set. The
//! ones listed here are the names the default palette knows how to color.

/// Default categories, in paint order (later entries paint over earlier ones)
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "argument", "keyword", "number", "operator", "tag", "string", "variable", "function", "comment",
];

/// Default color for a built-in category
pub fn default_color(category: &str) -> Option<&'static str> {
    let color = match category {
        "argument" => "hsl(32, 93%, 66%)",
        "keyword" => "hsl(286, 60%, 67%)",
        "number" => "hsl(29, 54%, 61%)",
        "operator" => "hsl(187, 47%, 55%)",
        "tag" => "hsl(355, 65%, 65%)",
        "string" => "hsl(114, 31%, 68%)",
        "variable" => "hsl(5, 48%, 51%)",
        "function" => "hsl(207, 82%, 66%)",
        "comment" => "hsl(220, 10%, 50%)",
        _ => return None,
    };
    Some(color)
}

/// Check whether a name is one of the built-in categories
pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&name)
}
