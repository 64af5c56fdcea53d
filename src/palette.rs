//! Category colors
//!
//! Every highlighter carries its own palette. A caller override replaces
//! the built-in colors wholesale; clearing it brings the defaults back.
//! The palette renders to a stylesheet fragment with one rule per
//! category, scoped to the owning instance's registry keys.

use std::collections::{BTreeMap, HashMap};

use crate::error::{HighlightError, Result};
use crate::registry::InstanceSuffix;
use crate::syntax::category::{default_color, DEFAULT_CATEGORIES};

/// The forms a palette override can arrive in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSource {
    /// Ordered `[category, color]` pairs
    Pairs(Vec<(String, String)>),
    /// A JSON-encoded list of `[category, color]` pairs
    Json(String),
}

impl From<Vec<(String, String)>> for PaletteSource {
    fn from(pairs: Vec<(String, String)>) -> Self {
        PaletteSource::Pairs(pairs)
    }
}

impl From<&[(&str, &str)]> for PaletteSource {
    fn from(pairs: &[(&str, &str)]) -> Self {
        PaletteSource::Pairs(
            pairs
                .iter()
                .map(|(category, color)| (category.to_string(), color.to_string()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for PaletteSource {
    fn from(pairs: [(&str, &str); N]) -> Self {
        PaletteSource::from(&pairs[..])
    }
}

impl From<HashMap<String, String>> for PaletteSource {
    fn from(map: HashMap<String, String>) -> Self {
        // Sorted so the generated stylesheet is stable
        PaletteSource::Pairs(map.into_iter().collect::<BTreeMap<_, _>>().into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for PaletteSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        PaletteSource::Pairs(map.into_iter().collect())
    }
}

impl From<&str> for PaletteSource {
    fn from(json: &str) -> Self {
        PaletteSource::Json(json.to_string())
    }
}

impl From<String> for PaletteSource {
    fn from(json: String) -> Self {
        PaletteSource::Json(json)
    }
}

/// Category to color mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    /// `None` means the built-in colors apply
    overrides: Option<Vec<(String, String)>>,
}

impl Palette {
    /// A palette using the built-in colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the override, or clear it with `None` or an empty source.
    ///
    /// Malformed JSON leaves the palette untouched.
    pub fn set(&mut self, source: Option<PaletteSource>) -> Result<()> {
        let pairs = match source {
            None => Vec::new(),
            Some(PaletteSource::Pairs(pairs)) => pairs,
            Some(PaletteSource::Json(json)) => parse_json(&json)?,
        };
        self.overrides = (!pairs.is_empty()).then(|| dedup_last_wins(pairs));
        Ok(())
    }

    pub fn is_default(&self) -> bool {
        self.overrides.is_none()
    }

    /// Color for a category
    pub fn color(&self, category: &str) -> Option<&str> {
        match &self.overrides {
            Some(pairs) => pairs
                .iter()
                .find(|(name, _)| name == category)
                .map(|(_, color)| color.as_str()),
            None => default_color(category),
        }
    }

    /// The effective mapping, in order
    pub fn entries(&self) -> Vec<(String, String)> {
        match &self.overrides {
            Some(pairs) => pairs.clone(),
            None => DEFAULT_CATEGORIES
                .iter()
                .filter_map(|category| {
                    default_color(category).map(|color| (category.to_string(), color.to_string()))
                })
                .collect(),
        }
    }

    /// Render one `::highlight()` rule per category for an instance
    pub fn stylesheet(&self, suffix: &InstanceSuffix) -> String {
        self.entries()
            .iter()
            .map(|(category, color)| {
                format!("::highlight({}) {{ color: {color}; }}\n", suffix.key(category))
            })
            .collect()
    }
}

/// Id of the stylesheet fragment an instance owns
pub fn stylesheet_id(suffix: &InstanceSuffix) -> String {
    format!("rangelight-palette-{suffix}")
}

fn parse_json(json: &str) -> Result<Vec<(String, String)>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let pairs: Option<Vec<(String, String)>> =
        serde_json::from_str(json).map_err(|e| HighlightError::Parse(e.to_string()))?;
    Ok(pairs.unwrap_or_default())
}

fn dedup_last_wins(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (category, color) in pairs {
        match result.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = color,
            None => result.push((category, color)),
        }
    }
    result
}
