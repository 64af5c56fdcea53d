//! rangelight - rule-driven syntax highlighting
//!
//! Text is highlighted by tagging ranges with a category rather than by
//! parsing it. A rule set maps each category to a regex, a keyword list
//! or a custom matcher; the highlighter runs every rule over the text and
//! registers the resulting ranges in a shared registry, scoped to the
//! highlighter instance, for a painting layer to color using the palette.
//!
//! ```no_run
//! # async fn demo() -> rangelight::Result<()> {
//! use rangelight::{Highlighter, Node};
//!
//! let highlighter = Highlighter::builder().build()?;
//! highlighter.highlight("html", &Node::text("<p class=\"x\">hi</p>")).await?;
//! for entry in highlighter.ranges() {
//!     println!("{}: {:?}", entry.category, entry.ranges.to_vec());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod highlighter;
pub mod host;
pub mod palette;
pub mod registry;
pub mod syntax;

pub use config::HighlighterConfig;
pub use error::{HighlightError, Result};
pub use highlighter::{Highlighter, HighlighterBuilder};
pub use host::{MemoryStyleSink, Node, StyleSink};
pub use palette::{Palette, PaletteSource};
pub use registry::{InstanceSuffix, MemoryRegistry, RangeRegistry, RegistryScope};
pub use syntax::{
    CategoryRanges, MatchRange, RangeSet, Rule, RuleSetLoader, SyntaxRuleSet, SyntaxSource,
    TextBuffer,
};
