//! The highlighter entry point
//!
//! A `Highlighter` ties one instance suffix to a rule set loader, a slice
//! of the shared range registry, a palette and the stylesheet fragment
//! generated from it. Each `highlight` call replaces everything the
//! previous call registered.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::HighlighterConfig;
use crate::error::{HighlightError, Result};
use crate::host::{MemoryStyleSink, Node, StyleSink};
use crate::palette::{stylesheet_id, Palette, PaletteSource};
use crate::registry::{InstanceSuffix, MemoryRegistry, RangeRegistry, RegistryScope};
use crate::syntax::{
    resolve, BuiltinLoader, CachedLoader, CategoryRanges, ChainLoader, FileLoader, RuleSetLoader,
    SyntaxSource, TextBuffer,
};

/// Highlights text by registering category ranges
pub struct Highlighter {
    suffix: InstanceSuffix,
    loader: Arc<dyn RuleSetLoader>,
    /// `None` when the host has no highlight registry
    registry: Option<RegistryScope>,
    styles: Arc<dyn StyleSink>,
    palette: Mutex<Palette>,
    /// Serializes highlight calls on this instance
    in_flight: tokio::sync::Mutex<()>,
}

impl Highlighter {
    pub fn builder() -> HighlighterBuilder {
        HighlighterBuilder::default()
    }

    /// A highlighter configured from the user's settings file
    pub fn from_config(config: &HighlighterConfig) -> Result<Self> {
        HighlighterBuilder::from_config(config).build()
    }

    pub fn suffix(&self) -> &InstanceSuffix {
        &self.suffix
    }

    /// Highlight the text of a text node.
    ///
    /// Returns whether any range was registered. On failure nothing is
    /// registered and the previous call's ranges stay in place.
    pub async fn highlight(&self, source: impl Into<SyntaxSource>, node: &Node) -> Result<bool> {
        let source = source.into();
        let result = self.run(&source, node).await;
        if let Err(e) = &result {
            warn!(suffix = %self.suffix, syntax = %source_name(&source), error = %e, "highlight failed");
        }
        result
    }

    /// Highlight a plain string
    pub async fn highlight_text(&self, source: impl Into<SyntaxSource>, text: &str) -> Result<bool> {
        self.highlight(source, &Node::text(text)).await
    }

    async fn run(&self, source: &SyntaxSource, node: &Node) -> Result<bool> {
        let registry = self.registry.as_ref().ok_or_else(|| {
            HighlightError::CapabilityMissing("no highlight registry available".to_string())
        })?;
        let text = node.as_text()?;

        let _guard = self.in_flight.lock().await;
        self.ensure_stylesheet();

        let rules = resolve(self.loader.as_ref(), source).await?;
        let buffer = TextBuffer::new(text);
        let matches = rules.match_all(&buffer)?;

        registry.remove_all();
        let mut any = false;
        for CategoryRanges { category, ranges } in matches {
            any |= !ranges.is_empty();
            registry.register(&category, ranges);
        }
        debug!(suffix = %self.suffix, highlighted = any, "highlight complete");
        Ok(any)
    }

    /// Clear every range this instance registered, returning its suffix
    pub fn remove_all(&self) -> InstanceSuffix {
        match &self.registry {
            Some(registry) => registry.remove_all(),
            None => self.suffix.clone(),
        }
    }

    /// Remove one category's ranges
    pub fn remove(&self, category: &str) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.remove(category))
    }

    /// Ranges currently registered by this instance
    pub fn ranges(&self) -> Vec<CategoryRanges> {
        self.registry
            .as_ref()
            .map(RegistryScope::list)
            .unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        self.lock_palette().clone()
    }

    /// Replace the palette override (`None` restores the defaults) and
    /// regenerate this instance's stylesheet fragment
    pub fn set_palette(&self, source: Option<PaletteSource>) -> Result<()> {
        let mut palette = self.lock_palette();
        palette.set(source)?;
        self.styles
            .set_fragment(&stylesheet_id(&self.suffix), palette.stylesheet(&self.suffix));
        Ok(())
    }

    /// The stylesheet fragment currently installed for this instance
    pub fn stylesheet(&self) -> Option<String> {
        self.styles.fragment(&stylesheet_id(&self.suffix))
    }

    fn ensure_stylesheet(&self) {
        let id = stylesheet_id(&self.suffix);
        if self.styles.fragment(&id).is_none() {
            let css = self.lock_palette().stylesheet(&self.suffix);
            self.styles.set_fragment(&id, css);
        }
    }

    fn lock_palette(&self) -> MutexGuard<'_, Palette> {
        self.palette.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Highlighter")
            .field("suffix", &self.suffix)
            .field("has_registry", &self.registry.is_some())
            .field("palette", &*self.lock_palette())
            .finish_non_exhaustive()
    }
}

fn source_name(source: &SyntaxSource) -> &str {
    match source {
        SyntaxSource::Identifier(identifier) => identifier,
        SyntaxSource::Resolved(_) => "<rule set>",
    }
}

/// Builder for `Highlighter`
pub struct HighlighterBuilder {
    suffix: Option<InstanceSuffix>,
    loader: Option<Arc<dyn RuleSetLoader>>,
    registry: Option<Arc<dyn RangeRegistry>>,
    styles: Option<Arc<dyn StyleSink>>,
    palette: Option<PaletteSource>,
}

impl Default for HighlighterBuilder {
    fn default() -> Self {
        Self {
            suffix: None,
            loader: None,
            registry: Some(MemoryRegistry::global()),
            styles: None,
            palette: None,
        }
    }
}

impl HighlighterBuilder {
    /// Loader, cache and palette from a settings file
    pub fn from_config(config: &HighlighterConfig) -> Self {
        let mut chain = ChainLoader::new();
        if let Some(dir) = &config.syntax_dir {
            chain = chain.with(FileLoader::new(dir.clone()));
        }
        chain = chain.with(BuiltinLoader);

        let loader: Arc<dyn RuleSetLoader> = if config.cache_rule_sets {
            Arc::new(CachedLoader::new(chain))
        } else {
            Arc::new(chain)
        };

        let mut builder = Self::default().loader(loader);
        if let Some(palette) = &config.palette {
            builder = builder.palette(palette.clone());
        }
        builder
    }

    pub fn suffix(mut self, suffix: InstanceSuffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn RuleSetLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Load rule sets from a directory, falling back to the built-ins
    pub fn syntax_dir(self, dir: impl Into<PathBuf>) -> Self {
        let chain = ChainLoader::new()
            .with(FileLoader::new(dir))
            .with(BuiltinLoader);
        self.loader(Arc::new(chain))
    }

    pub fn registry(mut self, registry: Arc<dyn RangeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build for a host without a highlight registry
    pub fn without_registry(mut self) -> Self {
        self.registry = None;
        self
    }

    pub fn styles(mut self, styles: Arc<dyn StyleSink>) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn palette(mut self, palette: impl Into<PaletteSource>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn build(self) -> Result<Highlighter> {
        let suffix = self.suffix.unwrap_or_else(InstanceSuffix::generate);
        let mut palette = Palette::new();
        palette.set(self.palette)?;

        let highlighter = Highlighter {
            registry: self
                .registry
                .map(|registry| RegistryScope::new(registry, suffix.clone())),
            loader: self.loader.unwrap_or_else(|| Arc::new(BuiltinLoader)),
            styles: self.styles.unwrap_or_else(|| Arc::new(MemoryStyleSink::new())),
            palette: Mutex::new(palette),
            in_flight: tokio::sync::Mutex::new(()),
            suffix,
        };
        highlighter.ensure_stylesheet();
        Ok(highlighter)
    }
}
