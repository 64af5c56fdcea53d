//! Rule set resolution and loading
//!
//! A syntax is named either by a short name ("html"), which expands to
//! `syntax.<name>.toml` next to the loader's base directory, or by an
//! explicit location starting with `http`, `.` or `/`. Loading is async
//! because it may touch the filesystem.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::builtin;
use super::ruleset::SyntaxRuleSet;
use crate::error::{HighlightError, Result};

/// File extension of rule set documents
pub const RULE_SET_EXTENSION: &str = "toml";

/// What to highlight with: a rule set in hand, or a name to resolve
#[derive(Debug, Clone)]
pub enum SyntaxSource {
    Resolved(Arc<SyntaxRuleSet>),
    Identifier(String),
}

impl From<&str> for SyntaxSource {
    fn from(identifier: &str) -> Self {
        SyntaxSource::Identifier(identifier.to_string())
    }
}

impl From<String> for SyntaxSource {
    fn from(identifier: String) -> Self {
        SyntaxSource::Identifier(identifier)
    }
}

impl From<SyntaxRuleSet> for SyntaxSource {
    fn from(rules: SyntaxRuleSet) -> Self {
        SyntaxSource::Resolved(Arc::new(rules))
    }
}

impl From<Arc<SyntaxRuleSet>> for SyntaxSource {
    fn from(rules: Arc<SyntaxRuleSet>) -> Self {
        SyntaxSource::Resolved(rules)
    }
}

/// Check if an identifier is already a path or URL
pub fn is_location(identifier: &str) -> bool {
    identifier.starts_with("http") || identifier.starts_with('.') || identifier.starts_with('/')
}

/// Expand a short name to its conventional file name; locations pass through
pub fn expand_identifier(identifier: &str) -> String {
    if is_location(identifier) {
        identifier.to_string()
    } else {
        format!("syntax.{identifier}.{RULE_SET_EXTENSION}")
    }
}

/// Extract the short name from a conventional `syntax.<name>.toml` location
pub fn short_name(location: &str) -> Option<&str> {
    let file_name = location.rsplit('/').next()?;
    file_name
        .strip_prefix("syntax.")?
        .strip_suffix(RULE_SET_EXTENSION)?
        .strip_suffix('.')
        .filter(|name| !name.is_empty())
}

/// Something that can turn an expanded location into a rule set
#[async_trait]
pub trait RuleSetLoader: Send + Sync {
    async fn load(&self, location: &str) -> Result<Arc<SyntaxRuleSet>>;
}

/// Resolve a syntax source to a rule set
pub async fn resolve(loader: &dyn RuleSetLoader, source: &SyntaxSource) -> Result<Arc<SyntaxRuleSet>> {
    match source {
        SyntaxSource::Resolved(rules) => Ok(Arc::clone(rules)),
        SyntaxSource::Identifier(identifier) => {
            let location = expand_identifier(identifier);
            debug!(identifier = %identifier, location = %location, "resolving syntax");
            loader.load(&location).await
        }
    }
}

/// Loads rule set documents from a directory
#[derive(Debug, Clone)]
pub struct FileLoader {
    base: PathBuf,
}

impl FileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

#[async_trait]
impl RuleSetLoader for FileLoader {
    async fn load(&self, location: &str) -> Result<Arc<SyntaxRuleSet>> {
        if location.starts_with("http") {
            return Err(HighlightError::load(location, "remote rule sets are not supported"));
        }
        let path = self.path_for(location);
        let source = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HighlightError::not_found(location),
            _ => HighlightError::load(location, format!("{}: {e}", path.display())),
        })?;
        let rules = SyntaxRuleSet::from_toml(location, &source)?;
        debug!(path = %path.display(), categories = rules.len(), "loaded rule set");
        Ok(Arc::new(rules))
    }
}

/// Serves the built-in rule sets
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

#[async_trait]
impl RuleSetLoader for BuiltinLoader {
    async fn load(&self, location: &str) -> Result<Arc<SyntaxRuleSet>> {
        let rules = short_name(location)
            .and_then(builtin::builtin_rules)
            .ok_or_else(|| HighlightError::not_found(location))??;
        Ok(Arc::new(rules))
    }
}

/// Tries each loader in turn, returning the first success.
///
/// Only `NotFound` moves on to the next loader. Any other failure means the
/// rule set exists but cannot be used, and is returned as is.
#[derive(Default)]
pub struct ChainLoader {
    loaders: Vec<Box<dyn RuleSetLoader>>,
}

impl ChainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl RuleSetLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }
}

#[async_trait]
impl RuleSetLoader for ChainLoader {
    async fn load(&self, location: &str) -> Result<Arc<SyntaxRuleSet>> {
        let mut last_error = None;
        for loader in &self.loaders {
            match loader.load(location).await {
                Ok(rules) => return Ok(rules),
                Err(e @ HighlightError::NotFound { .. }) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| HighlightError::not_found(location)))
    }
}

/// Memoizes successful loads by location. Failures are not cached.
pub struct CachedLoader<L> {
    inner: L,
    cache: Mutex<HashMap<String, Arc<SyntaxRuleSet>>>,
}

impl<L: RuleSetLoader> CachedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached rule sets
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop every cached rule set
    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl<L: RuleSetLoader> RuleSetLoader for CachedLoader<L> {
    async fn load(&self, location: &str) -> Result<Arc<SyntaxRuleSet>> {
        let hit = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(location)
            .cloned();
        if let Some(rules) = hit {
            debug!(location = %location, "rule set cache hit");
            return Ok(rules);
        }
        let rules = self.inner.load(location).await?;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(location.to_string(), Arc::clone(&rules));
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_identifier() {
        assert_eq!(expand_identifier("html"), "syntax.html.toml");
        assert_eq!(expand_identifier("./mine.toml"), "./mine.toml");
        assert_eq!(expand_identifier("/abs/syntax.x.toml"), "/abs/syntax.x.toml");
        assert_eq!(expand_identifier("https://example.com/s.toml"), "https://example.com/s.toml");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("syntax.html.toml"), Some("html"));
        assert_eq!(short_name("./dir/syntax.rust.toml"), Some("rust"));
        assert_eq!(short_name("syntax..toml"), None);
        assert_eq!(short_name("html.toml"), None);
    }

    #[tokio::test]
    async fn test_resolved_source_skips_loader() {
        let rules = Arc::new(SyntaxRuleSet::new());
        let source = SyntaxSource::from(Arc::clone(&rules));
        let resolved = resolve(&ChainLoader::new(), &source).await.unwrap();
        assert!(Arc::ptr_eq(&rules, &resolved));
    }

    #[tokio::test]
    async fn test_builtin_loader() {
        let rules = resolve(&BuiltinLoader, &"html".into()).await.unwrap();
        assert!(rules.get("tag").is_some());

        let err = resolve(&BuiltinLoader, &"cobol".into()).await.unwrap_err();
        assert!(matches!(err, HighlightError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_file_loader_short_name_and_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("syntax.ini.toml"), "comment = '(?m);.*$'\n").unwrap();
        fs::write(dir.path().join("custom.toml"), "keyword = ['on', 'off']\n").unwrap();
        let loader = FileLoader::new(dir.path());

        let ini = resolve(&loader, &"ini".into()).await.unwrap();
        assert_eq!(ini.categories().collect::<Vec<_>>(), ["comment"]);

        let custom = resolve(&loader, &"./custom.toml".into()).await.unwrap();
        assert!(custom.get("keyword").is_some());
    }

    #[tokio::test]
    async fn test_file_loader_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("syntax.bad.toml"), "weird = 42\n").unwrap();
        let loader = FileLoader::new(dir.path());

        let missing = resolve(&loader, &"missing".into()).await.unwrap_err();
        assert!(matches!(missing, HighlightError::NotFound { ref identifier } if identifier == "syntax.missing.toml"));

        let remote = resolve(&loader, &"http://example.com/x.toml".into()).await.unwrap_err();
        assert!(matches!(remote, HighlightError::Load { .. }));

        let bad = resolve(&loader, &"bad".into()).await.unwrap_err();
        assert!(matches!(bad, HighlightError::InvalidRule { ref category, .. } if category == "weird"));
    }

    #[tokio::test]
    async fn test_chain_prefers_first_success() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("syntax.html.toml"), "tag = '<'\n").unwrap();
        let chain = ChainLoader::new()
            .with(FileLoader::new(dir.path()))
            .with(BuiltinLoader);

        // File wins over the built-in html
        let html = resolve(&chain, &"html".into()).await.unwrap();
        assert_eq!(html.len(), 1);

        // Falls through to built-ins when no file exists
        let rust = resolve(&chain, &"rust".into()).await.unwrap();
        assert!(rust.get("keyword").is_some());

        let err = resolve(&chain, &"cobol".into()).await.unwrap_err();
        assert!(matches!(err, HighlightError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_chain_surfaces_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("syntax.html.toml"), "tag = [unclosed\n").unwrap();
        let chain = ChainLoader::new()
            .with(FileLoader::new(dir.path()))
            .with(BuiltinLoader);

        // The broken file must not be replaced by the built-in html
        let err = resolve(&chain, &"html".into()).await.unwrap_err();
        assert!(matches!(err, HighlightError::Load { ref identifier, .. } if identifier == "syntax.html.toml"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_chain_surfaces_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be fails to read without being missing
        fs::create_dir(dir.path().join("syntax.rust.toml")).unwrap();
        let chain = ChainLoader::new()
            .with(FileLoader::new(dir.path()))
            .with(BuiltinLoader);

        let err = resolve(&chain, &"rust".into()).await.unwrap_err();
        assert!(matches!(err, HighlightError::Load { .. }));
    }

    #[tokio::test]
    async fn test_empty_chain_is_not_found() {
        let err = resolve(&ChainLoader::new(), &"html".into()).await.unwrap_err();
        assert!(matches!(err, HighlightError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cached_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syntax.x.toml");
        fs::write(&path, "number = '\\d+'\n").unwrap();
        let loader = CachedLoader::new(FileLoader::new(dir.path()));

        let first = resolve(&loader, &"x".into()).await.unwrap();
        fs::remove_file(&path).unwrap();
        let second = resolve(&loader, &"x".into()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.cached(), 1);

        assert!(resolve(&loader, &"y".into()).await.is_err());
        assert_eq!(loader.cached(), 1);

        loader.clear();
        assert!(resolve(&loader, &"x".into()).await.is_err());
    }
}
