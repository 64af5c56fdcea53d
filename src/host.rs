//! Host document collaborators
//!
//! The highlighter only needs two things from the document it works in:
//! the node whose text gets highlighted, and somewhere to put the
//! generated stylesheet fragment.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{HighlightError, Result};

/// A minimal document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element { tag: String, children: Vec<Node> },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            children,
        }
    }

    /// The node's own text, if it is a text node
    pub fn as_text(&self) -> Result<&str> {
        match self {
            Node::Text(text) => Ok(text),
            Node::Element { tag, .. } => Err(HighlightError::WrongNodeKind(format!("<{tag}> element"))),
        }
    }
}

/// Receives stylesheet fragments, one per id
pub trait StyleSink: Send + Sync {
    /// Insert or replace the fragment with this id
    fn set_fragment(&self, id: &str, css: String);
    fn fragment(&self, id: &str) -> Option<String>;
}

/// In-memory stylesheet store
#[derive(Debug, Default)]
pub struct MemoryStyleSink {
    fragments: Mutex<HashMap<String, String>>,
}

impl MemoryStyleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fragments.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StyleSink for MemoryStyleSink {
    fn set_fragment(&self, id: &str, css: String) {
        self.fragments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), css);
    }

    fn fragment(&self, id: &str) -> Option<String> {
        self.fragments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }
}
