//! Document outline (bookmarks) and its flattening rules.

use serde::{Deserialize, Serialize};

/// Where an outline entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Destination {
    /// Explicit destination naming a page object `(object, generation)`.
    PageRef {
        /// Object number of the page dictionary
        object: u32,
        /// Generation number
        generation: u16,
    },

    /// Explicit destination naming a 0-indexed page directly.
    ///
    /// Only valid for remote destinations by the letter of the PDF format, but
    /// common producers write it for local ones too.
    PageIndex(u32),

    /// Named destination, looked up in the document's name tables.
    Named(String),

    /// The entry has no destination (or only a non-GoTo action).
    Missing,
}

/// A single outline entry (bookmark).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Entry title
    pub title: String,

    /// Target of the entry
    pub destination: Destination,

    /// Child entries
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Create a new outline entry without children.
    pub fn new(title: impl Into<String>, destination: Destination) -> Self {
        Self {
            title: title.into(),
            destination,
            children: Vec::new(),
        }
    }

    /// Add a child entry.
    pub fn add_child(&mut self, child: OutlineEntry) {
        self.children.push(child);
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: OutlineEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// How the outline tree is turned into the flat sequence sections are cut at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenRule {
    /// Top-level entries only, in outline order.
    #[default]
    TopLevel,
    /// Every entry, depth-first, parents before their children.
    Preorder,
}

/// Document outline (bookmarks/table of contents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level entries
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a top-level entry.
    pub fn add_entry(&mut self, entry: OutlineEntry) {
        self.entries.push(entry);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries, nested ones included.
    pub fn total_entries(&self) -> usize {
        fn count(entries: &[OutlineEntry]) -> usize {
            entries.iter().map(|e| 1 + count(&e.children)).sum()
        }
        count(&self.entries)
    }

    /// Flatten the tree into the order sections are cut at.
    pub fn flatten(&self, rule: FlattenRule) -> Vec<&OutlineEntry> {
        match rule {
            FlattenRule::TopLevel => self.entries.iter().collect(),
            FlattenRule::Preorder => {
                let mut flat = Vec::with_capacity(self.total_entries());
                let mut stack: Vec<&OutlineEntry> = self.entries.iter().rev().collect();
                while let Some(entry) = stack.pop() {
                    flat.push(entry);
                    stack.extend(entry.children.iter().rev());
                }
                flat
            }
        }
    }
}
