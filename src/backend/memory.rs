//! In-memory [`DocumentSource`] for tests and benchmarks.

use std::collections::{HashMap, HashSet};

use super::DocumentSource;
use crate::error::{Error, Result};
use crate::model::{Destination, Metadata, Outline, Page, Viewport};

/// A document assembled by hand.
///
/// Every page starts blank at US Letter size. Pages can be replaced, labelled
/// or marked as failing, which makes [`DocumentSource::page`] return a
/// render error for them.
#[derive(Debug, Clone)]
pub struct MemorySource {
    metadata: Metadata,
    outline: Outline,
    pages: Vec<Page>,
    labels: HashMap<u32, String>,
    named: HashMap<String, u32>,
    failing: HashSet<u32>,
}

impl MemorySource {
    /// Create a document of `page_count` blank pages.
    pub fn new(page_count: u32) -> Self {
        let mut metadata = Metadata::with_version("1.7");
        metadata.page_count = page_count;

        Self {
            metadata,
            outline: Outline::new(),
            pages: (1..=page_count)
                .map(|n| Page::new(n, Viewport::letter()))
                .collect(),
            labels: HashMap::new(),
            named: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Set the size of every page.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        for page in &mut self.pages {
            page.viewport = viewport;
        }
        self
    }

    /// Replace the page with the same number. Out-of-range pages are ignored.
    pub fn with_page(mut self, page: Page) -> Self {
        if let Some(slot) = page
            .number
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i as usize))
        {
            *slot = page;
        }
        self
    }

    /// Set the outline.
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Label a page (1-indexed).
    pub fn with_label(mut self, page: u32, label: impl Into<String>) -> Self {
        self.labels.insert(page, label.into());
        self
    }

    /// Register a named destination pointing at a 0-indexed page.
    pub fn with_named_destination(mut self, name: impl Into<String>, page_index: u32) -> Self {
        self.named.insert(name.into(), page_index);
        self
    }

    /// Make a page fail to load.
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn outline(&self) -> Result<Outline> {
        Ok(self.outline.clone())
    }

    fn page_index(&self, destination: &Destination) -> Result<u32> {
        let unresolvable = |reason: String| Error::UnresolvableDestination {
            title: String::new(),
            reason,
        };

        match destination {
            Destination::PageIndex(index) if *index < self.page_count() => Ok(*index),
            Destination::PageIndex(index) => {
                Err(unresolvable(format!("page index {} is out of range", index)))
            }
            Destination::Named(name) => self
                .named
                .get(name)
                .copied()
                .ok_or_else(|| unresolvable(format!("named destination \"{}\" not found", name))),
            Destination::PageRef { object, generation } => Err(unresolvable(format!(
                "object {} {} R is not a page",
                object, generation
            ))),
            Destination::Missing => Err(unresolvable("entry has no destination".to_string())),
        }
    }

    fn page(&self, number: u32) -> Result<Page> {
        if self.failing.contains(&number) {
            return Err(Error::render(number, "page marked as failing"));
        }
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageNotFound(number, self.page_count()))
    }

    fn page_label(&self, number: u32) -> Option<String> {
        self.labels.get(&number).cloned()
    }
}
