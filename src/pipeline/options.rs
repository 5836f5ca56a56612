//! Deck build options and configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::assemble::DEFAULT_PAGE_PATH_PREFIX;
use crate::model::FlattenRule;
use crate::partition::{BoundaryPolicy, PartitionOptions};

/// Title used when the document has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Options for building a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOptions {
    /// Extract pages on the rayon pool
    pub parallel: bool,

    /// Extra attempts for a page whose render fails
    pub render_retries: u32,

    /// Which outline entries cut sections
    pub flatten_rule: FlattenRule,

    /// Handling of out-of-order outline entries
    pub boundary_policy: BoundaryPolicy,

    /// Directory, relative to the deck root, holding page files
    pub page_path_prefix: String,

    /// Pages to extract; the rest are referenced but not rendered
    pub page_selection: PageSelection,

    /// Deck title when the document metadata has none
    pub fallback_title: String,
}

impl DeckOptions {
    /// Create new deck options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of render retries per page.
    pub fn with_render_retries(mut self, retries: u32) -> Self {
        self.render_retries = retries;
        self
    }

    /// Set the outline flattening rule.
    pub fn with_flatten_rule(mut self, rule: FlattenRule) -> Self {
        self.flatten_rule = rule;
        self
    }

    /// Set the boundary policy.
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    /// Set the page path prefix.
    pub fn with_page_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.page_path_prefix = prefix.into();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set the fallback title.
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = title.into();
        self
    }

    /// Options for the partitioner.
    pub fn partition_options(&self) -> PartitionOptions {
        PartitionOptions::new()
            .with_flatten_rule(self.flatten_rule)
            .with_boundary_policy(self.boundary_policy)
    }
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            render_retries: 0,
            flatten_rule: FlattenRule::default(),
            boundary_policy: BoundaryPolicy::default(),
            page_path_prefix: DEFAULT_PAGE_PATH_PREFIX.to_string(),
            page_selection: PageSelection::All,
            fallback_title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let page = |p: &str| -> Result<u32, String> {
            match p.trim().parse::<u32>() {
                Ok(0) => Err("Page numbers start at 1".to_string()),
                Ok(n) => Ok(n),
                Err(_) => Err(format!("Invalid page number: {}", p.trim())),
            }
        };

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (page(start)?, page(end)?);
                if start > end {
                    return Err(format!("Invalid page range: {}-{}", start, end));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (page(start)?, page(end)?);
                if start > end {
                    return Err(format!("Invalid page range: {}-{}", start, end));
                }
                pages.extend(start..=end);
            } else {
                pages.push(page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
