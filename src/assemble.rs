//! Deck body assembly.
//!
//! Combines the section list with per-page references into the ordered
//! structure the HTML writer walks. References point at page files; fragment
//! content is never copied into the body.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Section;

/// Default directory, relative to the deck root, holding page files.
pub const DEFAULT_PAGE_PATH_PREFIX: &str = "pages/";

/// Reference to one hosted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page file path relative to the deck root
    pub file: String,
    /// Display label (page label, or the page number)
    pub label: String,
    /// Whether the page fragment was produced
    pub rendered: bool,
}

/// One section with the pages it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBody {
    /// Page range of the section
    pub section: Section,
    /// Page references in page order
    pub pages: Vec<PageRef>,
}

impl SectionBody {
    /// Whether the section holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Ordered deck structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckBody {
    /// Sections in document order
    pub sections: Vec<SectionBody>,
}

impl DeckBody {
    /// All page references in deck order.
    pub fn pages(&self) -> impl Iterator<Item = &PageRef> {
        self.sections.iter().flat_map(|s| s.pages.iter())
    }

    /// Total number of page references.
    pub fn page_count(&self) -> usize {
        self.sections.iter().map(|s| s.pages.len()).sum()
    }

    /// Reference for page `number`.
    pub fn page(&self, number: u32) -> Option<&PageRef> {
        self.pages().find(|p| p.number == number)
    }

    /// Pages that were not rendered.
    pub fn missing_pages(&self) -> Vec<u32> {
        self.pages()
            .filter(|p| !p.rendered)
            .map(|p| p.number)
            .collect()
    }
}

/// What the assembler needs to know about each page.
pub trait FragmentRefs {
    /// Whether page `number` produced a fragment.
    fn is_rendered(&self, number: u32) -> bool;

    /// Page label, if the document defines one.
    fn label(&self, number: u32) -> Option<String>;
}

/// Builds a [`DeckBody`] from sections and page references.
#[derive(Debug, Clone)]
pub struct DeckAssembler {
    page_path_prefix: String,
}

impl Default for DeckAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckAssembler {
    /// Create an assembler with the default `pages/` prefix.
    pub fn new() -> Self {
        Self {
            page_path_prefix: DEFAULT_PAGE_PATH_PREFIX.to_string(),
        }
    }

    /// Set the page path prefix (a trailing `/` is added when missing).
    pub fn with_page_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.page_path_prefix = prefix;
        self
    }

    /// Page path prefix in use.
    pub fn page_path_prefix(&self) -> &str {
        &self.page_path_prefix
    }

    /// Relative path of the file hosting page `number`.
    pub fn page_file(&self, number: u32) -> String {
        format!("{}p{}.html", self.page_path_prefix, number)
    }

    /// Assemble the deck body.
    ///
    /// `sections` must be contiguous from page 1; the last section's end
    /// determines the page count. Every page is referenced exactly once, in
    /// increasing order.
    pub fn assemble<R: FragmentRefs + ?Sized>(
        &self,
        sections: &[Section],
        fragments: &R,
    ) -> Result<DeckBody> {
        let mut expected = 1;
        let mut body = Vec::with_capacity(sections.len());

        for section in sections {
            if section.start != expected || section.end < section.start {
                return Err(Error::Other(format!(
                    "sections are not contiguous: expected a section starting at page {}, found [{}, {})",
                    expected, section.start, section.end
                )));
            }

            let pages = section
                .pages()
                .map(|number| PageRef {
                    number,
                    file: self.page_file(number),
                    label: fragments
                        .label(number)
                        .unwrap_or_else(|| number.to_string()),
                    rendered: fragments.is_rendered(number),
                })
                .collect();

            body.push(SectionBody {
                section: *section,
                pages,
            });
            expected = section.end;
        }

        Ok(DeckBody { sections: body })
    }
}
