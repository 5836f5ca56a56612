//! Sections and rendered page fragments.

use serde::{Deserialize, Serialize};

/// A contiguous, half-open page range `[start, end)`, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// First page of the section
    pub start: u32,
    /// One past the last page of the section
    pub end: u32,
}

impl Section {
    /// Create a section.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of pages covered.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Zero-width sections come from outline entries that share a page with
    /// the running section start.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the section covers `page`.
    pub fn contains(&self, page: u32) -> bool {
        (self.start..self.end).contains(&page)
    }

    /// Page numbers covered, in increasing order.
    pub fn pages(&self) -> std::ops::Range<u32> {
        self.start..self.end.max(self.start)
    }
}

/// One page rendered to vector markup plus its extracted style block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFragment {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Vector markup with the style block removed
    #[serde(skip_serializing)]
    #[serde(default)]
    pub vector_markup: String,

    /// Inner content of the first `<defs>` block (empty when absent)
    #[serde(skip_serializing)]
    #[serde(default)]
    pub style_fragment: String,
}

impl PageFragment {
    /// Create a fragment.
    pub fn new(page_number: u32, vector_markup: String, style_fragment: String) -> Self {
        Self {
            page_number,
            vector_markup,
            style_fragment,
        }
    }

    /// Whether the page carried any embedded style content.
    pub fn has_style(&self) -> bool {
        !self.style_fragment.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_pages() {
        let s = Section::new(3, 6);
        assert_eq!(s.len(), 3);
        assert!(s.contains(3));
        assert!(s.contains(5));
        assert!(!s.contains(6));
        assert_eq!(s.pages().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_zero_width_section() {
        let s = Section::new(1, 1);
        assert!(s.is_empty());
        assert_eq!(s.pages().count(), 0);
    }

    #[test]
    fn test_fragment_has_style() {
        let f = PageFragment::new(1, "<svg/>".into(), "  ".into());
        assert!(!f.has_style());
        let f = PageFragment::new(1, "<svg/>".into(), "@font-face{}".into());
        assert!(f.has_style());
    }
}
