//! Document-parsing collaborator.
//!
//! The core never touches a concrete PDF library. It reads pages, outline,
//! destinations, labels and metadata through [`DocumentSource`], implemented
//! here by [`LopdfSource`] and, for tests and benchmarks, by
//! [`MemorySource`].

mod labels;
mod lopdf_source;
mod memory;

pub use labels::{LabelStyle, PageLabelRange, PageLabels};
pub use lopdf_source::LopdfSource;
pub use memory::MemorySource;

use crate::error::Result;
use crate::model::{Destination, Metadata, Outline, Page, Viewport};

/// Abstract interface for PDF document access.
///
/// Implementations must be shareable across threads: page extraction fans
/// out over the rayon pool with a shared reference to the source.
pub trait DocumentSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Document metadata.
    fn metadata(&self) -> Metadata;

    /// The outline tree (empty when the document has none).
    fn outline(&self) -> Result<Outline>;

    /// Resolve a destination to a 0-indexed page.
    ///
    /// Fails with [`Error::UnresolvableDestination`](crate::Error::UnresolvableDestination);
    /// the `title` field is left empty for the caller to fill in.
    fn page_index(&self, destination: &Destination) -> Result<u32>;

    /// Load one page's paint operations (1-indexed).
    fn page(&self, number: u32) -> Result<Page>;

    /// Display label of a page (1-indexed), if the document defines one.
    fn page_label(&self, number: u32) -> Option<String>;

    /// Decode a text string shown with `font` on `page`.
    fn decode_text(&self, _page: u32, _font: &[u8], bytes: &[u8]) -> String {
        decode_text_simple(bytes)
    }

    /// Reference viewport: page 1 at scale 1.0.
    fn viewport(&self) -> Result<Viewport> {
        self.page(1).map(|p| p.viewport)
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode a PDF text string (Info values, outline titles, label prefixes).
///
/// Strips the language escape sequences (`ESC lang ESC`) PDF 2.0 allows
/// inside UTF-16 strings.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    let decoded = decode_text_simple(bytes);
    if !decoded.contains('\u{1b}') {
        return decoded;
    }

    let mut out = String::with_capacity(decoded.len());
    let mut in_escape = false;
    for c in decoded.chars() {
        if c == '\u{1b}' {
            in_escape = !in_escape;
        } else if !in_escape {
            out.push(c);
        }
    }
    out
}
