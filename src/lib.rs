//! # reveal-pdf
//!
//! Turn a PDF slide deck into a reveal.js presentation.
//!
//! Every page becomes a standalone SVG-backed HTML file hosted inside its own
//! slide. The document outline splits pages into vertical stacks of slides
//! (sections), and the browser plugin suppresses the transition between
//! consecutive pages sharing a page label, so build-up overlays play as
//! in-place changes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reveal_pdf::{build_deck, render::DeckWriter, DeckOptions};
//!
//! fn main() -> reveal_pdf::Result<()> {
//!     let deck = build_deck("talk.pdf", DeckOptions::default())?;
//!     let report = DeckWriter::new().write(&deck, "talk-deck")?;
//!     println!("{} files written", report.written().count());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`OutlineSectionPartitioner`] cuts `[1, N + 1)` at outline destinations
//! - [`VectorFragmentExtractor`] renders each page and splits off its
//!   embedded font styles
//! - [`DeckAssembler`] orders page references within sections
//! - [`TransitionController`] holds the slide transition rules

pub mod assemble;
pub mod backend;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod partition;
pub mod pipeline;
pub mod render;
pub mod svg;
pub mod transition;

// Re-export commonly used types
pub use assemble::{DeckAssembler, DeckBody, PageRef, SectionBody};
pub use backend::{DocumentSource, LopdfSource, MemorySource};
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use extract::VectorFragmentExtractor;
pub use model::{
    Destination, FlattenRule, Metadata, Outline, OutlineEntry, PageFragment, Section, Viewport,
};
pub use partition::{BoundaryPolicy, OutlineSectionPartitioner, PartitionOptions};
pub use pipeline::{
    BatchReport, Deck, DeckBuilder, DeckOptions, PageOutcome, PageSelection, ProgressEvent,
};
pub use render::{DeckWriter, JsonFormat, WriteReport};
pub use svg::{SvgRenderer, VectorRenderer};
pub use transition::{Slide, SlideNode, TransitionController, TransitionDecision};

use std::io::Read;
use std::path::Path;

/// Open a PDF file as a [`DocumentSource`].
///
/// # Example
///
/// ```no_run
/// use reveal_pdf::{open_file, DocumentSource};
///
/// let source = open_file("talk.pdf").unwrap();
/// println!("Pages: {}", source.page_count());
/// ```
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<LopdfSource> {
    LopdfSource::load_file(path)
}

/// Open a PDF from bytes.
pub fn open_bytes(data: &[u8]) -> Result<LopdfSource> {
    LopdfSource::load_bytes(data)
}

/// Open a PDF from a reader.
pub fn open_reader<R: Read>(reader: R) -> Result<LopdfSource> {
    LopdfSource::load_reader(reader)
}

/// Build a deck from a PDF file.
///
/// The file stem is used as the title when the document has none.
pub fn build_deck<P: AsRef<Path>>(path: P, options: DeckOptions) -> Result<Deck> {
    let path = path.as_ref();
    let source = open_file(path)?;

    let options = match path.file_stem() {
        Some(stem) if options.fallback_title == pipeline::DEFAULT_TITLE => {
            options.with_fallback_title(stem.to_string_lossy())
        }
        _ => options,
    };
    DeckBuilder::new(options).build(&source)
}

/// Open a PDF file asynchronously.
///
/// The file is read with `tokio::fs`; parsing happens on the calling task.
#[cfg(feature = "async")]
pub async fn load_file_async<P: AsRef<Path>>(path: P) -> Result<LopdfSource> {
    let data = tokio::fs::read(path.as_ref()).await?;
    LopdfSource::load_bytes(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_bytes_rejects_garbage() {
        assert!(matches!(
            open_bytes(b"<html>not a pdf</html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(open_file("/nonexistent/talk.pdf").is_err());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_load_file_async_missing() {
        let err = load_file_async("/nonexistent/talk.pdf").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
