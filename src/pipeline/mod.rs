//! Deck building pipeline.
//!
//! Partitioning and per-page extraction run concurrently; their results meet
//! in the [`DeckAssembler`].
//!
//! # Example
//!
//! ```no_run
//! use reveal_pdf::backend::LopdfSource;
//! use reveal_pdf::pipeline::{DeckBuilder, DeckOptions};
//!
//! fn main() -> reveal_pdf::Result<()> {
//!     let source = LopdfSource::load_file("talk.pdf")?;
//!     let deck = DeckBuilder::new(DeckOptions::default()).build(&source)?;
//!     println!("{} sections", deck.sections.len());
//!     Ok(())
//! }
//! ```

mod options;
mod report;

pub use options::{DeckOptions, PageSelection, DEFAULT_TITLE};
pub use report::{BatchReport, PageOutcome, ProgressEvent};

use std::collections::BTreeMap;

use crossbeam_channel::Sender;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assemble::{DeckAssembler, DeckBody, FragmentRefs};
use crate::backend::DocumentSource;
use crate::error::Result;
use crate::extract::VectorFragmentExtractor;
use crate::model::{Metadata, PageFragment, Section, Viewport};
use crate::partition::OutlineSectionPartitioner;
use crate::svg::{SvgRenderer, VectorRenderer};

/// A built deck, ready to be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Deck title
    pub title: String,

    /// Source document metadata
    pub metadata: Metadata,

    /// Reference viewport (page 1 at scale 1.0)
    pub viewport: Viewport,

    /// Outline sections
    pub sections: Vec<Section>,

    /// Ordered page references
    pub body: DeckBody,

    /// Extracted fragments by page number
    #[serde(skip)]
    pub fragments: BTreeMap<u32, PageFragment>,

    /// Per-page outcomes
    pub report: BatchReport,
}

impl Deck {
    /// Number of pages in the deck.
    pub fn page_count(&self) -> usize {
        self.body.page_count()
    }

    /// Fragment for a page, if it rendered.
    pub fn fragment(&self, page: u32) -> Option<&PageFragment> {
        self.fragments.get(&page)
    }
}

/// Builds [`Deck`]s from a [`DocumentSource`].
pub struct DeckBuilder<R = SvgRenderer> {
    options: DeckOptions,
    extractor: VectorFragmentExtractor<R>,
    progress: Option<Sender<ProgressEvent>>,
}

impl DeckBuilder<SvgRenderer> {
    /// Create a builder using the SVG renderer with embedded fonts.
    pub fn new(options: DeckOptions) -> Self {
        Self::with_renderer(options, SvgRenderer::default())
    }
}

impl<R: VectorRenderer> DeckBuilder<R> {
    /// Create a builder around a custom renderer.
    pub fn with_renderer(options: DeckOptions, renderer: R) -> Self {
        Self {
            options,
            extractor: VectorFragmentExtractor::new(renderer),
            progress: None,
        }
    }

    /// Publish progress events on `sender`.
    pub fn with_progress(mut self, sender: Sender<ProgressEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Options in use.
    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    /// Build the deck.
    ///
    /// Fails on document-level errors (unreadable reference viewport,
    /// unresolvable outline destinations). Page-level failures are recorded
    /// in the [`BatchReport`] and the page keeps its reference.
    pub fn build<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<Deck> {
        let viewport = source.viewport()?;
        let metadata = source.metadata();
        let partitioner = OutlineSectionPartitioner::new(self.options.partition_options());

        let (sections, extracted) = rayon::join(
            || partitioner.partition(source),
            || self.extract_all(source),
        );
        let sections = sections?;

        let mut fragments = BTreeMap::new();
        let mut report = BatchReport::new();
        for (page, result) in extracted {
            match result {
                Some(Ok(fragment)) => {
                    fragments.insert(page, fragment);
                    report.record(page, PageOutcome::Rendered);
                }
                Some(Err(err)) => {
                    report.record(
                        page,
                        PageOutcome::Failed {
                            reason: err.to_string(),
                        },
                    );
                }
                None => report.record(page, PageOutcome::Skipped),
            }
        }

        let refs = SourceRefs {
            source,
            fragments: &fragments,
        };
        let body = DeckAssembler::new()
            .with_page_path_prefix(self.options.page_path_prefix.as_str())
            .assemble(&sections, &refs)?;

        log::info!(
            "Built deck: {} sections, {} of {} pages rendered, {} failed",
            sections.len(),
            report.rendered_count(),
            source.page_count(),
            report.failures().len()
        );

        Ok(Deck {
            title: metadata
                .display_title(&self.options.fallback_title)
                .to_string(),
            metadata,
            viewport,
            sections,
            body,
            fragments,
            report,
        })
    }

    /// Extract every page; `None` marks a page outside the selection.
    fn extract_all<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
    ) -> Vec<(u32, Option<Result<PageFragment>>)> {
        let page_count = source.page_count();
        self.notify(ProgressEvent::Started { pages: page_count });

        let extract = |page: u32| {
            let result = if self.options.page_selection.includes(page) {
                Some(self.extract_with_retries(source, page))
            } else {
                None
            };
            self.notify(ProgressEvent::Page {
                page,
                outcome: match &result {
                    Some(Ok(_)) => PageOutcome::Rendered,
                    Some(Err(err)) => PageOutcome::Failed {
                        reason: err.to_string(),
                    },
                    None => PageOutcome::Skipped,
                },
            });
            (page, result)
        };

        let results = if self.options.parallel {
            (1..=page_count).into_par_iter().map(extract).collect()
        } else {
            (1..=page_count).map(extract).collect()
        };

        self.notify(ProgressEvent::Finished);
        results
    }

    fn extract_with_retries<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        page: u32,
    ) -> Result<PageFragment> {
        let mut attempt = 0;
        loop {
            match self.extractor.extract_page(source, page) {
                Ok(fragment) => return Ok(fragment),
                Err(err) if err.is_page_local() && attempt < self.options.render_retries => {
                    attempt += 1;
                    log::debug!("Retrying page {} (attempt {}): {}", page, attempt, err);
                }
                Err(err) => {
                    log::warn!("FAILED: page {}: {}", page, err);
                    return Err(err);
                }
            }
        }
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(sender) = &self.progress {
            // A dropped receiver only means nobody is watching.
            let _ = sender.send(event);
        }
    }
}

struct SourceRefs<'a, S: ?Sized> {
    source: &'a S,
    fragments: &'a BTreeMap<u32, PageFragment>,
}

impl<S: DocumentSource + ?Sized> FragmentRefs for SourceRefs<'_, S> {
    fn is_rendered(&self, number: u32) -> bool {
        self.fragments.contains_key(&number)
    }

    fn label(&self, number: u32) -> Option<String> {
        self.source.page_label(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemorySource;
    use crate::model::{Destination, Outline, OutlineEntry};

    fn outline_at(pages: &[u32]) -> Outline {
        let mut outline = Outline::new();
        for page in pages {
            outline.add_entry(OutlineEntry::new(
                format!("Page {}", page),
                Destination::PageIndex(page - 1),
            ));
        }
        outline
    }

    #[test]
    fn test_build_all_pages() {
        let source = MemorySource::new(10)
            .with_title("Talk")
            .with_outline(outline_at(&[1, 5]));
        let deck = DeckBuilder::new(DeckOptions::default())
            .build(&source)
            .unwrap();

        assert_eq!(deck.title, "Talk");
        assert_eq!(
            deck.sections,
            vec![Section::new(1, 1), Section::new(1, 5), Section::new(5, 11)]
        );
        assert_eq!(deck.page_count(), 10);
        assert_eq!(deck.fragments.len(), 10);
        assert!(deck.report.is_complete());
        assert!(deck.fragment(1).unwrap().vector_markup.starts_with("<svg"));
    }

    #[test]
    fn test_failed_page_is_reported_and_referenced() {
        let source = MemorySource::new(5).with_failing_page(3);
        let deck = DeckBuilder::new(DeckOptions::default().with_render_retries(2))
            .build(&source)
            .unwrap();

        assert_eq!(
            deck.fragments.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 4, 5]
        );
        assert_eq!(deck.report.failures().len(), 1);
        assert_eq!(deck.report.failures()[0].0, 3);
        assert_eq!(deck.page_count(), 5);
        assert!(!deck.body.page(3).unwrap().rendered);
    }

    #[test]
    fn test_selection_skips_pages() {
        let source = MemorySource::new(4);
        let deck = DeckBuilder::new(
            DeckOptions::default()
                .with_parallel(false)
                .with_pages(PageSelection::Pages(vec![2, 4])),
        )
        .build(&source)
        .unwrap();

        assert_eq!(deck.fragments.len(), 2);
        assert_eq!(deck.report.skipped_count(), 2);
        assert_eq!(deck.report.outcome(1), Some(&PageOutcome::Skipped));
        assert_eq!(deck.page_count(), 4);
    }

    #[test]
    fn test_progress_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let source = MemorySource::new(3).with_failing_page(2);
        DeckBuilder::new(DeckOptions::default())
            .with_progress(tx)
            .build(&source)
            .unwrap();

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(events.first(), Some(&ProgressEvent::Started { pages: 3 }));
        assert_eq!(events.last(), Some(&ProgressEvent::Finished));
        let pages = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Page { .. }))
            .count();
        assert_eq!(pages, 3);
    }

    #[test]
    fn test_labels_fall_back_to_numbers() {
        let source = MemorySource::new(3).with_label(1, "Cover");
        let deck = DeckBuilder::new(DeckOptions::default())
            .build(&source)
            .unwrap();

        assert_eq!(deck.body.page(1).unwrap().label, "Cover");
        assert_eq!(deck.body.page(2).unwrap().label, "2");
    }

    #[test]
    fn test_unresolvable_outline_is_fatal() {
        let mut outline = Outline::new();
        outline.add_entry(OutlineEntry::new("Nowhere", Destination::Missing));
        let source = MemorySource::new(2).with_outline(outline);

        let err = DeckBuilder::new(DeckOptions::default())
            .build(&source)
            .unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn test_untitled_deck_uses_fallback() {
        let deck = DeckBuilder::new(DeckOptions::default().with_fallback_title("slides"))
            .build(&MemorySource::new(1))
            .unwrap();
        assert_eq!(deck.title, "slides");
    }
}
