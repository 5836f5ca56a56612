//! Outline-driven section partitioning.
//!
//! Each flattened outline entry closes the running section at the entry's
//! page and opens the next one there. With `k` entries the result is `k + 1`
//! contiguous sections covering `[1, N + 1)`.

use serde::{Deserialize, Serialize};

use crate::backend::DocumentSource;
use crate::error::{Error, Result};
use crate::model::{Destination, FlattenRule, Outline, Section};

/// What to do with an entry that points before the running section start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp to the running start, producing a zero-width section.
    #[default]
    Clamp,
    /// Fail with [`Error::OutOfOrderOutline`].
    Reject,
}

/// Partitioning options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionOptions {
    /// Which outline entries cut sections
    pub flatten_rule: FlattenRule,
    /// Handling of out-of-order entries
    pub boundary_policy: BoundaryPolicy,
}

impl PartitionOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flattening rule.
    pub fn with_flatten_rule(mut self, rule: FlattenRule) -> Self {
        self.flatten_rule = rule;
        self
    }

    /// Set the boundary policy.
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }
}

/// Splits the page sequence into sections at outline destinations.
#[derive(Debug, Clone, Default)]
pub struct OutlineSectionPartitioner {
    options: PartitionOptions,
}

impl OutlineSectionPartitioner {
    /// Create a partitioner.
    pub fn new(options: PartitionOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &PartitionOptions {
        &self.options
    }

    /// Partition a document using its own outline and destination resolver.
    pub fn partition<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<Vec<Section>> {
        let outline = source.outline()?;
        self.partition_outline(&outline, source.page_count(), |dest| {
            source.page_index(dest)
        })
    }

    /// Partition `page_count` pages at the entries of `outline`.
    ///
    /// `resolve` maps a destination to a 0-indexed page. Resolution failures
    /// propagate with the entry title filled in.
    pub fn partition_outline<F>(
        &self,
        outline: &Outline,
        page_count: u32,
        resolve: F,
    ) -> Result<Vec<Section>>
    where
        F: Fn(&Destination) -> Result<u32>,
    {
        let entries = outline.flatten(self.options.flatten_rule);
        let end_of_document = page_count + 1;

        let mut sections = Vec::with_capacity(entries.len() + 1);
        let mut start = 1;

        for entry in entries {
            let index = resolve(&entry.destination).map_err(|err| match err {
                Error::UnresolvableDestination { title, reason } if title.is_empty() => {
                    Error::UnresolvableDestination {
                        title: entry.title.clone(),
                        reason,
                    }
                }
                other => other,
            })?;

            let mut page = index + 1;
            if page > end_of_document {
                return Err(Error::UnresolvableDestination {
                    title: entry.title.clone(),
                    reason: format!(
                        "page {} is past the end of the document ({} pages)",
                        page, page_count
                    ),
                });
            }

            if page < start {
                match self.options.boundary_policy {
                    BoundaryPolicy::Clamp => {
                        log::warn!(
                            "Outline entry \"{}\" points to page {}, before section start {}; clamping",
                            entry.title,
                            page,
                            start
                        );
                        page = start;
                    }
                    BoundaryPolicy::Reject => {
                        return Err(Error::OutOfOrderOutline {
                            title: entry.title.clone(),
                            page,
                            start,
                        });
                    }
                }
            }

            log::debug!("Section [{}, {}) ends at \"{}\"", start, page, entry.title);
            sections.push(Section::new(start, page));
            start = page;
        }

        sections.push(Section::new(start, end_of_document));
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemorySource;
    use crate::model::OutlineEntry;

    fn outline_at(pages: &[u32]) -> Outline {
        let mut outline = Outline::new();
        for (i, page) in pages.iter().enumerate() {
            outline.add_entry(OutlineEntry::new(
                format!("Entry {}", i + 1),
                Destination::PageIndex(page - 1),
            ));
        }
        outline
    }

    fn partition(pages: &[u32], page_count: u32) -> Result<Vec<Section>> {
        let source = MemorySource::new(page_count).with_outline(outline_at(pages));
        OutlineSectionPartitioner::default().partition(&source)
    }

    fn assert_contiguous(sections: &[Section], page_count: u32) {
        assert_eq!(sections.first().map(|s| s.start), Some(1));
        assert_eq!(sections.last().map(|s| s.end), Some(page_count + 1));
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_ten_pages_two_entries() {
        let sections = partition(&[1, 5], 10).unwrap();
        assert_eq!(
            sections,
            vec![Section::new(1, 1), Section::new(1, 5), Section::new(5, 11)]
        );
    }

    #[test]
    fn test_empty_outline() {
        let sections = partition(&[], 7).unwrap();
        assert_eq!(sections, vec![Section::new(1, 8)]);
    }

    #[test]
    fn test_k_entries_give_k_plus_one_sections() {
        for (pages, count) in [
            (vec![2, 4, 6], 8),
            (vec![1], 1),
            (vec![3, 3, 9], 9),
            (vec![1, 2, 3, 4, 5], 5),
        ] {
            let sections = partition(&pages, count).unwrap();
            assert_eq!(sections.len(), pages.len() + 1);
            assert_contiguous(&sections, count);
        }
    }

    #[test]
    fn test_out_of_order_clamps() {
        let sections = partition(&[5, 3], 6).unwrap();
        assert_eq!(
            sections,
            vec![Section::new(1, 5), Section::new(5, 5), Section::new(5, 7)]
        );
        assert_contiguous(&sections, 6);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let source = MemorySource::new(6).with_outline(outline_at(&[5, 3]));
        let partitioner = OutlineSectionPartitioner::new(
            PartitionOptions::new().with_boundary_policy(BoundaryPolicy::Reject),
        );
        match partitioner.partition(&source) {
            Err(Error::OutOfOrderOutline { title, page, start }) => {
                assert_eq!(title, "Entry 2");
                assert_eq!((page, start), (3, 5));
            }
            other => panic!("expected OutOfOrderOutline, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_destination_propagates_with_title() {
        let mut outline = outline_at(&[2]);
        outline.add_entry(OutlineEntry::new("Appendix", Destination::Named("app".into())));
        let source = MemorySource::new(4).with_outline(outline);

        match OutlineSectionPartitioner::default().partition(&source) {
            Err(Error::UnresolvableDestination { title, .. }) => assert_eq!(title, "Appendix"),
            other => panic!("expected UnresolvableDestination, got {:?}", other),
        }
    }

    #[test]
    fn test_destination_past_end_is_unresolvable() {
        let outline = outline_at(&[2]);
        let result = OutlineSectionPartitioner::default().partition_outline(&outline, 3, |_| Ok(7));
        assert!(matches!(result, Err(Error::UnresolvableDestination { .. })));

        // N + 1 itself is a valid (empty) boundary
        let sections = OutlineSectionPartitioner::default()
            .partition_outline(&outline, 3, |_| Ok(3))
            .unwrap();
        assert_eq!(sections, vec![Section::new(1, 4), Section::new(4, 4)]);
    }

    #[test]
    fn test_named_destinations_resolve() {
        let mut outline = Outline::new();
        outline.add_entry(OutlineEntry::new("Intro", Destination::Named("intro".into())));
        outline.add_entry(OutlineEntry::new("Body", Destination::Named("body".into())));
        let source = MemorySource::new(6)
            .with_named_destination("intro", 0)
            .with_named_destination("body", 2)
            .with_outline(outline);

        let sections = OutlineSectionPartitioner::default().partition(&source).unwrap();
        assert_eq!(
            sections,
            vec![Section::new(1, 1), Section::new(1, 3), Section::new(3, 7)]
        );
    }

    #[test]
    fn test_preorder_flattening_uses_children() {
        let mut outline = Outline::new();
        outline.add_entry(
            OutlineEntry::new("Part I", Destination::PageIndex(0))
                .with_child(OutlineEntry::new("Chapter 1", Destination::PageIndex(2))),
        );
        outline.add_entry(OutlineEntry::new("Part II", Destination::PageIndex(4)));
        let source = MemorySource::new(6).with_outline(outline);

        let top = OutlineSectionPartitioner::default().partition(&source).unwrap();
        assert_eq!(top.len(), 3);

        let preorder = OutlineSectionPartitioner::new(
            PartitionOptions::new().with_flatten_rule(FlattenRule::Preorder),
        )
        .partition(&source)
        .unwrap();
        assert_eq!(
            preorder,
            vec![
                Section::new(1, 1),
                Section::new(1, 3),
                Section::new(3, 5),
                Section::new(5, 7)
            ]
        );
    }
}
