//! Per-page outcomes and progress events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What happened to one page during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Fragment produced
    Rendered,
    /// Rendering failed after all retries
    Failed { reason: String },
    /// Excluded by the page selection
    Skipped,
}

impl PageOutcome {
    /// Whether the page produced a fragment.
    pub fn is_rendered(&self) -> bool {
        matches!(self, PageOutcome::Rendered)
    }
}

/// Outcomes of a batch of page extractions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One outcome per page, keyed by page number
    pub pages: BTreeMap<u32, PageOutcome>,
}

impl BatchReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a page, replacing any earlier one.
    pub fn record(&mut self, page: u32, outcome: PageOutcome) {
        self.pages.insert(page, outcome);
    }

    /// Outcome for a page.
    pub fn outcome(&self, page: u32) -> Option<&PageOutcome> {
        self.pages.get(&page)
    }

    /// Number of rendered pages.
    pub fn rendered_count(&self) -> usize {
        self.pages.values().filter(|o| o.is_rendered()).count()
    }

    /// Number of skipped pages.
    pub fn skipped_count(&self) -> usize {
        self.pages
            .values()
            .filter(|o| matches!(o, PageOutcome::Skipped))
            .count()
    }

    /// Failed pages with their reasons, in page order.
    pub fn failures(&self) -> Vec<(u32, &str)> {
        self.pages
            .iter()
            .filter_map(|(page, outcome)| match outcome {
                PageOutcome::Failed { reason } => Some((*page, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Whether every page was rendered.
    pub fn is_complete(&self) -> bool {
        self.pages.values().all(PageOutcome::is_rendered)
    }
}

/// Progress published while a deck is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Extraction is starting for `pages` pages
    Started { pages: u32 },
    /// A page finished with the given outcome
    Page { page: u32, outcome: PageOutcome },
    /// All pages are done
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::new();
        report.record(1, PageOutcome::Rendered);
        report.record(
            2,
            PageOutcome::Failed {
                reason: "bad operand".into(),
            },
        );
        report.record(3, PageOutcome::Skipped);

        assert_eq!(report.rendered_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failures(), vec![(2, "bad operand")]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_string(&PageOutcome::Failed {
            reason: "x".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"failed","reason":"x"}"#);
    }
}
